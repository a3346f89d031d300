use crate::cli::ServeArgs;
use anyhow::Result;
use colored::*;
use ladder_core::IceServerConfig;
use ladder_server::{Relay, ServerConfig};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub async fn run_serve(args: ServeArgs, data_dir: &Path) -> Result<()> {
    let mut config = ServerConfig {
        host: args.host,
        port: args.port,
        ready_delay: Duration::from_millis(args.ready_delay_ms),
        users_file: Some(args.users_file.unwrap_or_else(|| data_dir.join("users.json"))),
        ..ServerConfig::default()
    };
    if !args.ice_servers.is_empty() {
        config.ice_servers = args.ice_servers.into_iter().map(IceServerConfig::stun).collect();
    }
    let config = config.with_turn_from_env();

    let relay = Relay::bind(&config).await?;
    println!(
        "{} {}",
        "🐍 Relay listening on".green().bold(),
        format!("ws://{}", relay.local_addr()?).cyan()
    );

    relay
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
}
