use crate::cli::{AccountAction, AccountArgs};
use crate::commands::stats::print_block;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Password;
use ladder_core::stats::{PlayerStats, StatsStore};
use ladder_core::{Credentials, PlayerInfo, ServerStatus};
use ladder_peer::{AccountClient, ClientConfig, SignalingClient};
use std::path::Path;

/// What `status` found on the relay.
pub struct StatusReport {
    pub http: Result<ServerStatus>,
    pub websocket: bool,
}

pub async fn check_server(server: &str) -> Result<StatusReport> {
    let config = ClientConfig::with_server(server);
    let client = AccountClient::new(&config)?;
    let http = client
        .status()
        .await
        .with_context(|| format!("{}/status", client.base_url()));

    let websocket = match SignalingClient::connect(&config.server_url, config.signal_timeout).await {
        Ok(signaling) => {
            signaling.close();
            true
        }
        Err(_) => false,
    };

    Ok(StatusReport { http, websocket })
}

pub async fn run_status(server: &str) -> Result<()> {
    let report = check_server(server).await?;

    match &report.http {
        Ok(status) => println!(
            "{} {} ({} sessions, {} clients, {} accounts)",
            "✅ Relay:".green().bold(),
            status.server,
            status.sessions,
            status.clients,
            status.users
        ),
        Err(e) => println!("{} offline ({:#})", "❌ Relay:".red().bold(), e),
    }
    if report.websocket {
        println!("{} reachable at {}", "✅ WebSocket:".green().bold(), server);
    } else {
        println!("{} unreachable at {}", "❌ WebSocket:".red().bold(), server);
    }
    Ok(())
}

pub async fn run_leaderboard(server: &str) -> Result<()> {
    let client = AccountClient::new(&ClientConfig::with_server(server))?;
    let board = client.leaderboard().await?;

    println!(
        "{}",
        format!("🏆 Leaderboard ({} players)", board.total_players).bold()
    );
    if board.leaderboard.is_empty() {
        println!("  {}", "Nobody has synced a game yet".dimmed());
    }
    for (rank, entry) in board.leaderboard.iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {:>4} wins / {:>4} games  {:>5}%  best streak {}",
            rank + 1,
            entry.username,
            entry.wins,
            entry.games_played,
            entry.win_rate,
            entry.best_win_streak
        );
    }
    Ok(())
}

pub async fn run_account(
    action: AccountAction,
    args: AccountArgs,
    data_dir: &Path,
    profile: &PlayerInfo,
) -> Result<()> {
    let client = AccountClient::new(&ClientConfig::with_server(&args.server.server))?;

    match action {
        AccountAction::Register => {
            let credentials = credentials(&args, profile)?;
            let reply = client.register(&credentials).await?;
            println!("{} {}", "✔ Registered".green().bold(), reply.username);
        }
        AccountAction::Sync => {
            let credentials = credentials(&args, profile)?;
            let mut store = StatsStore::open(data_dir, &profile.name)?;
            let merged = sync_stats(&client, &mut store, &credentials).await?;
            println!("{}", "✔ Stats synced".green().bold());
            print_block("All time", &merged);
        }
        AccountAction::Show { name } => {
            let name = name
                .or(args.user)
                .unwrap_or_else(|| profile.name.clone());
            let user = client.user_stats(&name).await?;
            println!(
                "{} (since {})",
                user.username.bold(),
                user.created_at.format("%Y-%m-%d")
            );
            print_block("Online", &user.stats);
        }
    }
    Ok(())
}

/// Logs in, folds the server's stats into the local all-time stats, and
/// sends the merged result back. Returns the stats both sides now hold.
pub async fn sync_stats(
    client: &AccountClient,
    store: &mut StatsStore,
    credentials: &Credentials,
) -> Result<PlayerStats> {
    let login = client.login(credentials).await?;
    let merged = store.sync_global(&login.user_data)?;
    let remote = client.update_stats(credentials, &merged).await?;
    Ok(remote)
}

fn credentials(args: &AccountArgs, profile: &PlayerInfo) -> Result<Credentials> {
    let username = args.user.clone().unwrap_or_else(|| profile.name.clone());
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new()
            .with_prompt(format!("Password for {username}"))
            .interact()?,
    };
    Ok(Credentials::new(username, password))
}
