use anyhow::{Context, Result};
use ladder_core::IceServerConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8765;

/// Settings for the signaling relay.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Handed to every client in `ice_config` on connect.
    pub ice_servers: Vec<IceServerConfig>,
    /// Pause between a guest joining and `game_ready`.
    pub ready_delay: Duration,
    /// JSON file holding player accounts. Accounts live in memory only when
    /// unset.
    pub users_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: DEFAULT_PORT,
            ice_servers: vec![IceServerConfig::stun("stun:stun.l.google.com:19302")],
            ready_delay: Duration::from_millis(500),
            users_file: None,
        }
    }
}

impl ServerConfig {
    /// Resolves `host` to the address to listen on. Accepts IP literals,
    /// bracketed or bare IPv6, and names such as `localhost`.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self
            .host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&self.host);

        tokio::net::lookup_host((host, self.port))
            .await
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("{} resolved to no address", self.host))
    }

    /// Appends a TURN server taken from `TURN_URL`, `TURN_USERNAME` and
    /// `TURN_CREDENTIAL`, when `TURN_URL` is set.
    pub fn with_turn_from_env(mut self) -> Self {
        if let Ok(url) = env::var("TURN_URL") {
            self.ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: env::var("TURN_USERNAME").ok(),
                credential: env::var("TURN_CREDENTIAL").ok(),
            });
        }
        self
    }
}
