use crate::channel::DEFAULT_KEEPALIVE;
use ladder_core::IceServerConfig;
use std::time::Duration;

/// Settings for a game client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    /// Used in addition to the servers the relay announces in `ice_config`.
    pub ice_servers: Vec<IceServerConfig>,
    /// Upper bound on the WebRTC handshake after `game_ready`.
    pub connect_timeout: Duration,
    /// Bound on single request/response exchanges with the relay.
    pub signal_timeout: Duration,
    /// Play through the relay when the direct link cannot be opened in time.
    pub relay_fallback: bool,
    /// Ping period on the direct data channel.
    pub keepalive_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8765".to_owned(),
            ice_servers: Vec::new(),
            connect_timeout: Duration::from_secs(10),
            signal_timeout: Duration::from_secs(5),
            relay_fallback: true,
            keepalive_interval: DEFAULT_KEEPALIVE,
        }
    }
}

impl ClientConfig {
    pub fn with_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }
}
