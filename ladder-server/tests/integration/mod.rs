pub mod session_tests;
pub mod ws_tests;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Level;

use ladder_server::{Relay, ServerConfig, SessionManager};

use crate::utils::{MockSignalingOutput, SentSignal};

/// Short enough to keep tests quick, long enough to observe the gap.
pub const TEST_READY_DELAY: Duration = Duration::from_millis(50);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_manager() -> (
    SessionManager,
    MockSignalingOutput,
    mpsc::UnboundedReceiver<SentSignal>,
) {
    let (signaling, signal_rx) = MockSignalingOutput::new();
    let manager = SessionManager::new(Arc::new(signaling.clone()), TEST_READY_DELAY);

    (manager, signaling, signal_rx)
}

/// Start a relay on an ephemeral local port.
pub async fn spawn_relay() -> SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        ready_delay: TEST_READY_DELAY,
        ..ServerConfig::default()
    };

    let relay = Relay::bind(&config).await.expect("Failed to bind relay");
    let addr = relay.local_addr().expect("Relay has no address");

    tokio::spawn(async move {
        if let Err(e) = relay.run().await {
            tracing::error!("Relay stopped: {e:#}");
        }
    });

    addr
}
