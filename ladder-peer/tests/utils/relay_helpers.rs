use anyhow::{Result, bail};
use ladder_core::{SessionId, SignalMessage};
use ladder_peer::{ClientConfig, SignalingClient};
use ladder_server::{Relay, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;

const SEAT_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a relay on an ephemeral local port, announcing no ICE servers.
pub async fn spawn_relay() -> SocketAddr {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        ice_servers: Vec::new(),
        ready_delay: Duration::from_millis(20),
        users_file: None,
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

pub fn client_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        connect_timeout: Duration::from_secs(15),
        ..ClientConfig::with_server(format!("ws://{addr}/ws"))
    }
}

/// A config whose direct connection attempt gives up immediately.
pub fn relay_only_config(addr: SocketAddr, relay_fallback: bool) -> ClientConfig {
    ClientConfig {
        connect_timeout: Duration::ZERO,
        relay_fallback,
        ..ClientConfig::with_server(format!("ws://{addr}/ws"))
    }
}

/// Two relay connections seated as host and guest of one session, past
/// `game_ready`.
pub async fn seated_pair(addr: SocketAddr) -> Result<(SignalingClient, SignalingClient, SessionId)> {
    let url = format!("ws://{addr}/ws");

    let mut host = SignalingClient::connect(&url, SEAT_TIMEOUT).await?;
    host.send(&SignalMessage::CreateSession {
        player_name: None,
        player_avatar: None,
    })?;
    let created = host
        .expect_within(SEAT_TIMEOUT, "session_created", |m| {
            matches!(m, SignalMessage::SessionCreated { .. })
        })
        .await?;
    let SignalMessage::SessionCreated {
        session_id,
        invite_code,
    } = created
    else {
        bail!("expected session_created, got {}", created.kind());
    };

    let mut guest = SignalingClient::connect(&url, SEAT_TIMEOUT).await?;
    guest.send(&SignalMessage::JoinSession {
        invite_code,
        player_name: None,
        player_avatar: None,
    })?;

    let is_ready = |m: &SignalMessage| matches!(m, SignalMessage::GameReady { .. });
    guest.expect_within(SEAT_TIMEOUT, "game_ready", is_ready).await?;
    host.expect_within(SEAT_TIMEOUT, "game_ready", is_ready).await?;

    Ok((host, guest, session_id))
}
