use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use ladder_core::{PeerId, SignalMessage};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::{QUIET_PERIOD_MS, SIGNAL_TIMEOUT_MS};

/// Raw websocket client speaking the relay's JSON protocol.
pub struct WsTestClient {
    pub peer_id: PeerId,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTestClient {
    /// Connect and consume the `welcome` / `ice_config` greeting.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (stream, _) = connect_async(format!("ws://{addr}/ws"))
            .await
            .context("Failed to connect to relay")?;

        let mut client = Self {
            peer_id: PeerId::new(),
            stream,
        };

        match client.recv().await? {
            SignalMessage::Welcome { peer_id } => client.peer_id = peer_id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }
        match client.recv().await? {
            SignalMessage::IceConfig { .. } => {}
            other => anyhow::bail!("Expected ice_config, got {:?}", other),
        }

        Ok(client)
    }

    pub async fn send(&mut self, msg: &SignalMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.send_text(&json).await
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::text(text))
            .await
            .context("Failed to send frame")?;
        Ok(())
    }

    pub async fn recv(&mut self) -> Result<SignalMessage> {
        self.recv_within(Duration::from_millis(SIGNAL_TIMEOUT_MS))
            .await?
            .context("Timeout waiting for message")
    }

    /// Next message, or `None` if nothing arrives within the quiet period.
    pub async fn try_recv(&mut self) -> Result<Option<SignalMessage>> {
        self.recv_within(Duration::from_millis(QUIET_PERIOD_MS)).await
    }

    async fn recv_within(&mut self, limit: Duration) -> Result<Option<SignalMessage>> {
        loop {
            let frame = match tokio::time::timeout(limit, self.stream.next()).await {
                Ok(Some(frame)) => frame.context("WebSocket error")?,
                Ok(None) => anyhow::bail!("Connection closed"),
                Err(_) => return Ok(None),
            };

            if let Message::Text(text) = frame {
                return Ok(Some(serde_json::from_str(&text)?));
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
