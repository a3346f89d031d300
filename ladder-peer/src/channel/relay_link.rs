use crate::channel::game_channel::{ChannelEvent, GameChannel};
use crate::error::PeerError;
use crate::signaling::SignalingClient;
use async_trait::async_trait;
use ladder_core::game::GameMessage;
use ladder_core::{SessionId, SignalMessage};
use tracing::{debug, warn};

/// Carries game messages as `game_message` envelopes through the relay.
pub struct RelayLink {
    signaling: SignalingClient,
    session_id: SessionId,
}

impl RelayLink {
    pub fn new(signaling: SignalingClient, session_id: SessionId) -> Self {
        Self {
            signaling,
            session_id,
        }
    }
}

#[async_trait]
impl GameChannel for RelayLink {
    async fn send(&mut self, msg: &GameMessage) -> Result<(), PeerError> {
        let data = serde_json::to_value(msg)?;
        self.signaling.send(&SignalMessage::GameMessage {
            session_id: self.session_id,
            data,
        })
    }

    async fn recv(&mut self) -> Option<ChannelEvent> {
        loop {
            match self.signaling.recv().await? {
                SignalMessage::GameMessage { session_id, data } if session_id == self.session_id => {
                    match serde_json::from_value(data) {
                        Ok(msg) => return Some(ChannelEvent::Game(msg)),
                        Err(e) => warn!("Ignoring malformed game message: {}", e),
                    }
                }
                SignalMessage::PlayerDisconnected { .. } => return Some(ChannelEvent::OpponentLeft),
                other => debug!("Relay link ignoring {}", other.kind()),
            }
        }
    }

    fn transport(&self) -> &'static str {
        "relay"
    }

    async fn close(&mut self) {
        self.signaling.close();
    }
}
