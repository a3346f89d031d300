use crate::error::PeerError;
use async_trait::async_trait;
use ladder_core::game::GameMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Game(GameMessage),
    OpponentLeft,
}

/// Bidirectional path for turn-sync messages between the two players.
#[async_trait]
pub trait GameChannel: Send {
    async fn send(&mut self, msg: &GameMessage) -> Result<(), PeerError>;

    /// Next event from the opponent; `None` once the channel is gone.
    async fn recv(&mut self) -> Option<ChannelEvent>;

    /// Short name of the transport, for display.
    fn transport(&self) -> &'static str;

    async fn close(&mut self);
}
