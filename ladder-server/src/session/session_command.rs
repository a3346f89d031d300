use ladder_core::{PeerId, PlayerInfo, SignalMessage};
use tokio::sync::oneshot;

/// Commands delivered to a session actor by the signaling layer.
#[derive(Debug)]
pub enum SessionCommand {
    /// A second player asks to take the guest seat.
    Join {
        peer_id: PeerId,
        info: PlayerInfo,
        reply: oneshot::Sender<Result<(), JoinRejection>>,
    },

    /// Offer, answer, ICE candidate or game message to pass to the other seat.
    Relay { from: PeerId, message: SignalMessage },

    /// The peer's websocket went away, or it moved to another session.
    Disconnect { peer_id: PeerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
    Full,
    AlreadyHost,
}

impl JoinRejection {
    pub fn message(self) -> &'static str {
        match self {
            JoinRejection::Full => "Session full",
            JoinRejection::AlreadyHost => "Cannot join your own session",
        }
    }
}
