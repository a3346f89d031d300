use crate::channel::GameChannel;
use ladder_core::{PlayerInfo, Seat, SessionId};

/// Two players seated and connected.
pub struct Match {
    pub seat: Seat,
    pub opponent: PlayerInfo,
    pub session_id: SessionId,
    pub channel: Box<dyn GameChannel>,
}

impl Match {
    pub fn is_direct(&self) -> bool {
        self.channel.transport() == "direct"
    }
}
