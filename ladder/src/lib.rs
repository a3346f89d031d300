pub use ladder_core::model::{InviteCode, PeerId, PlayerInfo, Seat, SessionId};

pub mod model {
    pub use ladder_core::model::*;
}

pub mod game {
    pub use ladder_core::game::*;
}

pub mod stats {
    pub use ladder_core::stats::*;
}

pub use ladder_core::{GameError, StatsError};

#[cfg(feature = "server")]
pub mod server {
    pub use ladder_server::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use ladder_peer::*;
}
