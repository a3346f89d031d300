mod account;
mod packet;
mod peer;
mod player;
mod session;
mod signaling;

pub use account::{
    Credentials, Leaderboard, LeaderboardEntry, LoginReply, RegisterReply, ServerStatus, StatsReply,
    StatsUpdate, UserProfile,
};
pub use packet::{Packet, SystemMessage};
pub use peer::PeerId;
pub use player::{PlayerInfo, Seat};
pub use session::{InviteCode, SessionId};
pub use signaling::{IceServerConfig, SignalMessage};
