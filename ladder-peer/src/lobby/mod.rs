mod handshake;
mod lobby;
mod matched;

pub use lobby::{Lobby, PendingMatch};
pub use matched::Match;
