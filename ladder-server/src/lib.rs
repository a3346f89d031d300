mod accounts;
mod app;
mod config;
mod session;
mod signaling;

pub use accounts::{AccountError, LEADERBOARD_SIZE, UserRecord, UserStore};
pub use app::{AppState, Relay, router};
pub use config::{DEFAULT_PORT, ServerConfig};
pub use session::*;
pub use signaling::*;
