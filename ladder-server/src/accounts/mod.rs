//! Player accounts and the leaderboard, served next to the relay over plain
//! HTTP.

mod account_error;
mod account_routes;
mod user_store;

pub use account_error::AccountError;
pub(crate) use account_routes::{leaderboard, login, register, update_stats, user_stats};
pub use user_store::{LEADERBOARD_SIZE, UserRecord, UserStore};
