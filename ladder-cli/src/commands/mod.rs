mod account;
mod menu;
mod multiplayer;
mod serve;
mod solo;
mod stats;

pub use account::{run_account, run_leaderboard, run_status};
pub use menu::run_menu;
pub use multiplayer::{run_host, run_join};
pub use serve::run_serve;
pub use solo::run_solo;
pub use stats::{record_result, run_stats};
