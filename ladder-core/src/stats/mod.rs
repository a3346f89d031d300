//! Win/loss bookkeeping, persisted per profile as JSON.

mod book;
mod store;

pub use book::{HISTORY_LIMIT, PlayerStats, SESSION_WIN_GOAL, SessionSummary, StatsBook};
pub use store::StatsStore;
