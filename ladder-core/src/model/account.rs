use crate::stats::PlayerStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /update_stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsUpdate {
    pub username: String,
    pub password: String,
    pub user_data: PlayerStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterReply {
    pub success: bool,
    pub message: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    pub message: String,
    /// The name as it was registered, whatever case was typed at login.
    pub username: String,
    pub user_data: PlayerStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReply {
    pub success: bool,
    pub message: String,
    pub updated_stats: PlayerStats,
}

/// `GET /user_stats/{username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub fastest_win: Option<u64>,
    pub best_win_streak: u32,
    pub last_played: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    pub fn new(username: String, stats: &PlayerStats) -> Self {
        Self {
            username,
            games_played: stats.games_played,
            wins: stats.wins,
            losses: stats.losses,
            win_rate: stats.win_rate(),
            fastest_win: stats.fastest_win,
            best_win_streak: stats.best_win_streak,
            last_played: stats.last_played,
        }
    }
}

/// `GET /leaderboard`: the top players and how many have played at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub total_players: usize,
}

/// `GET /status` on the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub server: String,
    pub sessions: usize,
    pub clients: usize,
    #[serde(default)]
    pub users: usize,
}
