use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Session wins after which the current session is archived.
pub const SESSION_WIN_GOAL: u32 = 5;

/// Completed sessions kept in [`StatsBook::history`]; older ones are dropped.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Shortest winning game, in seconds.
    pub fastest_win: Option<u64>,
    pub longest_game: Option<u64>,
    pub win_streak: u32,
    pub best_win_streak: u32,
    /// Seconds.
    pub total_playtime: u64,
    pub last_played: Option<DateTime<Utc>>,
}

impl PlayerStats {
    pub fn record_game(&mut self, won: bool, duration_secs: u64, now: DateTime<Utc>) {
        self.games_played += 1;
        self.last_played = Some(now);
        self.total_playtime += duration_secs;

        if won {
            self.wins += 1;
            self.win_streak += 1;
            self.best_win_streak = self.best_win_streak.max(self.win_streak);
            self.fastest_win = Some(
                self.fastest_win
                    .map_or(duration_secs, |best| best.min(duration_secs)),
            );
        } else {
            self.losses += 1;
            self.win_streak = 0;
        }

        self.longest_game = Some(
            self.longest_game
                .map_or(duration_secs, |longest| longest.max(duration_secs)),
        );
    }

    /// Percentage of games won, rounded to one decimal.
    pub fn win_rate(&self) -> f64 {
        win_rate(self.wins, self.games_played)
    }

    /// Combines two copies of the same player's stats kept on different
    /// machines. Counters and records take the larger value, `fastest_win` the
    /// smaller. The current streak and last game come from `newer`.
    pub fn merged_with(&self, newer: &PlayerStats) -> PlayerStats {
        PlayerStats {
            games_played: self.games_played.max(newer.games_played),
            wins: self.wins.max(newer.wins),
            losses: self.losses.max(newer.losses),
            fastest_win: match (self.fastest_win, newer.fastest_win) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
            longest_game: self.longest_game.max(newer.longest_game),
            win_streak: newer.win_streak,
            best_win_streak: self.best_win_streak.max(newer.best_win_streak),
            total_playtime: self.total_playtime.max(newer.total_playtime),
            last_played: newer.last_played.or(self.last_played),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// All-time stats plus the running play session and its archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsBook {
    pub global: PlayerStats,
    pub local: PlayerStats,
    pub session_start: DateTime<Utc>,
    pub session_games: u32,
    pub session_wins: u32,
    pub history: Vec<SessionSummary>,
}

impl StatsBook {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            global: PlayerStats::default(),
            local: PlayerStats::default(),
            session_start: now,
            session_games: 0,
            session_wins: 0,
            history: Vec::new(),
        }
    }

    /// Records a finished game. Returns the archived session when this game
    /// brought the session to [`SESSION_WIN_GOAL`] wins.
    pub fn record_game(
        &mut self,
        won: bool,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Option<SessionSummary> {
        self.global.record_game(won, duration_secs, now);
        self.local.record_game(won, duration_secs, now);

        self.session_games += 1;
        if won {
            self.session_wins += 1;
        }
        info!(
            won,
            duration_secs,
            session_wins = self.session_wins,
            "Game recorded"
        );

        (self.session_wins >= SESSION_WIN_GOAL).then(|| self.complete_session(now))
    }

    pub fn complete_session(&mut self, now: DateTime<Utc>) -> SessionSummary {
        let summary = SessionSummary {
            start: self.session_start,
            end: now,
            games: self.session_games,
            wins: self.session_wins,
            win_rate: win_rate(self.session_wins, self.session_games),
        };
        info!(
            wins = summary.wins,
            games = summary.games,
            "Session completed"
        );

        self.history.push(summary.clone());
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.start_session(now);
        summary
    }

    /// Restarts the session counters. `local` keeps its totals.
    pub fn start_session(&mut self, now: DateTime<Utc>) {
        self.session_start = now;
        self.session_games = 0;
        self.session_wins = 0;
    }

    /// Abandons the running session without archiving it.
    pub fn reset_session(&mut self, now: DateTime<Utc>) {
        info!(
            games = self.session_games,
            wins = self.session_wins,
            "Session reset"
        );
        self.start_session(now);
    }

    pub fn reset_global(&mut self) {
        info!(games = self.global.games_played, "Global stats reset");
        self.global = PlayerStats::default();
    }

    /// Folds the stats a leaderboard server holds for this player into
    /// `global`, trusting the server for the current streak.
    pub fn sync_global(&mut self, server: &PlayerStats) -> &PlayerStats {
        self.global = self.global.merged_with(server);
        &self.global
    }
}

impl Default for StatsBook {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

fn win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    (f64::from(wins) / f64::from(games) * 1000.0).round() / 10.0
}
