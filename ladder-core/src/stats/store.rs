use crate::error::StatsError;
use crate::stats::book::{PlayerStats, SessionSummary, StatsBook};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A [`StatsBook`] bound to its JSON file.
pub struct StatsStore {
    path: PathBuf,
    book: StatsBook,
}

impl StatsStore {
    /// Path of the stats file for `profile` inside `data_dir`.
    pub fn path_for(data_dir: &Path, profile: &str) -> PathBuf {
        let safe: String = profile
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        data_dir.join(format!("stats_{safe}.json"))
    }

    /// Opens the stats for `profile`. A missing file starts a fresh book.
    pub fn open(data_dir: &Path, profile: &str) -> Result<Self, StatsError> {
        let path = Self::path_for(data_dir, profile);
        let book = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            debug!("No stats at {}, starting fresh", path.display());
            StatsBook::default()
        };
        Ok(Self { path, book })
    }

    pub fn book(&self) -> &StatsBook {
        &self.book
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records a game and writes the file straight away.
    pub fn record_game(
        &mut self,
        won: bool,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionSummary>, StatsError> {
        let completed = self.book.record_game(won, duration_secs, now);
        self.save()?;
        Ok(completed)
    }

    pub fn reset_session(&mut self, now: DateTime<Utc>) -> Result<(), StatsError> {
        self.book.reset_session(now);
        self.save()
    }

    pub fn reset_global(&mut self) -> Result<(), StatsError> {
        self.book.reset_global();
        self.save()
    }

    /// Merges the server's copy of the global stats and saves the result.
    pub fn sync_global(&mut self, server: &PlayerStats) -> Result<PlayerStats, StatsError> {
        let merged = self.book.sync_global(server).clone();
        self.save()?;
        Ok(merged)
    }

    pub fn save(&self) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.book)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
