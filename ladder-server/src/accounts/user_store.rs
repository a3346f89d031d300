use crate::accounts::account_error::AccountError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ladder_core::stats::PlayerStats;
use ladder_core::{Leaderboard, LeaderboardEntry, UserProfile};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 4;
const FORBIDDEN_CHARS: [char; 7] = ['<', '>', '"', '\'', '&', '/', '\\'];

/// Players listed by `GET /leaderboard`.
pub const LEADERBOARD_SIZE: usize = 50;

/// One account as kept in the users file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stats: PlayerStats,
}

/// Accounts and their synced stats. Names are unique ignoring case.
///
/// With a path, every change rewrites the file as a JSON object keyed by
/// username.
pub struct UserStore {
    /// Lower-cased name to the name as registered and its record.
    users: DashMap<String, (String, UserRecord)>,
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn in_memory() -> Self {
        Self {
            users: DashMap::new(),
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the users file at `path`; a missing file starts empty.
    pub async fn open(path: PathBuf) -> Result<Self, AccountError> {
        let users = DashMap::new();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let saved: BTreeMap<String, UserRecord> = serde_json::from_str(&content)?;
                for (name, record) in saved {
                    users.insert(name.to_lowercase(), (name, record));
                }
                info!("Loaded {} accounts from {}", users.len(), path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No users file at {}, starting empty", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            users,
            path: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Creates an account and returns the stored name.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AccountError> {
        let (username, password) = validate(username, password)?;
        let key = username.to_lowercase();

        match self.users.entry(key.clone()) {
            Entry::Occupied(_) => return Err(AccountError::UsernameTaken),
            Entry::Vacant(slot) => {
                slot.insert((
                    username.to_owned(),
                    UserRecord {
                        password_hash: hash_password(password),
                        created_at: now,
                        last_login: None,
                        stats: PlayerStats::default(),
                    },
                ));
            }
        }

        if let Err(e) = self.persist().await {
            self.users.remove(&key);
            return Err(e);
        }
        info!("Registered account {}", username);
        Ok(username.to_owned())
    }

    /// Checks the password, stamps `last_login` and returns the stored name
    /// with the account's stats.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, PlayerStats), AccountError> {
        let found = {
            let mut entry = self
                .users
                .get_mut(&username.to_lowercase())
                .ok_or(AccountError::WrongPassword)?;
            let (name, record) = entry.value_mut();
            check_password(record, password)?;
            record.last_login = Some(now);
            (name.clone(), record.stats.clone())
        };

        self.persist().await?;
        debug!("{} logged in", found.0);
        Ok(found)
    }

    /// Merges `incoming` into the account's stats: counters and records keep
    /// the larger value, the fastest win the smaller.
    pub async fn update_stats(
        &self,
        username: &str,
        password: &str,
        incoming: &PlayerStats,
    ) -> Result<PlayerStats, AccountError> {
        let merged = {
            let mut entry = self
                .users
                .get_mut(&username.to_lowercase())
                .ok_or(AccountError::UnknownUser)?;
            let (_, record) = entry.value_mut();
            check_password(record, password)?;
            record.stats = record.stats.merged_with(incoming);
            record.stats.clone()
        };

        self.persist().await?;
        Ok(merged)
    }

    pub fn profile(&self, username: &str) -> Result<UserProfile, AccountError> {
        let entry = self
            .users
            .get(&username.to_lowercase())
            .ok_or(AccountError::UnknownUser)?;
        let (name, record) = entry.value();
        Ok(UserProfile {
            username: name.clone(),
            created_at: record.created_at,
            last_login: record.last_login,
            stats: record.stats.clone(),
        })
    }

    /// Players with at least one game, by wins, then win rate, then games
    /// played.
    pub fn leaderboard(&self) -> Leaderboard {
        let mut players: Vec<LeaderboardEntry> = self
            .users
            .iter()
            .filter(|e| e.value().1.stats.games_played > 0)
            .map(|e| LeaderboardEntry::new(e.value().0.clone(), &e.value().1.stats))
            .collect();

        players.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.win_rate.total_cmp(&a.win_rate))
                .then(b.games_played.cmp(&a.games_played))
                .then_with(|| a.username.cmp(&b.username))
        });

        let total_players = players.len();
        players.truncate(LEADERBOARD_SIZE);
        Leaderboard {
            leaderboard: players,
            total_players,
        }
    }

    async fn persist(&self) -> Result<(), AccountError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        let snapshot: BTreeMap<String, UserRecord> = self
            .users
            .iter()
            .map(|e| (e.value().0.clone(), e.value().1.clone()))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await.map_err(|e| {
            warn!("Could not write {}: {}", path.display(), e);
            AccountError::Storage(e)
        })
    }
}

/// Trims both fields and applies the length and character rules.
fn validate<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AccountError> {
    let username = username.trim();
    let password = password.trim();

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AccountError::InvalidCredentials(
            "Username must be at least 3 characters",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::InvalidCredentials(
            "Password must be at least 4 characters",
        ));
    }
    if username.contains(FORBIDDEN_CHARS) || password.contains(FORBIDDEN_CHARS) {
        return Err(AccountError::InvalidCredentials(
            "Invalid characters in credentials",
        ));
    }
    Ok((username, password))
}

fn check_password(record: &UserRecord, password: &str) -> Result<(), AccountError> {
    if record.password_hash == hash_password(password.trim()) {
        Ok(())
    } else {
        Err(AccountError::WrongPassword)
    }
}

fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
