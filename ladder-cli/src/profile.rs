use anyhow::{Context, Result};
use ladder_core::PlayerInfo;
use std::fs;
use std::path::{Path, PathBuf};

const PROFILE_FILE: &str = "profile.json";

pub fn profile_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PROFILE_FILE)
}

/// Saved profile, or the default host identity when none exists yet.
pub fn load(data_dir: &Path) -> Result<PlayerInfo> {
    let path = profile_path(data_dir);
    if !path.exists() {
        return Ok(PlayerInfo::default_host());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Corrupt profile {}", path.display()))
}

pub fn save(data_dir: &Path, profile: &PlayerInfo) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = profile_path(data_dir);
    fs::write(&path, serde_json::to_string_pretty(profile)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}
