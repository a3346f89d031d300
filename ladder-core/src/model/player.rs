use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: String,
    pub avatar: String,
}

impl PlayerInfo {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    pub fn default_host() -> Self {
        Self::new("Host", "🙂")
    }

    pub fn default_guest() -> Self {
        Self::new("Guest", "😎")
    }
}

impl fmt::Display for PlayerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.avatar, self.name)
    }
}

/// Which side of a two-player match a client occupies.
///
/// The host always moves first and owns player index 0.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Host,
    Guest,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::Host => 0,
            Seat::Guest => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::Host),
            1 => Some(Seat::Guest),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Seat::Host => Seat::Guest,
            Seat::Guest => Seat::Host,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Host => f.write_str("host"),
            Seat::Guest => f.write_str("guest"),
        }
    }
}
