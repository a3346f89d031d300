use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const INVITE_CODE_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short human-shareable code derived from the id.
    pub fn invite_code(&self) -> InviteCode {
        let hyphenated = self.0.hyphenated().to_string();
        InviteCode(hyphenated[..INVITE_CODE_LEN].to_uppercase())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper-cased prefix of a [`SessionId`]. Parsing user input normalises case
/// and surrounding whitespace, so `" ab12cd34 "` and `"AB12CD34"` are equal.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    pub fn parse(input: &str) -> Self {
        Self(input.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InviteCode {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<InviteCode> for String {
    fn from(code: InviteCode) -> Self {
        code.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
