// Battle tag validation at the request boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `\w` is Unicode-aware in the regex crate, so Cyrillic and other scripts
/// pass. The discriminator is restricted to ASCII digits.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+#[0-9]{4,5}$").expect("battle tag pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("battle tag must not be empty")]
    Empty,

    #[error("battle tag `{0}` must be in format PlayerName#1234 (international characters allowed)")]
    Format(String),
}

/// A validated `name#digits` player identifier.
///
/// Case-sensitive; surrounding whitespace is rejected rather than trimmed so
/// the tag round-trips exactly to the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BattleTag(String);

impl BattleTag {
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        if raw.is_empty() {
            return Err(TagError::Empty);
        }
        if !TAG_PATTERN.is_match(raw) {
            return Err(TagError::Format(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BattleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BattleTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for BattleTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BattleTag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BattleTag> for String {
    fn from(tag: BattleTag) -> Self {
        tag.0
    }
}
