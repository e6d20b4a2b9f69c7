// Versioned rule table.
//
// Each ruleset revision is a row of flags and sample minima. Code paths
// branch on these fields, never on the version itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVersion {
    /// Current season only.
    V1,
    /// Cross-season hero merge and match backfill.
    V2,
    /// V2 plus the duration-based replay simulation.
    #[default]
    V3,
}

impl RuleVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleVersion::V1 => "v1",
            RuleVersion::V2 => "v2",
            RuleVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for RuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ruleset `{0}`")]
pub struct UnknownRuleset(pub String);

impl FromStr for RuleVersion {
    type Err = UnknownRuleset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(RuleVersion::V1),
            "v2" | "2" => Ok(RuleVersion::V2),
            "v3" | "3" => Ok(RuleVersion::V3),
            other => Err(UnknownRuleset(other.to_string())),
        }
    }
}

/// Behaviour switches and sample-size minima for one ruleset revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub version: RuleVersion,
    /// Merge hero stats and backfill matches from the previous season.
    pub cross_season: bool,
    /// Attach the simulated strategic profile to reports.
    pub replay_simulation: bool,
    /// Matches required before a streak badge is considered.
    pub streak_min_matches: usize,
    /// Matches required before duration-pattern and multi-match economy
    /// badges are considered.
    pub playstyle_min_matches: usize,
    /// How many of the most recent matches the playstyle and economy rules
    /// inspect.
    pub playstyle_window: usize,
    /// Overall games needed on a hero for the main-hero badge.
    pub main_hero_min_games: u32,
}

impl Rules {
    pub const fn for_version(version: RuleVersion) -> Self {
        let (cross_season, replay_simulation) = match version {
            RuleVersion::V1 => (false, false),
            RuleVersion::V2 => (true, false),
            RuleVersion::V3 => (true, true),
        };
        Rules {
            version,
            cross_season,
            replay_simulation,
            streak_min_matches: 3,
            playstyle_min_matches: 5,
            playstyle_window: 5,
            main_hero_min_games: 10,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::for_version(RuleVersion::default())
    }
}
