// Upstream payload shapes and the derived per-player views.
//
// Every field is parsed leniently: absent fields take their default, list
// elements that fail to parse are dropped, and a wrong-typed scalar falls
// back to its default. A malformed fragment degrades the profile instead of
// failing the lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Parse any scalar/struct, falling back to `T::default()` on a type
    /// mismatch or `null`.
    pub fn value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(raw).unwrap_or_default())
    }

    /// Parse a list, skipping elements that do not fit `T`. Anything that
    /// is not an array becomes an empty list.
    pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Identifiers arrive as strings but occasionally as numbers.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(match raw {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Race
// ---------------------------------------------------------------------------

/// Playable races with their upstream bit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Orc,
    #[serde(rename = "Night Elf")]
    NightElf,
    Undead,
    Random,
}

impl Race {
    /// Map an upstream race code. Random is reported as 16 by match data and
    /// as 0 by some summary rows.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Race::Human),
            2 => Some(Race::Orc),
            4 => Some(Race::NightElf),
            8 => Some(Race::Undead),
            0 | 16 => Some(Race::Random),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Race::Human => 1,
            Race::Orc => 2,
            Race::NightElf => 4,
            Race::Undead => 8,
            Race::Random => 16,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Orc => "Orc",
            Race::NightElf => "Night Elf",
            Race::Undead => "Undead",
            Race::Random => "Random",
        }
    }

    /// Display label for a raw code, including codes outside the known set.
    pub fn label_for_code(code: u32) -> String {
        match Race::from_code(code) {
            Some(race) => race.label().to_string(),
            None => format!("race {code}"),
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown race `{0}`")]
pub struct UnknownRace(pub String);

impl FromStr for Race {
    type Err = UnknownRace;

    /// Accepts labels ("Night Elf"), compact forms ("nightelf", "night_elf",
    /// "ne") and numeric codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "human" | "hu" | "hum" => Ok(Race::Human),
            "orc" => Ok(Race::Orc),
            "nightelf" | "ne" | "elf" => Ok(Race::NightElf),
            "undead" | "ud" => Ok(Race::Undead),
            "random" | "rdm" => Ok(Race::Random),
            other => other
                .parse::<u32>()
                .ok()
                .and_then(Race::from_code)
                .ok_or_else(|| UnknownRace(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Player summary
// ---------------------------------------------------------------------------

/// Per-race aggregate from the player summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    #[serde(default, deserialize_with = "lenient::value")]
    pub race: u32,
    #[serde(default, deserialize_with = "lenient::value")]
    pub wins: u32,
    #[serde(default, deserialize_with = "lenient::value")]
    pub losses: u32,
    #[serde(default, deserialize_with = "lenient::value")]
    pub games: u32,
}

impl RaceSummary {
    pub fn race_kind(&self) -> Option<Race> {
        Race::from_code(self.race)
    }
}

/// `players/{tag}` payload, reduced to what the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    #[serde(default, deserialize_with = "lenient::value")]
    pub battle_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub win_losses: Vec<RaceSummary>,
}

impl BasicStats {
    pub fn total_wins(&self) -> u32 {
        self.win_losses.iter().map(|wl| wl.wins).sum()
    }

    pub fn total_games(&self) -> u32 {
        self.win_losses.iter().map(|wl| wl.games).sum()
    }

    /// The race with the most games, if any race has games at all.
    /// Ties keep the first row.
    pub fn primary_race(&self) -> Option<Race> {
        let mut best: Option<&RaceSummary> = None;
        for row in self.win_losses.iter().filter(|r| r.games > 0) {
            if best.map_or(true, |b| row.games > b.games) {
                best = Some(row);
            }
        }
        best.and_then(RaceSummary::race_kind)
    }
}

// ---------------------------------------------------------------------------
// Hero statistics
// ---------------------------------------------------------------------------

/// Name of the aggregate map bucket in hero statistics.
pub const OVERALL_MAP: &str = "Overall";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStatsResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub hero_stats_item_list: Vec<HeroStatsItem>,
}

/// One hero's map-by-race breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStatsItem {
    #[serde(default, deserialize_with = "lenient::id")]
    pub hero_id: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub stats: Vec<HeroRaceStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRaceStats {
    #[serde(default, deserialize_with = "lenient::value")]
    pub race: u32,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub win_losses_on_map: Vec<MapWinLosses>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapWinLosses {
    #[serde(default, deserialize_with = "lenient::value")]
    pub map: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub win_losses: Vec<RaceSummary>,
}

impl HeroStatsItem {
    /// Games summed over every win/loss row of every `Overall` bucket.
    pub fn overall_games(&self) -> u32 {
        self.stats
            .iter()
            .flat_map(|s| s.win_losses_on_map.iter())
            .filter(|m| m.map == OVERALL_MAP)
            .flat_map(|m| m.win_losses.iter())
            .map(|wl| wl.games)
            .sum()
    }

    pub fn usage(&self) -> HeroUsage {
        HeroUsage {
            hero_id: self.hero_id.clone(),
            total_games_overall: self.overall_games(),
        }
    }
}

/// Per-hero game total derived from the `Overall` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroUsage {
    pub hero_id: String,
    pub total_games_overall: u32,
}

/// Hero rows unique by hero id, in insertion order: current-season rows in
/// upstream order, then rows only the previous season had.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedHeroStats {
    #[serde(rename = "heroStatsItemList")]
    items: Vec<HeroStatsItem>,
}

impl MergedHeroStats {
    /// Insert a row unless its hero is already present. Returns whether the
    /// row was added. Rows without a hero id are ignored.
    pub(crate) fn insert_if_absent(&mut self, item: HeroStatsItem) -> bool {
        if item.hero_id.is_empty() || self.get(&item.hero_id).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn get(&self, hero_id: &str) -> Option<&HeroStatsItem> {
        self.items.iter().find(|i| i.hero_id == hero_id)
    }

    pub fn items(&self) -> &[HeroStatsItem] {
        &self.items
    }

    pub fn usage(&self) -> impl Iterator<Item = HeroUsage> + '_ {
        self.items.iter().map(HeroStatsItem::usage)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSearchResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayer {
    #[serde(default, deserialize_with = "lenient::value")]
    pub battle_tag: String,
    #[serde(default, deserialize_with = "lenient::value", skip_serializing_if = "Option::is_none")]
    pub hero_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub race: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, deserialize_with = "lenient::value")]
    pub won: bool,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub players: Vec<MatchPlayer>,
}

/// One finished match from match search.
///
/// The timestamp fields are kept raw; their name and format vary between
/// upstream revisions and are resolved by the activity rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::value")]
    pub map_name: String,
    #[serde(default, deserialize_with = "lenient::value")]
    pub duration_in_seconds: u32,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
}

/// Most-recent-first matches assembled across seasons.
///
/// Never longer than the requested target, never holds two matches with the
/// same non-empty id, and newer-season matches always precede older ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedRecentMatches {
    pub matches: Vec<MatchRecord>,
    /// How many of `matches` came from the current season (they come first).
    pub from_current_season: usize,
    pub from_previous_season: usize,
}

impl UnifiedRecentMatches {
    pub fn as_slice(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// `matches/ongoing/{tag}` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingMatch {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "mapName", deserialize_with = "lenient::value")]
    pub map: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
}

impl OngoingMatch {
    /// Every player in the match other than `tag`, in team order. Rows with
    /// an empty battle tag are skipped.
    pub fn opponents_of<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a MatchPlayer> + 'a {
        self.teams
            .iter()
            .flat_map(|t| t.players.iter())
            .filter(move |p| !p.battle_tag.is_empty() && p.battle_tag != tag)
    }
}
