// Per-player result of a single match.

use serde::Serialize;

use crate::model::MatchRecord;

/// Hero reported when the player row carries no hero id.
pub const UNKNOWN_HERO: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    /// `None` when the player was not found in the match.
    pub won: Option<bool>,
    pub hero_used: Option<String>,
    pub map: String,
    pub duration_seconds: u32,
}

/// Find `tag` in the match teams (first occurrence wins) and report that
/// team's result and the player's hero.
pub fn resolve_outcome(record: &MatchRecord, tag: &str) -> MatchOutcome {
    let found = record.teams.iter().find_map(|team| {
        team.players
            .iter()
            .find(|p| p.battle_tag == tag)
            .map(|p| (team.won, p))
    });

    let (won, hero_used) = match found {
        Some((won, player)) => {
            let hero = player
                .hero_id
                .as_deref()
                .filter(|h| !h.is_empty())
                .unwrap_or(UNKNOWN_HERO);
            (Some(won), Some(hero.to_string()))
        }
        None => (None, None),
    };

    MatchOutcome {
        won,
        hero_used,
        map: record.map_name.clone(),
        duration_seconds: record.duration_in_seconds,
    }
}
