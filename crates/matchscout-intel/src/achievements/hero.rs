// Main-hero badge.

use tracing::warn;

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::heroes;
use crate::model::{HeroUsage, MergedHeroStats, Race};
use crate::rules::Rules;

const GENERIC_TITLE: &str = "🎲 Signature Hero";

/// The most-played hero `race` may field. Heroes with no games are ignored
/// and ties keep the earlier row.
pub fn main_hero(stats: &MergedHeroStats, race: Race) -> Option<HeroUsage> {
    let mut best: Option<HeroUsage> = None;
    for usage in stats.usage() {
        if usage.total_games_overall == 0 {
            continue;
        }
        if heroes::lookup(&usage.hero_id).is_none() {
            warn!(hero = %usage.hero_id, games = usage.total_games_overall, "hero missing from catalogue");
        }
        if !heroes::allowed_for(race, &usage.hero_id) {
            continue;
        }
        if best
            .as_ref()
            .map_or(true, |b| usage.total_games_overall > b.total_games_overall)
        {
            best = Some(usage);
        }
    }
    best
}

pub fn hero_badge(stats: &MergedHeroStats, race: Race, rules: &Rules) -> Option<Achievement> {
    let main = main_hero(stats, race)?;
    if main.total_games_overall < rules.main_hero_min_games {
        return None;
    }

    let info = heroes::lookup(&main.hero_id);
    let title = info.map_or(GENERIC_TITLE, |h| h.badge_title);
    let name = info.map_or(main.hero_id.as_str(), |h| h.name);
    Some(Achievement::new(
        AchievementCategory::Hero,
        BadgeColor::Blue,
        title,
        format!("Main hero: {name} ({} games)", main.total_games_overall),
    ))
}
