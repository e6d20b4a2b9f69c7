// Achievement classification.
//
// A pure mapping from a merged player profile to an ordered list of badges.
// Each rule group lives in its own module and can be called on its own;
// `classify` runs them in a fixed order so identical inputs (including
// `now`) always produce an identical list.

pub mod activity;
pub mod diversity;
pub mod hero;
pub mod playstyle;
pub mod skill;
pub mod streak;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{BasicStats, MatchRecord, MergedHeroStats, Race};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Hero,
    Streak,
    Activity,
    Experience,
    Skill,
    Spirit,
    Diversity,
    Focus,
    Playstyle,
    Economy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Blue,
    Purple,
    Red,
    Gray,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub color: BadgeColor,
}

impl Achievement {
    pub fn new(
        category: AchievementCategory,
        color: BadgeColor,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            color,
        }
    }
}

/// Everything the classifier looks at. Missing fragments are `None` (or an
/// empty match slice) and simply switch the dependent rules off.
#[derive(Debug, Clone, Copy)]
pub struct AchievementInput<'a> {
    pub basic_stats: Option<&'a BasicStats>,
    pub hero_stats: Option<&'a MergedHeroStats>,
    /// Most recent first.
    pub recent_matches: &'a [MatchRecord],
    pub race: Option<Race>,
    pub battle_tag: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// Run every rule group in order: hero, streak, activity, skill and
/// experience, race diversity, playstyle and economy.
pub fn classify(input: &AchievementInput<'_>, rules: &Rules) -> Vec<Achievement> {
    let matches = input.recent_matches;
    let mut badges = Vec::new();

    if let (Some(stats), Some(race)) = (input.hero_stats, input.race) {
        badges.extend(hero::hero_badge(stats, race, rules));
    }
    if let Some(tag) = input.battle_tag {
        badges.extend(streak::streak_badge(matches, tag, rules));
    }
    badges.push(activity::activity_badge(matches, input.now));
    if let Some(stats) = input.basic_stats {
        badges.extend(skill::skill_badges(stats));
        badges.extend(diversity::diversity_badge(stats));
    }
    badges.extend(playstyle::duration_badge(matches, rules));
    if let Some(tag) = input.battle_tag {
        badges.extend(playstyle::economy_badges(matches, tag, rules));
    }

    badges
}
