// Experience and win-rate badges from the lifetime summary.

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::model::BasicStats;

/// Experience badge (if any) followed by skill badge (if any).
pub fn skill_badges(stats: &BasicStats) -> Vec<Achievement> {
    let wins = u64::from(stats.total_wins());
    let games = u64::from(stats.total_games());
    if games == 0 {
        return Vec::new();
    }

    let mut badges = Vec::new();

    if games >= 1000 {
        badges.push(Achievement::new(
            AchievementCategory::Experience,
            BadgeColor::Purple,
            "👑 Veteran",
            format!("{games} games played"),
        ));
    } else if games >= 500 {
        badges.push(Achievement::new(
            AchievementCategory::Experience,
            BadgeColor::Blue,
            "🎖️ Seasoned Fighter",
            format!("{games} games played"),
        ));
    }

    let rate = wins as f64 / games as f64;
    let percent = wins * 100 / games;
    if rate >= 0.75 && games >= 100 {
        badges.push(Achievement::new(
            AchievementCategory::Skill,
            BadgeColor::Purple,
            "💎 Legend",
            format!("{percent}% win rate over {games} games"),
        ));
    } else if rate >= 0.6 && games >= 50 {
        badges.push(Achievement::new(
            AchievementCategory::Skill,
            BadgeColor::Blue,
            "⭐ Master",
            format!("{percent}% win rate"),
        ));
    } else if rate <= 0.35 && games >= 50 {
        badges.push(Achievement::new(
            AchievementCategory::Spirit,
            BadgeColor::Green,
            "😅 Still Learning",
            format!("{percent}% win rate, but never giving up!"),
        ));
    }

    badges
}
