// Race spread badges.

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::model::{BasicStats, Race};

/// Games a race needs before it counts as "played".
const MIN_RACE_GAMES: u32 = 5;

pub fn diversity_badge(stats: &BasicStats) -> Option<Achievement> {
    let played: Vec<(u32, u32)> = stats
        .win_losses
        .iter()
        .filter(|row| row.games >= MIN_RACE_GAMES)
        .map(|row| (row.race, row.games))
        .collect();
    let total: u32 = played.iter().map(|&(_, games)| games).sum();

    if played.len() >= 3 && total >= 50 {
        let most = played.iter().map(|&(_, g)| g).max().unwrap_or(0);
        let least = played.iter().map(|&(_, g)| g).min().unwrap_or(0);
        let balance = if most > 0 { f64::from(least) / f64::from(most) } else { 0.0 };

        if balance >= 0.5 {
            return Some(Achievement::new(
                AchievementCategory::Diversity,
                BadgeColor::Yellow,
                "🌈 Multi-Racer",
                format!("Balanced play across {} races ({total} games)", played.len()),
            ));
        }
        if played.len() >= 4 {
            return Some(Achievement::new(
                AchievementCategory::Diversity,
                BadgeColor::Blue,
                "🎭 Experimenter",
                format!("Tries many races: {} races", played.len()),
            ));
        }
        return None;
    }

    match played.as_slice() {
        [(race, games)] => Some(Achievement::new(
            AchievementCategory::Focus,
            BadgeColor::Blue,
            "🎯 Specialist",
            format!("Plays only {} ({games} games)", Race::label_for_code(*race)),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats(rows: serde_json::Value) -> BasicStats {
        serde_json::from_value(json!({ "winLosses": rows })).unwrap()
    }

    #[test]
    fn specialist_names_the_race() {
        let badge = diversity_badge(&stats(json!([
            { "race": 4, "games": 120 },
            { "race": 1, "games": 3 }
        ])))
        .unwrap();
        assert_eq!(badge.category, AchievementCategory::Focus);
        assert_eq!(badge.description, "Plays only Night Elf (120 games)");
    }

    #[test]
    fn balanced_multi_race() {
        let badge = diversity_badge(&stats(json!([
            { "race": 1, "games": 30 },
            { "race": 2, "games": 20 },
            { "race": 8, "games": 15 }
        ])))
        .unwrap();
        assert_eq!(badge.title, "🌈 Multi-Racer");
        assert_eq!(badge.description, "Balanced play across 3 races (65 games)");
    }

    #[test]
    fn unbalanced_needs_four_races() {
        let three = stats(json!([
            { "race": 1, "games": 100 },
            { "race": 2, "games": 10 },
            { "race": 8, "games": 10 }
        ]));
        assert!(diversity_badge(&three).is_none());

        let four = stats(json!([
            { "race": 1, "games": 100 },
            { "race": 2, "games": 10 },
            { "race": 4, "games": 6 },
            { "race": 8, "games": 10 }
        ]));
        assert_eq!(diversity_badge(&four).unwrap().title, "🎭 Experimenter");
    }

    #[test]
    fn small_multi_race_sample_gives_nothing() {
        let sparse = stats(json!([
            { "race": 1, "games": 10 },
            { "race": 2, "games": 10 },
            { "race": 8, "games": 10 }
        ]));
        assert!(diversity_badge(&sparse).is_none());

        let two = stats(json!([{ "race": 1, "games": 40 }, { "race": 2, "games": 40 }]));
        assert!(diversity_badge(&two).is_none());
    }

    #[test]
    fn random_rows_use_code_zero() {
        let badge = diversity_badge(&stats(json!([{ "race": 0, "games": 60 }]))).unwrap();
        assert_eq!(badge.description, "Plays only Random (60 games)");
    }
}
