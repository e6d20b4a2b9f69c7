// Win/loss streak badges.

use serde::Serialize;

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::model::MatchRecord;
use crate::outcome::resolve_outcome;
use crate::rules::Rules;

/// A run of identical outcomes starting at the most recent resolvable match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub won: bool,
    pub length: usize,
}

/// Walk `matches` (most recent first), skipping matches where `tag` cannot
/// be found, and count how long the first outcome repeats.
pub fn current_streak(matches: &[MatchRecord], tag: &str) -> Option<Streak> {
    let mut kind: Option<bool> = None;
    let mut length = 0;

    for record in matches {
        let Some(won) = resolve_outcome(record, tag).won else {
            continue;
        };
        match kind {
            None => {
                kind = Some(won);
                length = 1;
            }
            Some(k) if k == won => length += 1,
            Some(_) => break,
        }
    }

    kind.map(|won| Streak { won, length })
}

pub fn streak_badge(matches: &[MatchRecord], tag: &str, rules: &Rules) -> Option<Achievement> {
    if matches.len() < rules.streak_min_matches {
        return None;
    }
    let Streak { won, length } = current_streak(matches, tag)?;

    use AchievementCategory::Streak as Cat;
    let badge = match (won, length) {
        (true, n) if n >= 5 => Achievement::new(
            Cat,
            BadgeColor::Purple,
            "🚀 Unstoppable!",
            format!("{n} wins in a row - legendary!"),
        ),
        (false, n) if n >= 5 => Achievement::new(
            Cat,
            BadgeColor::Red,
            "💀 Catastrophe",
            format!("{n} losses in a row - a nightmare!"),
        ),
        (true, n) if n >= 3 => {
            Achievement::new(Cat, BadgeColor::Red, "🔥 On Fire!", format!("{n} wins in a row"))
        }
        (false, n) if n >= 3 => Achievement::new(
            Cat,
            BadgeColor::Gray,
            "😤 It's the Internet!",
            format!("{n} losses in a row"),
        ),
        (true, 2) => Achievement::new(Cat, BadgeColor::Yellow, "🎯 On a Roll", "2 wins in a row"),
        (false, 2) => Achievement::new(Cat, BadgeColor::Yellow, "😠 Out of Luck", "2 losses in a row"),
        _ => return None,
    };
    Some(badge)
}
