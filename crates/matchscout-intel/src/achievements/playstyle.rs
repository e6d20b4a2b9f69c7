// Playstyle and economy badges.
//
// There is no resource telemetry upstream: "economy" here is a declared
// heuristic over match duration and outcome, nothing more.

use serde::Serialize;

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::model::MatchRecord;
use crate::outcome::resolve_outcome;
use crate::rules::Rules;

// ---------------------------------------------------------------------------
// Duration pattern
// ---------------------------------------------------------------------------

/// Mean duration of the non-zero durations among `matches`.
pub fn mean_duration(matches: &[MatchRecord]) -> Option<f64> {
    let durations: Vec<u32> = matches
        .iter()
        .map(|m| m.duration_in_seconds)
        .filter(|&d| d > 0)
        .collect();
    if durations.is_empty() {
        return None;
    }
    let sum: u64 = durations.iter().map(|&d| u64::from(d)).sum();
    Some(sum as f64 / durations.len() as f64)
}

pub fn duration_badge(matches: &[MatchRecord], rules: &Rules) -> Option<Achievement> {
    if matches.len() < rules.playstyle_min_matches {
        return None;
    }
    let window = &matches[..rules.playstyle_window.min(matches.len())];
    let mean = mean_duration(window)?;

    if mean < 300.0 {
        Some(Achievement::new(
            AchievementCategory::Playstyle,
            BadgeColor::Red,
            "⚡ Blitzkrieger",
            "Fast games on average",
        ))
    } else if mean > 1800.0 {
        Some(Achievement::new(
            AchievementCategory::Playstyle,
            BadgeColor::Blue,
            "🐌 Strategist",
            "Long, deliberate games",
        ))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomyVerdict {
    GreatEconomy,
    PoorEconomy,
    Hoarder,
    NoEconomy,
    Balanced,
}

/// Duration/outcome table for one match. The first matching row wins:
///
/// | result | duration      | verdict        |
/// |--------|---------------|----------------|
/// | win    | < 600         | great economy  |
/// | loss   | > 1800        | poor economy   |
/// | win    | > 1200        | hoarder        |
/// | loss   | < 480         | no economy     |
/// | win    | 600..=1200    | balanced       |
pub fn economy_verdict(duration: u32, won: bool) -> Option<EconomyVerdict> {
    match (won, duration) {
        (true, d) if d < 600 => Some(EconomyVerdict::GreatEconomy),
        (false, d) if d > 1800 => Some(EconomyVerdict::PoorEconomy),
        (true, d) if d > 1200 => Some(EconomyVerdict::Hoarder),
        (false, d) if d < 480 => Some(EconomyVerdict::NoEconomy),
        (true, _) => Some(EconomyVerdict::Balanced),
        (false, _) => None,
    }
}

impl EconomyVerdict {
    pub fn badge(self) -> Achievement {
        let (color, title, description) = match self {
            EconomyVerdict::GreatEconomy => (
                BadgeColor::Green,
                "💰 Economic Genius",
                "Quick win - great economy",
            ),
            EconomyVerdict::PoorEconomy => (
                BadgeColor::Red,
                "💸 Can't Gather",
                "Long loss - weak economy",
            ),
            EconomyVerdict::Hoarder => (
                BadgeColor::Blue,
                "🏦 Hoarder",
                "Long win - banked resources",
            ),
            EconomyVerdict::NoEconomy => (
                BadgeColor::Red,
                "💔 Broke",
                "Quick loss - no economy",
            ),
            EconomyVerdict::Balanced => (BadgeColor::Green, "⚖️ Balanced", "Steady economy"),
        };
        Achievement::new(AchievementCategory::Economy, color, title, description)
    }
}

/// Single-match verdict for the most recent match, then the multi-match
/// trend badges.
pub fn economy_badges(matches: &[MatchRecord], tag: &str, rules: &Rules) -> Vec<Achievement> {
    let mut badges = Vec::new();

    if let Some(latest) = matches.first() {
        let outcome = resolve_outcome(latest, tag);
        if let (Some(won), d) = (outcome.won, outcome.duration_seconds) {
            if d > 0 {
                badges.extend(economy_verdict(d, won).map(EconomyVerdict::badge));
            }
        }
    }

    if matches.len() >= rules.playstyle_min_matches {
        let window = &matches[..rules.playstyle_window.min(matches.len())];
        let (short_wins, long_losses) = window
            .iter()
            .map(|m| resolve_outcome(m, tag))
            .fold((0, 0), |(sw, ll), o| match o.won {
                Some(true) if o.duration_seconds < 600 => (sw + 1, ll),
                Some(false) if o.duration_seconds > 1200 => (sw, ll + 1),
                _ => (sw, ll),
            });

        if short_wins >= 3 {
            badges.push(Achievement::new(
                AchievementCategory::Economy,
                BadgeColor::Yellow,
                "⚡ Economic Rush",
                "Master of the fast economy",
            ));
        }
        if long_losses >= 3 {
            badges.push(Achievement::new(
                AchievementCategory::Economy,
                BadgeColor::Red,
                "🐌 Slow Saver",
                "Weak late-game economy",
            ));
        }
    }

    badges
}
