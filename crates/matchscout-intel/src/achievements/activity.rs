// Activity badge: how recently and how much the player has been playing.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::Value;

use super::{Achievement, AchievementCategory, BadgeColor};
use crate::model::MatchRecord;

// ---------------------------------------------------------------------------
// Timestamp resolution
// ---------------------------------------------------------------------------

/// One way of reading a raw timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// `2025-03-10T12:00:00Z`, `2025-03-10T12:00:00+02:00`
    Rfc3339,
    /// ISO date-time without offset, read as UTC.
    NaiveIso,
    /// Epoch seconds carried as text.
    EpochText,
    /// Epoch seconds as a JSON number.
    EpochNumber,
}

/// Tried in order for each field; the first strategy that parses wins.
pub const STRATEGIES: [TimestampStrategy; 4] = [
    TimestampStrategy::Rfc3339,
    TimestampStrategy::NaiveIso,
    TimestampStrategy::EpochText,
    TimestampStrategy::EpochNumber,
];

impl TimestampStrategy {
    pub fn parse(self, raw: &Value) -> Option<DateTime<Utc>> {
        match (self, raw) {
            (TimestampStrategy::Rfc3339, Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            (TimestampStrategy::NaiveIso, Value::String(s)) => {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|t| t.and_utc())
            }
            (TimestampStrategy::EpochText, Value::String(s)) => {
                s.trim().parse::<f64>().ok().and_then(from_epoch_seconds)
            }
            (TimestampStrategy::EpochNumber, Value::Number(n)) => n.as_f64().and_then(from_epoch_seconds),
            _ => None,
        }
    }
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Empty strings, zero and null mean "not recorded".
fn is_set(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => true,
    }
}

/// Resolve when a match was played from the first timestamp field
/// (`startTime`, `timestamp`, `createdAt`, `endTime`) that parses.
pub fn match_timestamp(record: &MatchRecord) -> Option<DateTime<Utc>> {
    [
        record.start_time.as_ref(),
        record.timestamp.as_ref(),
        record.created_at.as_ref(),
        record.end_time.as_ref(),
    ]
    .into_iter()
    .flatten()
    .filter(|raw| is_set(raw))
    .find_map(|raw| STRATEGIES.iter().find_map(|s| s.parse(raw)))
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    /// Same UTC calendar day as `now`.
    pub today: usize,
    /// The UTC calendar day before.
    pub yesterday: usize,
    /// Within the last seven days (overlaps with the two above).
    pub week: usize,
}

pub fn count_activity(matches: &[MatchRecord], now: DateTime<Utc>) -> ActivityCounts {
    let today = now.date_naive();
    let yesterday = today.pred_opt();
    let week_start = now - Duration::days(7);

    let mut counts = ActivityCounts::default();
    for played in matches.iter().filter_map(match_timestamp) {
        let day = played.date_naive();
        if day == today {
            counts.today += 1;
        } else if Some(day) == yesterday {
            counts.yesterday += 1;
        }
        if played >= week_start {
            counts.week += 1;
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

/// Always yields exactly one badge.
pub fn activity_badge(matches: &[MatchRecord], now: DateTime<Utc>) -> Achievement {
    use AchievementCategory::Activity as Cat;

    if matches.is_empty() {
        return Achievement::new(Cat, BadgeColor::Yellow, "😴 Just Woke Up", "No recent games");
    }

    let counts = count_activity(matches, now);
    match counts {
        ActivityCounts { today, .. } if today >= 5 => Achievement::new(
            Cat,
            BadgeColor::Blue,
            "🎮 Gamer",
            format!("{today} games today - can't stop playing!"),
        ),
        ActivityCounts { today, .. } if today >= 2 => Achievement::new(
            Cat,
            BadgeColor::Green,
            "🔥 In the Zone",
            format!("{today} games today - in form"),
        ),
        ActivityCounts { today: 1, .. } => {
            Achievement::new(Cat, BadgeColor::Green, "🌅 Starting the Day", "1 game today")
        }
        ActivityCounts { yesterday, .. } if yesterday > 0 => Achievement::new(
            Cat,
            BadgeColor::Yellow,
            "🌙 Yesterday's Fighter",
            format!("Last active yesterday ({yesterday} games)"),
        ),
        ActivityCounts { week, .. } if week > 0 => Achievement::new(
            Cat,
            BadgeColor::Yellow,
            "🎯 Warm-up",
            format!("{week} games this week"),
        ),
        _ => sample_size_badge(matches.len()),
    }
}

/// Used when no match could be placed in the last week.
fn sample_size_badge(count: usize) -> Achievement {
    use AchievementCategory::Activity as Cat;
    match count {
        n if n >= 10 => Achievement::new(
            Cat,
            BadgeColor::Blue,
            "🎮 Gamer",
            format!("{n} recent games - active player"),
        ),
        n if n >= 5 => Achievement::new(
            Cat,
            BadgeColor::Green,
            "🔥 In the Zone",
            format!("{n} recent games - in form"),
        ),
        n if n >= 2 => Achievement::new(
            Cat,
            BadgeColor::Green,
            "🌅 Starting the Day",
            format!("{n} recent games"),
        ),
        _ => Achievement::new(Cat, BadgeColor::Yellow, "🎯 Warm-up", "1 recent game"),
    }
}
