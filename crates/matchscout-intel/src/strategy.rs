// Simulated strategic profile.
//
// No replay files are parsed. Every figure below is derived from match
// duration alone and the serialized profile carries `simulated: true`.

use serde::Serialize;

use crate::model::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Rush,
    TimingAttack,
    Macro,
    LateGame,
}

impl StrategyType {
    pub fn from_duration(seconds: u32) -> Self {
        match seconds {
            s if s < 300 => StrategyType::Rush,
            s if s < 600 => StrategyType::TimingAttack,
            s if s < 1200 => StrategyType::Macro,
            _ => StrategyType::LateGame,
        }
    }

    pub fn aggression(self) -> f64 {
        match self {
            StrategyType::Rush => 0.9,
            StrategyType::TimingAttack => 0.7,
            StrategyType::Macro => 0.5,
            StrategyType::LateGame => 0.3,
        }
    }
}

/// Per-match estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayEstimate {
    pub duration_seconds: u32,
    pub strategy_type: StrategyType,
    pub aggression_level: f64,
    pub estimated_apm: f64,
}

pub fn estimate_match(record: &MatchRecord) -> ReplayEstimate {
    let duration = record.duration_in_seconds;
    let strategy_type = StrategyType::from_duration(duration);
    ReplayEstimate {
        duration_seconds: duration,
        strategy_type,
        aggression_level: strategy_type.aggression(),
        estimated_apm: 150.0 + f64::from(duration) / 10.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStrategicProfile {
    /// Always `true`: the profile is a heuristic, not replay analysis.
    pub simulated: bool,
    pub sample_size: usize,
    pub avg_apm: f64,
    pub favorite_strategy: StrategyType,
    pub avg_aggression: f64,
    pub economy_rating: f64,
    pub build_consistency: f64,
}

fn economy_score(estimate: &ReplayEstimate) -> f64 {
    let mut score: f64 = 0.5;

    score += match estimate.estimated_apm {
        apm if apm >= 200.0 => 0.3,
        apm if apm >= 120.0 => 0.2,
        apm if apm >= 80.0 => 0.1,
        _ => 0.0,
    };
    score += match estimate.duration_seconds {
        d if (600..=1200).contains(&d) => 0.1,
        d if d > 1800 => 0.15,
        d if d < 300 => -0.1,
        _ => 0.0,
    };
    score += match estimate.strategy_type {
        StrategyType::Macro => 0.1,
        StrategyType::Rush => -0.05,
        _ => 0.0,
    };

    score.clamp(0.0, 1.0)
}

/// Aggregate the `sample` most recent matches. `None` when there are none.
pub fn estimate_profile(matches: &[MatchRecord], sample: usize) -> Option<PlayerStrategicProfile> {
    let estimates: Vec<ReplayEstimate> = matches.iter().take(sample).map(estimate_match).collect();
    if estimates.is_empty() {
        return None;
    }
    let n = estimates.len() as f64;

    // Mode with first-seen tie break.
    let mut tally: Vec<(StrategyType, usize)> = Vec::new();
    for e in &estimates {
        match tally.iter_mut().find(|(s, _)| *s == e.strategy_type) {
            Some((_, count)) => *count += 1,
            None => tally.push((e.strategy_type, 1)),
        }
    }
    let mut favorite = tally[0];
    for &(strategy, count) in &tally[1..] {
        if count > favorite.1 {
            favorite = (strategy, count);
        }
    }

    let mut consistency = favorite.1 as f64 / n;
    if consistency >= 0.6 {
        consistency += 0.1;
    }

    Some(PlayerStrategicProfile {
        simulated: true,
        sample_size: estimates.len(),
        avg_apm: estimates.iter().map(|e| e.estimated_apm).sum::<f64>() / n,
        favorite_strategy: favorite.0,
        avg_aggression: estimates.iter().map(|e| e.aggression_level).sum::<f64>() / n,
        economy_rating: estimates.iter().map(economy_score).sum::<f64>() / n,
        build_consistency: consistency.min(1.0),
    })
}
