// Opponent intelligence engine: the entry point that threads a gateway and an
// optional sink through fetch, reconcile and classify.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use matchscout_core::config::Config;

use crate::achievements::{self, Achievement, AchievementInput};
use crate::gateway::{fetch_as, Endpoint, StatGateway};
use crate::model::{BasicStats, MatchRecord, MergedHeroStats, OngoingMatch, Race, UnifiedRecentMatches};
use crate::reconcile::{Reconciler, Seasons};
use crate::rules::{RuleVersion, Rules};
use crate::sink::LookupSink;
use crate::strategy::{self, PlayerStrategicProfile};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub rules: Rules,
    /// Region code for race stats and match search.
    pub region: u32,
    pub seasons: Seasons,
    pub recent_match_target: usize,
    pub player_stats_matches: usize,
    pub strategy_sample: usize,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let version: RuleVersion = config
            .analysis
            .ruleset
            .parse()
            .context("invalid analysis.ruleset")?;
        Ok(Self {
            rules: Rules::for_version(version),
            region: config.api.gateway,
            seasons: Seasons {
                current: config.api.current_season,
                previous: config.api.previous_season(),
            },
            recent_match_target: config.analysis.recent_match_target,
            player_stats_matches: config.analysis.player_stats_matches,
            strategy_sample: config.analysis.strategy_sample,
        })
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            region: 20,
            seasons: Seasons {
                current: 23,
                previous: 22,
            },
            recent_match_target: 20,
            player_stats_matches: 50,
            strategy_sample: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Everything known about one player.
#[derive(Debug, Clone, Serialize)]
pub struct OpponentReport {
    pub battle_tag: String,
    pub race: Option<Race>,
    pub basic_stats: Option<BasicStats>,
    /// Passed through from upstream as-is.
    pub race_stats: Option<Value>,
    pub hero_stats: Option<MergedHeroStats>,
    pub recent_matches: Option<UnifiedRecentMatches>,
    pub achievements: Vec<Achievement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategic_profile: Option<PlayerStrategicProfile>,
    pub ruleset: RuleVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    InGame,
    NotInGame,
}

/// Result of looking up whether a player is in a match right now.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCheck {
    pub status: CheckStatus,
    pub battle_tag: String,
    #[serde(rename = "match")]
    pub ongoing: Option<OngoingMatch>,
    pub opponents: Vec<OpponentReport>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatsReport {
    pub battle_tag: String,
    pub basic_stats: Option<BasicStats>,
    /// Current season only, most recent first.
    pub recent_matches: Vec<MatchRecord>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine {
    gateway: Arc<dyn StatGateway>,
    sink: Option<Arc<dyn LookupSink>>,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(gateway: Arc<dyn StatGateway>, settings: EngineSettings) -> Self {
        Self {
            gateway,
            sink: None,
            settings,
        }
    }

    /// Persist every `check_match` result through `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn LookupSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(
            self.gateway.as_ref(),
            self.settings.region,
            self.settings.seasons,
            self.settings.rules.cross_season,
        )
    }

    pub async fn ongoing_match(&self, tag: &str) -> Option<OngoingMatch> {
        let endpoint = Endpoint::OngoingMatch { tag: tag.to_string() };
        fetch_as(self.gateway.as_ref(), &endpoint).await
    }

    pub async fn basic_stats(&self, tag: &str) -> Option<BasicStats> {
        let endpoint = Endpoint::PlayerSummary { tag: tag.to_string() };
        fetch_as(self.gateway.as_ref(), &endpoint).await
    }

    pub async fn race_stats(&self, tag: &str) -> Option<Value> {
        let endpoint = Endpoint::RaceStats {
            tag: tag.to_string(),
            gateway: self.settings.region,
            season: self.settings.seasons.current,
        };
        self.gateway.fetch(&endpoint).await
    }

    pub async fn merged_hero_stats(&self, tag: &str) -> Option<MergedHeroStats> {
        self.reconciler().hero_stats(tag).await
    }

    pub async fn recent_matches(&self, tag: &str, target: usize) -> Option<UnifiedRecentMatches> {
        self.reconciler().recent_matches(tag, target).await
    }

    pub async fn scout_opponent(&self, tag: &str, race: Option<Race>) -> OpponentReport {
        self.scout_opponent_at(tag, race, Utc::now()).await
    }

    /// Full report with an explicit clock. When `race` is not given the
    /// player's most-played race is used.
    pub async fn scout_opponent_at(&self, tag: &str, race: Option<Race>, now: DateTime<Utc>) -> OpponentReport {
        info!(tag, "scouting player");
        let (basic_stats, race_stats, hero_stats, recent_matches) = tokio::join!(
            self.basic_stats(tag),
            self.race_stats(tag),
            self.merged_hero_stats(tag),
            self.recent_matches(tag, self.settings.recent_match_target),
        );

        let race = race.or_else(|| basic_stats.as_ref().and_then(BasicStats::primary_race));
        let matches = recent_matches
            .as_ref()
            .map(UnifiedRecentMatches::as_slice)
            .unwrap_or_default();

        let rules = &self.settings.rules;
        let achievements = achievements::classify(
            &AchievementInput {
                basic_stats: basic_stats.as_ref(),
                hero_stats: hero_stats.as_ref(),
                recent_matches: matches,
                race,
                battle_tag: Some(tag),
                now,
            },
            rules,
        );
        let strategic_profile = if rules.replay_simulation {
            strategy::estimate_profile(matches, self.settings.strategy_sample)
        } else {
            None
        };

        info!(
            tag,
            matches = matches.len(),
            heroes = hero_stats.as_ref().map_or(0, MergedHeroStats::len),
            badges = achievements.len(),
            "player scouted"
        );

        OpponentReport {
            battle_tag: tag.to_string(),
            race,
            basic_stats,
            race_stats,
            hero_stats,
            recent_matches,
            achievements,
            strategic_profile,
            ruleset: rules.version,
        }
    }

    pub async fn check_match(&self, tag: &str) -> MatchCheck {
        self.check_match_at(tag, Utc::now()).await
    }

    /// Look up the player's ongoing match and scout every opponent in it
    /// concurrently. The result is handed to the sink (if any) before it is
    /// returned; a sink failure is logged, not propagated.
    pub async fn check_match_at(&self, tag: &str, now: DateTime<Utc>) -> MatchCheck {
        let check = match self.ongoing_match(tag).await {
            None => MatchCheck {
                status: CheckStatus::NotInGame,
                battle_tag: tag.to_string(),
                ongoing: None,
                opponents: Vec::new(),
                checked_at: now,
            },
            Some(ongoing) => {
                let opponents = join_all(
                    ongoing
                        .opponents_of(tag)
                        .map(|p| self.scout_opponent_at(&p.battle_tag, Race::from_code(p.race), now)),
                )
                .await;
                MatchCheck {
                    status: CheckStatus::InGame,
                    battle_tag: tag.to_string(),
                    ongoing: Some(ongoing),
                    opponents,
                    checked_at: now,
                }
            }
        };

        info!(tag, status = ?check.status, opponents = check.opponents.len(), "match check complete");

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.record(&check) {
                error!(tag, "failed to record match check: {e:#}");
            }
        }
        check
    }

    /// Summary plus the most recent matches of the current season.
    pub async fn player_stats(&self, tag: &str) -> PlayerStatsReport {
        let reconciler = self.reconciler();
        let (basic_stats, recent_matches) = tokio::join!(
            self.basic_stats(tag),
            reconciler.search(tag, self.settings.player_stats_matches, self.settings.seasons.current),
        );
        PlayerStatsReport {
            battle_tag: tag.to_string(),
            basic_stats,
            recent_matches: recent_matches
                .into_iter()
                .take(self.settings.player_stats_matches)
                .collect(),
        }
    }
}
