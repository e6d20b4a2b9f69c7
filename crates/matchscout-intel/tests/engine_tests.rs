// End-to-end tests for the opponent intelligence engine.
//
// The engine runs against an in-process gateway serving JSON fixtures, so
// every fetch, merge and classification step is exercised without network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use matchscout_core::db::Database;
use matchscout_intel::achievements::AchievementCategory;
use matchscout_intel::engine::{CheckStatus, Engine, EngineSettings, MatchCheck};
use matchscout_intel::gateway::{Endpoint, StatGateway};
use matchscout_intel::model::Race;
use matchscout_intel::rules::{RuleVersion, Rules};
use matchscout_intel::sink::{HistorySink, LookupSink};
use matchscout_intel::strategy::StrategyType;

// ===========================================================================
// Test helpers
// ===========================================================================

const FIXTURES: &str = "tests/fixtures";

const ME: &str = "Me#1234";
const FOE: &str = "Foe#5678";

fn fixture(name: &str) -> Value {
    let path = format!("{FIXTURES}/{name}");
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    serde_json::from_str(&text).unwrap()
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Default)]
struct FixtureGateway {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<Endpoint>>,
}

impl FixtureGateway {
    fn with(mut self, endpoint: Endpoint, body: Value) -> Self {
        self.responses.insert(endpoint.path(), body);
        self
    }

    fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    fn searched_seasons(&self, tag: &str) -> Vec<(u32, usize)> {
        self.calls()
            .into_iter()
            .filter_map(|ep| match ep {
                Endpoint::MatchSearch {
                    tag: t,
                    season,
                    page_size,
                    ..
                } if t == tag => Some((season, page_size)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl StatGateway for FixtureGateway {
    async fn fetch(&self, endpoint: &Endpoint) -> Option<Value> {
        self.calls.lock().unwrap().push(endpoint.clone());
        self.responses.get(&endpoint.path()).cloned()
    }
}

fn summary(tag: &str) -> Endpoint {
    Endpoint::PlayerSummary { tag: tag.into() }
}

fn heroes(tag: &str, season: u32) -> Endpoint {
    Endpoint::HeroStats {
        tag: tag.into(),
        season,
    }
}

fn search(tag: &str, page_size: usize, season: u32) -> Endpoint {
    Endpoint::MatchSearch {
        tag: tag.into(),
        gateway: 20,
        offset: 0,
        page_size,
        season,
    }
}

/// `count` matches for `tag`, ids `{prefix}-{i}`, all played on the morning
/// of `now()` with the given result and duration.
fn matches(prefix: &str, count: usize, tag: &str, won: bool, duration: u32) -> Value {
    let list: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{prefix}-{i}"),
                "mapName": "Amazonia",
                "durationInSeconds": duration,
                "startTime": "2025-03-10T09:00:00Z",
                "teams": [
                    { "won": won, "players": [{ "battleTag": tag, "heroId": "paladin", "race": 1 }] },
                    { "won": !won, "players": [{ "battleTag": "Rival#0001", "heroId": "lich", "race": 8 }] }
                ]
            })
        })
        .collect();
    json!({ "matches": list })
}

fn engine(gateway: FixtureGateway) -> (Engine, Arc<FixtureGateway>) {
    engine_with(gateway, EngineSettings::default())
}

fn engine_with(gateway: FixtureGateway, settings: EngineSettings) -> (Engine, Arc<FixtureGateway>) {
    let gateway = Arc::new(gateway);
    (Engine::new(gateway.clone(), settings), gateway)
}

// ===========================================================================
// Reconciliation through the engine
// ===========================================================================

#[tokio::test]
async fn hero_stats_prefer_current_season_rows() {
    let (engine, _) = engine(
        FixtureGateway::default()
            .with(heroes(FOE, 23), fixture("hero_stats_current.json"))
            .with(heroes(FOE, 22), fixture("hero_stats_previous.json")),
    );

    let merged = engine.merged_hero_stats(FOE).await.unwrap();
    let order: Vec<&str> = merged.items().iter().map(|i| i.hero_id.as_str()).collect();
    assert_eq!(order, vec!["demonhunter", "keeperofthegrove", "warden", "pitlord"]);
    assert_eq!(merged.get("demonhunter").unwrap().overall_games(), 8);
}

#[tokio::test]
async fn twelve_plus_fifteen_fills_twenty() {
    let (engine, gw) = engine(
        FixtureGateway::default()
            .with(search(FOE, 20, 23), matches("s23", 12, FOE, true, 700))
            .with(search(FOE, 8, 22), matches("s22", 15, FOE, false, 700)),
    );

    let unified = engine.recent_matches(FOE, 20).await.unwrap();
    assert_eq!(unified.len(), 20);
    assert_eq!(unified.from_current_season, 12);
    assert_eq!(unified.from_previous_season, 8);
    assert_eq!(unified.matches[11].id, "s23-11");
    assert_eq!(unified.matches[12].id, "s22-0");
    assert_eq!(unified.matches[19].id, "s22-7");
    assert_eq!(gw.searched_seasons(FOE), vec![(23, 20), (22, 8)]);
}

#[tokio::test]
async fn full_current_season_never_touches_previous() {
    let (engine, gw) = engine(
        FixtureGateway::default().with(search(FOE, 20, 23), matches("s23", 20, FOE, true, 700)),
    );

    let unified = engine.recent_matches(FOE, 20).await.unwrap();
    assert_eq!(unified.len(), 20);
    assert_eq!(gw.searched_seasons(FOE), vec![(23, 20)]);
}

// ===========================================================================
// Scouting
// ===========================================================================

#[tokio::test]
async fn human_specialist_without_history() {
    let (engine, _) = engine(
        FixtureGateway::default().with(summary(FOE), fixture("player_summary_specialist.json")),
    );

    let report = engine.scout_opponent_at(FOE, Some(Race::Human), now()).await;
    assert!(report.hero_stats.is_none());
    assert!(report.recent_matches.is_none());
    assert!(report.strategic_profile.is_none());

    let categories: Vec<AchievementCategory> = report.achievements.iter().map(|a| a.category).collect();
    assert_eq!(
        categories,
        vec![
            AchievementCategory::Activity,
            AchievementCategory::Skill,
            AchievementCategory::Focus,
        ]
    );
    assert_eq!(report.achievements[0].title, "😴 Just Woke Up");
    assert!(report.achievements[2].description.contains("Human"));
}

#[tokio::test]
async fn full_report_for_active_player() {
    let (engine, _) = engine(
        FixtureGateway::default()
            .with(summary(FOE), fixture("player_summary_multirace.json"))
            .with(heroes(FOE, 23), fixture("hero_stats_current.json"))
            .with(heroes(FOE, 22), fixture("hero_stats_previous.json"))
            .with(search(FOE, 20, 23), matches("s23", 20, FOE, true, 250))
            .with(
                Endpoint::RaceStats {
                    tag: FOE.into(),
                    gateway: 20,
                    season: 23,
                },
                json!([{ "race": 4, "wins": 10 }]),
            ),
    );

    let report = engine.scout_opponent_at(FOE, None, now()).await;

    // Most played race in the summary is Night Elf.
    assert_eq!(report.race, Some(Race::NightElf));
    assert_eq!(report.race_stats, Some(json!([{ "race": 4, "wins": 10 }])));

    let titles: Vec<&str> = report.achievements.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "🦉 Warden",
            "🚀 Unstoppable!",
            "🎮 Gamer",
            "🎖️ Seasoned Fighter",
            "⭐ Master",
            "🎭 Experimenter",
            "⚡ Blitzkrieger",
            "💰 Economic Genius",
            "⚡ Economic Rush",
        ]
    );

    let profile = report.strategic_profile.unwrap();
    assert!(profile.simulated);
    assert_eq!(profile.sample_size, 3);
    assert_eq!(profile.favorite_strategy, StrategyType::Rush);
}

#[tokio::test]
async fn reports_are_identical_for_a_fixed_clock() {
    let gateway = || {
        FixtureGateway::default()
            .with(summary(FOE), fixture("player_summary_multirace.json"))
            .with(heroes(FOE, 23), fixture("hero_stats_current.json"))
            .with(search(FOE, 20, 23), matches("s23", 7, FOE, false, 1900))
            .with(search(FOE, 13, 22), matches("s22", 30, FOE, true, 400))
    };
    let (first, _) = engine(gateway());
    let (second, _) = engine(gateway());

    let a = serde_json::to_string(&first.scout_opponent_at(FOE, None, now()).await).unwrap();
    let b = serde_json::to_string(&second.scout_opponent_at(FOE, None, now()).await).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn single_season_rules_skip_previous_season_and_simulation() {
    let settings = EngineSettings {
        rules: Rules::for_version(RuleVersion::V1),
        ..EngineSettings::default()
    };
    let (engine, gw) = engine_with(
        FixtureGateway::default()
            .with(heroes(FOE, 22), fixture("hero_stats_previous.json"))
            .with(search(FOE, 20, 23), matches("s23", 4, FOE, true, 700)),
        settings,
    );

    let report = engine.scout_opponent_at(FOE, Some(Race::NightElf), now()).await;
    assert!(report.hero_stats.is_none());
    assert_eq!(report.recent_matches.unwrap().len(), 4);
    assert!(report.strategic_profile.is_none());
    assert_eq!(report.ruleset, RuleVersion::V1);
    assert!(!gw
        .calls()
        .iter()
        .any(|ep| matches!(ep, Endpoint::HeroStats { season: 22, .. } | Endpoint::MatchSearch { season: 22, .. })));
}

#[tokio::test]
async fn missing_everything_still_produces_a_report() {
    let (engine, _) = engine(FixtureGateway::default());
    let report = engine.scout_opponent_at("Ghost#0000", None, now()).await;
    assert!(report.race.is_none());
    assert!(report.basic_stats.is_none());
    assert_eq!(report.achievements.len(), 1);
}

// ===========================================================================
// Match checks
// ===========================================================================

#[derive(Default)]
struct RecordingSink {
    checks: Mutex<Vec<MatchCheck>>,
}

impl LookupSink for RecordingSink {
    fn record(&self, check: &MatchCheck) -> anyhow::Result<()> {
        self.checks.lock().unwrap().push(check.clone());
        Ok(())
    }
}

struct FailingSink;

impl LookupSink for FailingSink {
    fn record(&self, _check: &MatchCheck) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

#[tokio::test]
async fn check_match_scouts_opponents_with_their_match_race() {
    let sink = Arc::new(RecordingSink::default());
    let (engine, gw) = engine(
        FixtureGateway::default()
            .with(
                Endpoint::OngoingMatch { tag: ME.into() },
                fixture("ongoing_match.json"),
            )
            .with(summary(FOE), fixture("player_summary_multirace.json")),
    );
    let engine = engine.with_sink(sink.clone());

    let check = engine.check_match_at(ME, now()).await;
    assert_eq!(check.status, CheckStatus::InGame);
    assert_eq!(check.ongoing.as_ref().unwrap().map, "Concealed Hill");
    assert_eq!(check.opponents.len(), 1);
    assert_eq!(check.opponents[0].battle_tag, FOE);
    // Race comes from the live match, not the summary's main race.
    assert_eq!(check.opponents[0].race, Some(Race::Human));

    // The querying player is never scouted.
    assert!(!gw.calls().iter().any(|ep| ep.tag() == ME && !matches!(ep, Endpoint::OngoingMatch { .. })));

    let recorded = sink.checks.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].checked_at, now());
}

#[tokio::test]
async fn check_match_not_in_game() {
    let sink = Arc::new(RecordingSink::default());
    let (engine, _) = engine(FixtureGateway::default());
    let engine = engine.with_sink(sink.clone());

    let check = engine.check_match_at(ME, now()).await;
    assert_eq!(check.status, CheckStatus::NotInGame);
    assert!(check.opponents.is_empty());

    let json = serde_json::to_value(&check).unwrap();
    assert_eq!(json["status"], json!("not_in_game"));
    assert_eq!(json["match"], Value::Null);
    assert_eq!(sink.checks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sink_failure_does_not_fail_the_check() {
    let (engine, _) = engine(FixtureGateway::default());
    let engine = engine.with_sink(Arc::new(FailingSink));
    let check = engine.check_match_at(ME, now()).await;
    assert_eq!(check.status, CheckStatus::NotInGame);
}

#[tokio::test]
async fn history_sink_persists_checks() {
    let db = Arc::new(Database::open(":memory:").unwrap());
    let (engine, _) = engine(FixtureGateway::default().with(
        Endpoint::OngoingMatch { tag: ME.into() },
        fixture("ongoing_match.json"),
    ));
    let engine = engine.with_sink(Arc::new(HistorySink::new(db.clone(), 30)));

    engine.check_match_at(ME, now()).await;

    let stored = db.recent_lookups(50).unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_in_game);
    assert_eq!(stored[0].payload["opponents"][0]["battle_tag"], json!(FOE));
}

// ===========================================================================
// Player stats
// ===========================================================================

#[tokio::test]
async fn player_stats_reads_current_season_only() {
    let (engine, gw) = engine(
        FixtureGateway::default()
            .with(summary(FOE), fixture("player_summary_specialist.json"))
            .with(search(FOE, 50, 23), matches("s23", 3, FOE, true, 700))
            .with(search(FOE, 47, 22), matches("s22", 47, FOE, true, 700)),
    );

    let stats = engine.player_stats(FOE).await;
    assert_eq!(stats.basic_stats.unwrap().total_games(), 103);
    assert_eq!(stats.recent_matches.len(), 3);
    assert_eq!(gw.searched_seasons(FOE), vec![(23, 50)]);
}

// ===========================================================================
// Settings
// ===========================================================================

fn config_with_ruleset(ruleset: &str) -> matchscout_core::config::Config {
    serde_json::from_value(json!({
        "api": {
            "base_url": "http://localhost/api",
            "gateway": 20,
            "current_season": 23,
            "stat_timeout_secs": 10,
            "search_timeout_secs": 30
        },
        "analysis": {
            "ruleset": ruleset,
            "recent_match_target": 20,
            "player_stats_matches": 50,
            "strategy_sample": 3
        },
        "history": { "db_path": "", "retention_days": 30 },
        "demo": { "battle_tag": "Siberia#21832", "race": "Night Elf" }
    }))
    .unwrap()
}

#[test]
fn settings_follow_configured_ruleset() {
    let settings = EngineSettings::from_config(&config_with_ruleset("v2")).unwrap();
    assert_eq!(settings.rules, Rules::for_version(RuleVersion::V2));
    assert_eq!(settings.seasons.previous, 22);
}

#[test]
fn unknown_ruleset_is_reported_with_its_name() {
    let err = EngineSettings::from_config(&config_with_ruleset("v9")).unwrap_err();
    assert_eq!(err.to_string(), "invalid analysis.ruleset");
    assert_eq!(err.root_cause().to_string(), "unknown ruleset `v9`");
}
