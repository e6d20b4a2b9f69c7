// Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::gateway::{Endpoint, StatGateway};
use crate::model::MatchRecord;

/// Canned responses keyed by endpoint path. Unknown paths answer `None`.
#[derive(Default)]
pub struct StubGateway {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<Endpoint>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: Endpoint, body: Value) -> Self {
        self.responses.insert(endpoint.path(), body);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn was_called(&self, pred: impl Fn(&Endpoint) -> bool) -> bool {
        self.calls.lock().unwrap().iter().any(pred)
    }
}

#[async_trait]
impl StatGateway for StubGateway {
    async fn fetch(&self, endpoint: &Endpoint) -> Option<Value> {
        self.calls.lock().unwrap().push(endpoint.clone());
        self.responses.get(&endpoint.path()).cloned()
    }
}

pub fn at(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
}

/// Hero statistics payload with one `Overall` row per hero.
pub fn hero_response(rows: &[(&str, u32)]) -> Value {
    let items: Vec<Value> = rows
        .iter()
        .map(|&(hero, games)| {
            json!({
                "heroId": hero,
                "stats": [{
                    "race": 0,
                    "winLossesOnMap": [{
                        "map": "Overall",
                        "winLosses": [{ "race": 1, "wins": games / 2, "losses": games - games / 2, "games": games }]
                    }]
                }]
            })
        })
        .collect();
    json!({ "heroStatsItemList": items })
}

pub fn search_endpoint(tag: &str, page_size: usize, season: u32) -> Endpoint {
    Endpoint::MatchSearch {
        tag: tag.to_string(),
        gateway: 20,
        offset: 0,
        page_size,
        season,
    }
}

/// `count` won matches for `tag` with ids `{prefix}-0`, `{prefix}-1`, ...
pub fn match_page(prefix: &str, count: usize, tag: &str) -> Value {
    let matches: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{prefix}-{i}"),
                "mapName": "Concealed Hill",
                "durationInSeconds": 900,
                "teams": [
                    { "won": true, "players": [{ "battleTag": tag, "heroId": "archmage", "race": 1 }] },
                    { "won": false, "players": [{ "battleTag": "Rival#0001", "heroId": "farseer", "race": 2 }] }
                ]
            })
        })
        .collect();
    json!({ "matches": matches })
}

/// A 1v1 between `tag` and a fixed rival. An empty `start_time` leaves the
/// match undated.
pub fn finished_match(id: &str, tag: &str, won: bool, duration: u32, start_time: &str) -> MatchRecord {
    let mut value = json!({
        "id": id,
        "mapName": "Echo Isles",
        "durationInSeconds": duration,
        "teams": [
            { "won": won, "players": [{ "battleTag": tag, "heroId": "archmage", "race": 1 }] },
            { "won": !won, "players": [{ "battleTag": "Rival#0001", "heroId": "farseer", "race": 2 }] }
        ]
    });
    if !start_time.is_empty() {
        value["startTime"] = json!(start_time);
    }
    serde_json::from_value(value).unwrap()
}
