pub mod achievements;
pub mod engine;
pub mod gateway;
pub mod heroes;
pub mod model;
pub mod outcome;
pub mod reconcile;
pub mod rules;
pub mod sink;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use engine::{CheckStatus, Engine, EngineSettings, MatchCheck, OpponentReport, PlayerStatsReport};
pub use gateway::{Endpoint, HttpGateway, HttpSettings, StatGateway};
pub use sink::{HistorySink, LookupSink};
