// Command-line front end: argument parsing and command dispatch.
//
// Every command produces a JSON document; `main` prints it to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use matchscout_core::battle_tag::BattleTag;
use matchscout_core::config::DemoConfig;
use matchscout_core::db::Database;
use matchscout_intel::model::Race;
use matchscout_intel::Engine;

#[derive(Debug, Parser)]
#[command(name = "matchscout", version, about = "Opponent intelligence for W3Champions players")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a player is in a match and scout their opponents.
    Check { battle_tag: BattleTag },

    /// Full intelligence report for one player.
    Scout {
        battle_tag: BattleTag,
        /// Race to evaluate hero badges against (defaults to the most played).
        #[arg(long)]
        race: Option<Race>,
    },

    /// Lifetime summary and recent current-season matches.
    Stats { battle_tag: BattleTag },

    /// Stored match checks, newest first.
    History {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Report for the configured demo player.
    Demo,
}

/// Long-lived handles shared by every command.
pub struct App {
    pub engine: Engine,
    pub history: Arc<Database>,
    pub demo: DemoConfig,
}

pub async fn run(command: Command, app: &App) -> Result<Value> {
    match command {
        Command::Check { battle_tag } => {
            let check = app.engine.check_match(battle_tag.as_str()).await;
            serde_json::to_value(check).context("failed to serialize match check")
        }
        Command::Scout { battle_tag, race } => {
            let report = app.engine.scout_opponent(battle_tag.as_str(), race).await;
            serde_json::to_value(report).context("failed to serialize report")
        }
        Command::Stats { battle_tag } => {
            let stats = app.engine.player_stats(battle_tag.as_str()).await;
            serde_json::to_value(stats).context("failed to serialize player stats")
        }
        Command::History { limit } => {
            let stored = app.history.recent_lookups(limit)?;
            Ok(json!({ "match_history": stored }))
        }
        Command::Demo => {
            let tag = BattleTag::parse(&app.demo.battle_tag).context("invalid demo.battle_tag")?;
            let race: Race = app
                .demo
                .race
                .parse()
                .with_context(|| format!("invalid demo.race `{}`", app.demo.race))?;
            info!(tag = %tag, race = %race, "running demo report");
            let report = app.engine.scout_opponent(tag.as_str(), Some(race)).await;
            Ok(json!({ "demo": true, "report": report }))
        }
    }
}
