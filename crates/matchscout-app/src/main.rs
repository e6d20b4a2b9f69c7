// matchscout entry point.
//
// Startup sequence:
// 1. Parse arguments (battle tags are validated here)
// 2. Initialize tracing (stderr, so stdout stays machine-readable)
// 3. Load config
// 4. Open the lookup history database
// 5. Build the HTTP gateway and the engine
// 6. Run the command and print its JSON result

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use matchscout_app::{run, App, Cli};
use matchscout_core::config;
use matchscout_core::db::Database;
use matchscout_intel::{Engine, EngineSettings, HistorySink, HttpGateway, HttpSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: season {} (fallback {}), gateway {}, ruleset {}",
        config.api.current_season,
        config.api.previous_season(),
        config.api.gateway,
        config.analysis.ruleset
    );

    let db_path = config.history.resolved_db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let history = Arc::new(
        Database::open(&db_path.to_string_lossy()).context("failed to open history database")?,
    );

    let gateway =
        HttpGateway::new(HttpSettings::from_config(&config.api)).context("failed to build HTTP gateway")?;
    let settings = EngineSettings::from_config(&config)?;
    let engine = Engine::new(Arc::new(gateway), settings).with_sink(Arc::new(HistorySink::new(
        Arc::clone(&history),
        config.history.retention_days,
    )));

    let app = App {
        engine,
        history,
        demo: config.demo.clone(),
    };
    let output = run(cli.command, &app).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchscout=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
