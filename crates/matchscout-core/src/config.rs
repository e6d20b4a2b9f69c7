// Configuration loading and parsing (scout.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::battle_tag::BattleTag;

/// Name of the single config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "scout.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub analysis: AnalysisConfig,
    pub history: HistoryConfig,
    pub demo: DemoConfig,
}

/// Upstream stats service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Region code sent as `gateway` / `gateWay`.
    pub gateway: u32,
    pub current_season: u32,
    /// Fallback season for cross-season merges. Defaults to the season
    /// immediately before `current_season`.
    #[serde(default)]
    pub previous_season: Option<u32>,
    pub stat_timeout_secs: u64,
    pub search_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn previous_season(&self) -> u32 {
        self.previous_season
            .unwrap_or_else(|| self.current_season.saturating_sub(1))
    }
}

fn default_user_agent() -> String {
    concat!("matchscout/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Rule table version: "v1", "v2" or "v3".
    pub ruleset: String,
    pub recent_match_target: usize,
    pub player_stats_matches: usize,
    pub strategy_sample: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Empty means "use the platform data directory".
    #[serde(default)]
    pub db_path: String,
    pub retention_days: u32,
}

impl HistoryConfig {
    /// Resolve the database location, falling back to the per-user data
    /// directory when `db_path` is empty.
    pub fn resolved_db_path(&self) -> PathBuf {
        if !self.db_path.trim().is_empty() {
            return PathBuf::from(&self.db_path);
        }
        match directories::ProjectDirs::from("org", "matchscout", "matchscout") {
            Some(dirs) => dirs.data_dir().join("matchscout.db"),
            None => PathBuf::from("matchscout.db"),
        }
    }
}

/// Player used by the `demo` command.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    pub battle_tag: String,
    pub race: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/scout.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Install `defaults/scout.toml` as `config/scout.toml` when no config exists
/// yet. Returns the installed path, or `None` when a config was already in
/// place. An existing config is never overwritten.
pub fn install_default_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE} found in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to install {}: {e}", target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&source, &target).map_err(copy_err)?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Installs the default config first when none exists.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    install_default_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const KNOWN_RULESETS: &[&str] = &["v1", "v2", "v3"];

fn validate(config: &Config) -> Result<(), ConfigError> {
    let api = &config.api;
    if api.base_url.trim().is_empty() {
        return Err(invalid("api.base_url", "must not be empty"));
    }
    if !api.base_url.starts_with("http://") && !api.base_url.starts_with("https://") {
        return Err(invalid(
            "api.base_url",
            format!("must be an http(s) URL, got {}", api.base_url),
        ));
    }
    if api.current_season == 0 {
        return Err(invalid("api.current_season", "must be greater than 0"));
    }
    if let Some(prev) = api.previous_season {
        if prev >= api.current_season {
            return Err(invalid(
                "api.previous_season",
                format!(
                    "must be lower than current_season ({}), got {prev}",
                    api.current_season
                ),
            ));
        }
    }
    let timeouts: &[(&str, u64)] = &[
        ("api.stat_timeout_secs", api.stat_timeout_secs),
        ("api.search_timeout_secs", api.search_timeout_secs),
    ];
    for (name, val) in timeouts {
        if *val == 0 {
            return Err(invalid(name, "must be > 0"));
        }
    }

    let analysis = &config.analysis;
    if !KNOWN_RULESETS.contains(&analysis.ruleset.as_str()) {
        return Err(invalid(
            "analysis.ruleset",
            format!("must be one of {KNOWN_RULESETS:?}, got {}", analysis.ruleset),
        ));
    }
    let sizes: &[(&str, usize)] = &[
        ("analysis.recent_match_target", analysis.recent_match_target),
        ("analysis.player_stats_matches", analysis.player_stats_matches),
        ("analysis.strategy_sample", analysis.strategy_sample),
    ];
    for (name, val) in sizes {
        if *val == 0 {
            return Err(invalid(name, "must be > 0"));
        }
    }

    if config.history.retention_days == 0 {
        return Err(invalid("history.retention_days", "must be > 0"));
    }

    if let Err(e) = BattleTag::parse(&config.demo.battle_tag) {
        return Err(invalid("demo.battle_tag", e.to_string()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
