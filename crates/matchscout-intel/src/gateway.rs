// Read-only client for the upstream stats service.
//
// The engine only sees the `StatGateway` trait: every query resolves to
// `Some(json)` or `None`. Not-found, non-success statuses and transport
// failures all collapse to `None` after being logged, so a lookup degrades
// instead of failing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use matchscout_core::config::ApiConfig;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// A logical upstream query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    OngoingMatch {
        tag: String,
    },
    PlayerSummary {
        tag: String,
    },
    RaceStats {
        tag: String,
        gateway: u32,
        season: u32,
    },
    HeroStats {
        tag: String,
        season: u32,
    },
    MatchSearch {
        tag: String,
        gateway: u32,
        offset: usize,
        page_size: usize,
        season: u32,
    },
}

/// Timeout class of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Small stat documents.
    Stat,
    /// Match search pages.
    Bulk,
}

impl Endpoint {
    /// Path relative to the API base, with the battle tag percent-encoded
    /// (`#` would otherwise start a URL fragment).
    pub fn path(&self) -> String {
        match self {
            Endpoint::OngoingMatch { tag } => format!("matches/ongoing/{}", encode(tag)),
            Endpoint::PlayerSummary { tag } => format!("players/{}", encode(tag)),
            Endpoint::RaceStats {
                tag,
                gateway,
                season,
            } => format!(
                "players/{}/race-stats?gateWay={gateway}&season={season}",
                encode(tag)
            ),
            Endpoint::HeroStats { tag, season } => format!(
                "player-stats/{}/hero-on-map-versus-race?season={season}",
                encode(tag)
            ),
            Endpoint::MatchSearch {
                tag,
                gateway,
                offset,
                page_size,
                season,
            } => format!(
                "matches/search?playerId={}&gateway={gateway}&offset={offset}&pageSize={page_size}&season={season}",
                encode(tag)
            ),
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Endpoint::MatchSearch { .. } => QueryKind::Bulk,
            _ => QueryKind::Stat,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Endpoint::OngoingMatch { tag }
            | Endpoint::PlayerSummary { tag }
            | Endpoint::RaceStats { tag, .. }
            | Endpoint::HeroStats { tag, .. }
            | Endpoint::MatchSearch { tag, .. } => tag,
        }
    }
}

fn encode(tag: &str) -> String {
    urlencoding::encode(tag).into_owned()
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Capability to query the stats service.
///
/// Implementations must not return errors for ordinary absence: `None` means
/// "no data", whatever the cause.
#[async_trait]
pub trait StatGateway: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Option<Value>;
}

/// Fetch and decode into `T`. A payload that does not decode is logged and
/// treated as missing.
pub async fn fetch_as<T: DeserializeOwned>(
    gateway: &dyn StatGateway,
    endpoint: &Endpoint,
) -> Option<T> {
    let value = gateway.fetch(endpoint).await?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(path = %endpoint.path(), "unexpected payload shape: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} for {path}")]
    Status { path: String, status: StatusCode },

    #[error("invalid JSON body from {path}: {source}")]
    Body {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Connection settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub stat_timeout: Duration,
    pub search_timeout: Duration,
    pub user_agent: String,
}

impl HttpSettings {
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            stat_timeout: Duration::from_secs(api.stat_timeout_secs),
            search_timeout: Duration::from_secs(api.search_timeout_secs),
            user_agent: api.user_agent.clone(),
        }
    }
}

/// `reqwest`-backed gateway.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    stat_timeout: Duration,
    search_timeout: Duration,
}

impl HttpGateway {
    pub fn new(settings: HttpSettings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent)
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            stat_timeout: settings.stat_timeout,
            search_timeout: settings.search_timeout,
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    fn timeout_for(&self, kind: QueryKind) -> Duration {
        match kind {
            QueryKind::Stat => self.stat_timeout,
            QueryKind::Bulk => self.search_timeout,
        }
    }

    /// One request. `Ok(None)` is a clean "no content".
    pub async fn try_fetch(&self, endpoint: &Endpoint) -> Result<Option<Value>, GatewayError> {
        let path = endpoint.path();
        let response = self
            .http
            .get(self.url_for(endpoint))
            .timeout(self.timeout_for(endpoint.kind()))
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<Value>()
                    .await
                    .map_err(|source| GatewayError::Body {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Some(body))
            }
            StatusCode::NO_CONTENT => Ok(None),
            status => Err(GatewayError::Status { path, status }),
        }
    }
}

#[async_trait]
impl StatGateway for HttpGateway {
    async fn fetch(&self, endpoint: &Endpoint) -> Option<Value> {
        match self.try_fetch(endpoint).await {
            Ok(Some(body)) => Some(body),
            Ok(None) => {
                debug!(path = %endpoint.path(), "no content");
                None
            }
            Err(e @ (GatewayError::Status { .. } | GatewayError::Body { .. })) => {
                warn!("{e}");
                None
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}
