//! Best-effort reader for the catalog service's prerequisite endpoint.
//!
//! Every lookup failure degrades to "no prerequisites known" for that one
//! skill. [`GraphClient::try_fetch_prerequisites`] keeps the reason so
//! diagnostics can tell an empty answer from a missing one; the planning
//! side only ever sees the degraded snapshot.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GraphClientConfig;
use crate::core::skill::SkillSummary;
use crate::error::{Result, SgError};
use crate::planning::{GraphSource, SkillGraphSnapshot};

/// Why a single prerequisite lookup produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradedReason {
    #[error("request timed out")]
    Timeout,
    #[error("could not connect to catalog")]
    Connect,
    #[error("skill not found in catalog")]
    NotFound,
    #[error("catalog returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("request failed: {0}")]
    Other(String),
}

/// Result of one prerequisite lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok(Vec<SkillSummary>),
    Degraded(DegradedReason),
}

impl FetchOutcome {
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Collapse to the prerequisite list, treating a degraded lookup as empty.
    pub fn into_prerequisites(self) -> Vec<SkillSummary> {
        match self {
            Self::Ok(prerequisites) => prerequisites,
            Self::Degraded(_) => Vec::new(),
        }
    }

    /// Surface a degraded lookup as `GraphUnavailable`, for callers that must
    /// not mistake "couldn't check" for "no prerequisites".
    pub fn into_result(self, skill_id: &str) -> Result<Vec<SkillSummary>> {
        match self {
            Self::Ok(prerequisites) => Ok(prerequisites),
            Self::Degraded(reason) => Err(SgError::GraphUnavailable(format!(
                "prerequisites of {skill_id}: {reason}"
            ))),
        }
    }
}

/// Blocking HTTP client for `GET {base_url}/skills/{id}/prerequisites`.
///
/// One request per skill, no retries and no caching between calls.
pub struct GraphClient {
    base_url: String,
    client: reqwest::blocking::Client,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SgError::MissingConfig("graph_client.base_url".to_string()));
        }
        if base_url.starts_with("http://") {
            debug!(base_url = %base_url, "catalog endpoint is not using TLS");
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| SgError::Config(format!("catalog http client: {err}")))?;

        Ok(Self {
            base_url,
            client,
            bearer_token: None,
        })
    }

    /// Build from config. Timeouts below one second are raised to one, and
    /// the bearer token is read from the configured environment variable.
    pub fn from_config(config: &GraphClientConfig) -> Result<Self> {
        let base_url = config.require_base_url()?;
        let client = Self::new(
            base_url,
            Duration::from_secs(config.timeout_secs.max(1)),
            Duration::from_secs(config.connect_timeout_secs.max(1)),
        )?;
        let token = std::env::var(&config.bearer_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(match token {
            Some(token) => client.with_bearer_token(token),
            None => client,
        })
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn prerequisites_url(&self, skill_id: &str) -> String {
        format!(
            "{}/skills/{}/prerequisites",
            self.base_url,
            urlencoding::encode(skill_id)
        )
    }

    /// Fetch the direct prerequisites of one skill, keeping the failure
    /// reason if the lookup degrades.
    pub fn try_fetch_prerequisites(&self, skill_id: &str) -> FetchOutcome {
        let url = self.prerequisites_url(skill_id);
        debug!(skill_id, url = %url, "fetching prerequisites");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(err) => return FetchOutcome::Degraded(classify(&err)),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return FetchOutcome::Degraded(DegradedReason::NotFound);
        }
        if !status.is_success() {
            return FetchOutcome::Degraded(DegradedReason::Status(status.as_u16()));
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(err) => return FetchOutcome::Degraded(classify(&err)),
        };
        // A `null` body means "none", same as an empty array.
        match serde_json::from_str::<Option<Vec<SkillSummary>>>(&body) {
            Ok(prerequisites) => {
                let prerequisites = prerequisites.unwrap_or_default();
                debug!(skill_id, count = prerequisites.len(), "fetched prerequisites");
                FetchOutcome::Ok(prerequisites)
            }
            Err(err) => FetchOutcome::Degraded(DegradedReason::Malformed(err.to_string())),
        }
    }

    /// Fetch the direct prerequisites of one skill; any failure yields an
    /// empty list.
    pub fn fetch_prerequisites(&self, skill_id: &str) -> Vec<SkillSummary> {
        match self.try_fetch_prerequisites(skill_id) {
            FetchOutcome::Ok(prerequisites) => prerequisites,
            FetchOutcome::Degraded(reason) => {
                warn!(skill_id, reason = %reason, "failed to fetch prerequisites, assuming none");
                Vec::new()
            }
        }
    }

    /// Build a snapshot with one independent request per distinct skill.
    pub fn fetch_graph(&self, skill_ids: &[String]) -> SkillGraphSnapshot {
        let mut snapshot = SkillGraphSnapshot::new();
        let mut seen = HashSet::with_capacity(skill_ids.len());

        for skill_id in skill_ids {
            if !seen.insert(skill_id.as_str()) {
                continue;
            }
            match self.try_fetch_prerequisites(skill_id) {
                FetchOutcome::Ok(prerequisites) => {
                    let mut ids = Vec::with_capacity(prerequisites.len());
                    for summary in prerequisites {
                        if let Some(name) = summary.name.or(summary.code) {
                            snapshot.record_name(summary.id.clone(), name);
                        }
                        ids.push(summary.id);
                    }
                    snapshot.insert(skill_id.clone(), ids);
                }
                FetchOutcome::Degraded(reason) => {
                    warn!(skill_id = %skill_id, reason = %reason, "failed to fetch prerequisites, assuming none");
                    snapshot.mark_degraded(skill_id.clone(), reason.to_string());
                    snapshot.insert(skill_id.clone(), Vec::new());
                }
            }
        }

        info!(
            skills = snapshot.prerequisites.len(),
            prerequisites = snapshot.edge_count(),
            degraded = snapshot.degraded.len(),
            "built skill graph"
        );
        snapshot
    }
}

impl GraphSource for GraphClient {
    fn snapshot(&self, skill_ids: &[String]) -> Result<SkillGraphSnapshot> {
        Ok(self.fetch_graph(skill_ids))
    }
}

fn classify(err: &reqwest::Error) -> DegradedReason {
    if err.is_timeout() {
        DegradedReason::Timeout
    } else if err.is_connect() {
        DegradedReason::Connect
    } else if err.is_decode() || err.is_body() {
        DegradedReason::Malformed(err.to_string())
    } else {
        DegradedReason::Other(err.to_string())
    }
}
