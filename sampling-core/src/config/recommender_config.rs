//! Recommendation service configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Optional external recommendation service.
///
/// When `endpoint` is unset only the deterministic heuristic is used.
/// The credential itself never lives in a config file: `api_key_env`
/// names the environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Service URL accepting `{stats, analysis}` and returning a recommendation.
    pub endpoint: Option<String>,
    /// Model identifier forwarded to the service.
    pub model: Option<String>,
    /// Name of the env var holding the API key. Default: `AUDIT_SAMPLING_API_KEY`.
    pub api_key_env: Option<String>,
    /// Request timeout in milliseconds. Default: 10,000.
    pub timeout_ms: Option<u64>,
}

impl RecommenderConfig {
    pub fn is_remote_enabled(&self) -> bool {
        self.endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }

    pub fn effective_api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or(constants::DEFAULT_API_KEY_ENV)
    }

    pub fn effective_timeout_ms(&self) -> u64 {
        self.timeout_ms
            .unwrap_or(constants::DEFAULT_RECOMMENDER_TIMEOUT_MS)
    }
}
