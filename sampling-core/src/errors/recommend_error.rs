//! Recommendation service errors.
//!
//! Always recovered inside the recommendation engine by falling back to
//! the deterministic heuristic; surfaced only through logs.

use super::error_code::{self, AuditErrorCode};

/// Failures of an external recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("recommendation service is not configured")]
    NotConfigured,

    #[error("missing credential: environment variable {env} is not set")]
    MissingCredential { env: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("service returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed recommendation response: {reason}")]
    MalformedResponse { reason: String },
}

impl AuditErrorCode for RecommendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedResponse { .. } => error_code::RECOMMENDER_RESPONSE,
            _ => error_code::RECOMMENDER_UNAVAILABLE,
        }
    }
}
