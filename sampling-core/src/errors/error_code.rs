//! AuditErrorCode trait for the collaborator boundary.

/// Trait for converting engine errors to stable error codes.
/// Every error enum implements this so the calling layer can match on a
/// code string instead of parsing messages.
pub trait AuditErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn boundary_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
pub const RECOMMENDER_UNAVAILABLE: &str = "RECOMMENDER_UNAVAILABLE";
pub const RECOMMENDER_RESPONSE: &str = "RECOMMENDER_RESPONSE";
