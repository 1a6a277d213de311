//! Error handling for the sampling engine.
//! One error enum per concern, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod params_error;
pub mod recommend_error;

pub use config_error::ConfigError;
pub use error_code::AuditErrorCode;
pub use params_error::ParamsError;
pub use recommend_error::RecommendError;
