//! Top-level sampling configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ProfilingConfig, RecommenderConfig, SelectionConfig};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the load root.
pub const PROJECT_CONFIG_FILE: &str = "audit-sampling.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`AUDIT_SAMPLING_*`)
/// 3. Project config (`audit-sampling.toml` in the root)
/// 4. User config (`~/.audit-sampling/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    pub profiling: ProfilingConfig,
    pub selection: SelectionConfig,
    pub recommender: RecommenderConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed: Option<u64>,
    pub max_population_rows: Option<usize>,
    pub recommender_endpoint: Option<String>,
    pub recommender_timeout_ms: Option<u64>,
}

impl SamplingConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %err,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            remote_recommender = config.recommender.is_remote_enabled(),
            max_rows = config.selection.effective_max_population_rows(),
            "sampling config resolved"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SamplingConfig) -> Result<(), ConfigError> {
        let positive_floats = [
            (
                "profiling.benford_deviation_threshold",
                config.profiling.benford_deviation_threshold,
            ),
            ("profiling.iqr_multiplier", config.profiling.iqr_multiplier),
            (
                "profiling.outlier_sigma_multiplier",
                config.profiling.outlier_sigma_multiplier,
            ),
        ];
        for (field, value) in positive_floats {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be a finite number greater than 0".to_string(),
                    });
                }
            }
        }
        if config.selection.max_population_rows == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "selection.max_population_rows".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.recommender.timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "recommender.timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref endpoint) = config.recommender.endpoint {
            let trimmed = endpoint.trim();
            if !trimmed.is_empty()
                && !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
            {
                return Err(ConfigError::InvalidValue {
                    field: "recommender.endpoint".to_string(),
                    message: format!("'{trimmed}' is not an http(s) URL"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.audit-sampling/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".audit-sampling").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut SamplingConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SamplingConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut SamplingConfig, other: &SamplingConfig) {
        // Profiling
        if other.profiling.benford_deviation_threshold.is_some() {
            base.profiling.benford_deviation_threshold =
                other.profiling.benford_deviation_threshold;
        }
        if other.profiling.iqr_multiplier.is_some() {
            base.profiling.iqr_multiplier = other.profiling.iqr_multiplier;
        }
        if other.profiling.outlier_sigma_multiplier.is_some() {
            base.profiling.outlier_sigma_multiplier = other.profiling.outlier_sigma_multiplier;
        }

        // Selection
        if other.selection.default_seed.is_some() {
            base.selection.default_seed = other.selection.default_seed;
        }
        if other.selection.max_population_rows.is_some() {
            base.selection.max_population_rows = other.selection.max_population_rows;
        }
        if other.selection.expansion_seed_offset.is_some() {
            base.selection.expansion_seed_offset = other.selection.expansion_seed_offset;
        }

        // Recommender
        if other.recommender.endpoint.is_some() {
            base.recommender.endpoint = other.recommender.endpoint.clone();
        }
        if other.recommender.model.is_some() {
            base.recommender.model = other.recommender.model.clone();
        }
        if other.recommender.api_key_env.is_some() {
            base.recommender.api_key_env = other.recommender.api_key_env.clone();
        }
        if other.recommender.timeout_ms.is_some() {
            base.recommender.timeout_ms = other.recommender.timeout_ms;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `AUDIT_SAMPLING_SEED`, `AUDIT_SAMPLING_RECOMMENDER_ENDPOINT`, etc.
    fn apply_env_overrides(config: &mut SamplingConfig) {
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.selection.default_seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_MAX_POPULATION_ROWS") {
            if let Ok(v) = val.parse::<usize>() {
                config.selection.max_population_rows = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_BENFORD_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.profiling.benford_deviation_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_IQR_MULTIPLIER") {
            if let Ok(v) = val.parse::<f64>() {
                config.profiling.iqr_multiplier = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_RECOMMENDER_ENDPOINT") {
            config.recommender.endpoint = Some(val);
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_RECOMMENDER_MODEL") {
            config.recommender.model = Some(val);
        }
        if let Ok(val) = std::env::var("AUDIT_SAMPLING_RECOMMENDER_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.recommender.timeout_ms = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut SamplingConfig, cli: &CliOverrides) {
        if let Some(v) = cli.seed {
            config.selection.default_seed = Some(v);
        }
        if let Some(v) = cli.max_population_rows {
            config.selection.max_population_rows = Some(v);
        }
        if let Some(ref v) = cli.recommender_endpoint {
            config.recommender.endpoint = Some(v.clone());
        }
        if let Some(v) = cli.recommender_timeout_ms {
            config.recommender.timeout_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
