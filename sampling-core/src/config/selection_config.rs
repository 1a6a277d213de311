//! Sample selection configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for seeded selection and population intake.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Seed used when a run does not supply one. Default: 12345.
    pub default_seed: Option<u64>,
    /// Rows accepted per population load. Default: 10,000.
    pub max_population_rows: Option<usize>,
    /// Seed offset for expansion draws. Default: 888.
    pub expansion_seed_offset: Option<u64>,
}

impl SelectionConfig {
    pub fn effective_default_seed(&self) -> u64 {
        self.default_seed.unwrap_or(constants::DEFAULT_SEED)
    }

    pub fn effective_max_population_rows(&self) -> usize {
        self.max_population_rows
            .unwrap_or(constants::DEFAULT_MAX_POPULATION_ROWS)
    }

    pub fn effective_expansion_seed_offset(&self) -> u64 {
        self.expansion_seed_offset
            .unwrap_or(constants::DEFAULT_EXPANSION_SEED_OFFSET)
    }
}
