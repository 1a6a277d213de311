//! Sampling method recommendation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five sampling methods offered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    Attribute,
    Mus,
    Cav,
    Stratified,
    NonStatistical,
}

impl SamplingMethod {
    pub const ALL: &'static [SamplingMethod] = &[
        Self::Attribute,
        Self::Mus,
        Self::Cav,
        Self::Stratified,
        Self::NonStatistical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Mus => "mus",
            Self::Cav => "cav",
            Self::Stratified => "stratified",
            Self::NonStatistical => "non_statistical",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Attribute => "Attribute Sampling",
            Self::Mus => "Monetary Unit Sampling",
            Self::Cav => "Classical Variables Sampling",
            Self::Stratified => "Stratified Sampling",
            Self::NonStatistical => "Non-Statistical (Judgmental) Sampling",
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Population-level risk indicators reported with a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskIndicator {
    HighVolatility,
    NegativeValues,
    ZeroValues,
    Outliers,
    BenfordAnomaly,
}

impl RiskIndicator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighVolatility => "High data volatility (CV > 1.5)",
            Self::NegativeValues => "Negative values present",
            Self::ZeroValues => "Zero-value records present",
            Self::Outliers => "Outliers above the IQR fence",
            Self::BenfordAnomaly => "Benford's law anomaly",
        }
    }
}

impl fmt::Display for RiskIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advisory method recommendation. Never mutates sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    pub recommended_method: SamplingMethod,
    /// 0..=100.
    pub confidence_score: u8,
    pub reasoning: Vec<String>,
    pub risk_factors: Vec<RiskIndicator>,
    #[serde(default)]
    pub directed_selection_advice: String,
}
