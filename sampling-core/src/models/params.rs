//! Per-method sampling parameters.
//!
//! `SamplingParams` is a tagged union: exactly one method's parameters are
//! active for a run. `validate()` applies the same consistency rules the
//! calculators re-check before computing a sample.

use serde::{Deserialize, Serialize};

use super::recommendation::SamplingMethod;
use crate::constants;
use crate::errors::ParamsError;

/// Attribute (control-deviation) sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeParams {
    /// Population size N. 0 means "use the loaded row count".
    pub population_size: usize,
    /// Confidence level NC, percent.
    pub confidence_level: f64,
    /// Tolerable deviation rate ET, percent.
    pub tolerable_deviation: f64,
    /// Expected deviation rate PE, percent.
    pub expected_deviation: f64,
    /// Start with a stop-or-go pilot instead of the full formula size.
    pub use_sequential: bool,
}

impl Default for AttributeParams {
    fn default() -> Self {
        Self {
            population_size: 0,
            confidence_level: 95.0,
            tolerable_deviation: 5.0,
            expected_deviation: 1.0,
            use_sequential: false,
        }
    }
}

/// How MUS treats negative book values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeTreatment {
    /// Segregate negatives from the frame for separate testing.
    #[default]
    Separate,
    /// Negatives carry zero monetary units and cannot be hit.
    Zero,
    /// Keep negatives in the frame at their absolute value.
    Absolute,
}

/// Monetary Unit Sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MusParams {
    /// Population book value V. 0 means "use the frame's total".
    pub population_value: f64,
    /// Tolerable error TE (monetary).
    pub tolerable_error: f64,
    /// Expected error EE (monetary).
    pub expected_error: f64,
    /// Risk of incorrect acceptance RIA, percent.
    pub risk_of_incorrect_acceptance: f64,
    /// Items at or above this value are always selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_value_threshold: Option<f64>,
    /// Treat the top 5% of value as key items.
    pub optimize_top_stratum: bool,
    pub use_pilot_sample: bool,
    pub handle_negatives: NegativeTreatment,
}

impl Default for MusParams {
    fn default() -> Self {
        Self {
            population_value: 0.0,
            tolerable_error: 50_000.0,
            expected_error: 500.0,
            risk_of_incorrect_acceptance: 5.0,
            high_value_threshold: None,
            optimize_top_stratum: true,
            use_pilot_sample: false,
            handle_negatives: NegativeTreatment::Separate,
        }
    }
}

/// CAV estimator recorded on the work-paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationTechnique {
    #[default]
    Mean,
    Difference,
    CombinedRatio,
    SeparateRegression,
}

impl EstimationTechnique {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mean => "mean-per-unit",
            Self::Difference => "difference",
            Self::CombinedRatio => "combined ratio",
            Self::SeparateRegression => "separate regression",
        }
    }
}

/// Classical Variables Sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CavParams {
    /// Expected population standard deviation. Ignored in pilot mode.
    pub sigma: f64,
    /// Tolerable error TE (monetary).
    pub tolerable_error: f64,
    pub estimation_technique: EstimationTechnique,
    /// Draw a 50-item pilot to calibrate sigma.
    pub use_pilot_sample: bool,
}

impl Default for CavParams {
    fn default() -> Self {
        Self {
            sigma: 0.0,
            tolerable_error: 50_000.0,
            estimation_technique: EstimationTechnique::Mean,
            use_pilot_sample: false,
        }
    }
}

/// Grouping used to form strata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StratificationBasis {
    #[default]
    Monetary,
    Category,
    Subcategory,
}

/// How the per-stratum sufficiency window is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    /// Larger strata get more items.
    Proportional,
    /// Strata with more items and more spread get more items.
    #[default]
    Neyman,
    /// Every stratum gets the minimum.
    Equal,
}

/// Stratified sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StratifiedParams {
    pub basis: StratificationBasis,
    /// Number of monetary bands. Ignored for category bases.
    pub strata_count: usize,
    pub allocation_method: AllocationMethod,
    /// Items above this value are always selected. 0 disables.
    pub certainty_stratum_threshold: f64,
    /// Also move IQR outliers into the certainty stratum.
    pub detect_outliers: bool,
}

impl Default for StratifiedParams {
    fn default() -> Self {
        Self {
            basis: StratificationBasis::Monetary,
            strata_count: constants::DEFAULT_STRATA_COUNT,
            allocation_method: AllocationMethod::Neyman,
            certainty_stratum_threshold: 10_000.0,
            detect_outliers: false,
        }
    }
}

/// Directed-selection criterion for non-statistical sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCriterion {
    Benford,
    Outliers,
    Duplicates,
    RoundNumbers,
    #[default]
    CombinedRisk,
}

impl RiskCriterion {
    /// Fixed sample size for single-criterion selection. `None` for
    /// combined risk scoring, which sizes itself adaptively.
    pub fn fixed_sample_size(&self) -> Option<usize> {
        match self {
            Self::Benford => Some(constants::BENFORD_CRITERION_SIZE),
            Self::Outliers => Some(constants::OUTLIERS_CRITERION_SIZE),
            Self::Duplicates => Some(constants::DUPLICATES_CRITERION_SIZE),
            Self::RoundNumbers => Some(constants::ROUND_NUMBERS_CRITERION_SIZE),
            Self::CombinedRisk => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Benford => "benford",
            Self::Outliers => "outliers",
            Self::Duplicates => "duplicates",
            Self::RoundNumbers => "round_numbers",
            Self::CombinedRisk => "combined_risk",
        }
    }
}

/// Non-statistical (judgmental) sampling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NonStatisticalParams {
    pub criterion: RiskCriterion,
    /// Free-text selection criteria for the work-paper.
    pub criteria: String,
    /// Free-text justification for the work-paper.
    pub justification: String,
}

/// Parameters for exactly one sampling method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SamplingParams {
    Attribute(AttributeParams),
    Mus(MusParams),
    Cav(CavParams),
    Stratified(StratifiedParams),
    NonStatistical(NonStatisticalParams),
}

impl SamplingParams {
    pub fn method(&self) -> SamplingMethod {
        match self {
            Self::Attribute(_) => SamplingMethod::Attribute,
            Self::Mus(_) => SamplingMethod::Mus,
            Self::Cav(_) => SamplingMethod::Cav,
            Self::Stratified(_) => SamplingMethod::Stratified,
            Self::NonStatistical(_) => SamplingMethod::NonStatistical,
        }
    }

    /// Default parameters for a method.
    pub fn default_for(method: SamplingMethod) -> Self {
        match method {
            SamplingMethod::Attribute => Self::Attribute(AttributeParams::default()),
            SamplingMethod::Mus => Self::Mus(MusParams::default()),
            SamplingMethod::Cav => Self::Cav(CavParams::default()),
            SamplingMethod::Stratified => Self::Stratified(StratifiedParams::default()),
            SamplingMethod::NonStatistical => {
                Self::NonStatistical(NonStatisticalParams::default())
            }
        }
    }

    /// Check the active method's parameters for consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        match self {
            Self::Attribute(p) => p.validate(),
            Self::Mus(p) => p.validate(),
            Self::Cav(p) => p.validate(),
            Self::Stratified(p) => p.validate(),
            Self::NonStatistical(_) => Ok(()),
        }
    }
}

impl AttributeParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        finite("confidence_level", self.confidence_level)?;
        finite("tolerable_deviation", self.tolerable_deviation)?;
        finite("expected_deviation", self.expected_deviation)?;
        in_open_range("confidence_level", self.confidence_level, 0.0, 100.0)?;
        positive("tolerable_deviation", self.tolerable_deviation)?;
        if self.tolerable_deviation > 100.0 {
            return Err(ParamsError::OutOfRange {
                field: "tolerable_deviation",
                value: self.tolerable_deviation,
                min: 0.0,
                max: 100.0,
            });
        }
        non_negative("expected_deviation", self.expected_deviation)?;
        if self.expected_deviation >= self.tolerable_deviation {
            return Err(ParamsError::ExpectedNotBelowTolerable {
                expected: self.expected_deviation,
                tolerable: self.tolerable_deviation,
            });
        }
        Ok(())
    }
}

impl MusParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        finite("population_value", self.population_value)?;
        finite("tolerable_error", self.tolerable_error)?;
        finite("expected_error", self.expected_error)?;
        finite("risk_of_incorrect_acceptance", self.risk_of_incorrect_acceptance)?;
        non_negative("population_value", self.population_value)?;
        positive("tolerable_error", self.tolerable_error)?;
        non_negative("expected_error", self.expected_error)?;
        in_open_range(
            "risk_of_incorrect_acceptance",
            self.risk_of_incorrect_acceptance,
            0.0,
            100.0,
        )?;
        if self.expected_error >= self.tolerable_error {
            return Err(ParamsError::ExpectedNotBelowTolerable {
                expected: self.expected_error,
                tolerable: self.tolerable_error,
            });
        }
        if let Some(threshold) = self.high_value_threshold {
            finite("high_value_threshold", threshold)?;
            non_negative("high_value_threshold", threshold)?;
        }
        Ok(())
    }
}

impl CavParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        finite("sigma", self.sigma)?;
        finite("tolerable_error", self.tolerable_error)?;
        positive("tolerable_error", self.tolerable_error)?;
        if self.use_pilot_sample {
            non_negative("sigma", self.sigma)
        } else {
            positive("sigma", self.sigma)
        }
    }
}

impl StratifiedParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        finite("certainty_stratum_threshold", self.certainty_stratum_threshold)?;
        non_negative("certainty_stratum_threshold", self.certainty_stratum_threshold)?;
        if self.basis == StratificationBasis::Monetary && !(1..=10).contains(&self.strata_count) {
            return Err(ParamsError::OutOfRange {
                field: "strata_count",
                value: self.strata_count as f64,
                min: 1.0,
                max: 10.0,
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamsError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: f64::INFINITY,
        })
    }
}

fn in_open_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParamsError> {
    if value > min && value < max {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_rejects_expected_equal_to_tolerable() {
        let params = AttributeParams {
            expected_deviation: 5.0,
            tolerable_deviation: 5.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::ExpectedNotBelowTolerable {
                expected: 5.0,
                tolerable: 5.0
            })
        );
    }

    #[test]
    fn test_defaults_validate() {
        for method in SamplingMethod::ALL {
            let params = SamplingParams::default_for(*method);
            // CAV needs a sigma outside pilot mode.
            if *method == SamplingMethod::Cav {
                assert!(params.validate().is_err());
            } else {
                assert!(params.validate().is_ok(), "{method:?} defaults should validate");
            }
        }
    }

    #[test]
    fn test_cav_pilot_allows_zero_sigma() {
        let params = CavParams {
            use_pilot_sample: true,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_round_trip_through_tagged_json() {
        let params = SamplingParams::Mus(MusParams::default());
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"method\":\"mus\""));
        let back: SamplingParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
