//! Sampling results: selected items, pilot metrics, expansion plans.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::recommendation::SamplingMethod;

/// Categorical risk level attached to a sample item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map an additive risk score onto a level.
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::Critical
        } else if score >= 2.0 {
            Self::High
        } else if score >= 1.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A triggered risk category on a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Outlier,
    RoundNumber,
    Duplicate,
    Benford,
    SignificantDeviation,
}

impl RiskFactor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Outlier => "outlier",
            Self::RoundNumber => "round_number",
            Self::Duplicate => "duplicate",
            Self::Benford => "benford",
            Self::SignificantDeviation => "significant_deviation",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an item ended up in the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Random,
    Pilot,
    Expansion,
    KeyItem,
    Certainty,
    Directed,
}

/// One selected unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSampleItem {
    pub id: String,
    pub value: f64,
    #[serde(default)]
    pub selection: SelectionKind,
    #[serde(default)]
    pub is_pilot_item: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_flag: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_factors: Vec<RiskFactor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_justification: Option<String>,
    /// Zero-based stratum index for stratified runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratum: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stratum_label: Option<String>,
}

impl AuditSampleItem {
    /// A plain randomly-selected item.
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
            selection: SelectionKind::Random,
            is_pilot_item: false,
            risk_flag: None,
            risk_factors: Vec::new(),
            risk_score: None,
            risk_justification: None,
            stratum: None,
            stratum_label: None,
        }
    }

    pub fn with_selection(mut self, selection: SelectionKind) -> Self {
        self.selection = selection;
        if selection == SelectionKind::Pilot {
            self.is_pilot_item = true;
        }
        self
    }

    pub fn with_risk(mut self, level: RiskLevel, justification: impl Into<String>) -> Self {
        self.risk_flag = Some(level);
        self.risk_justification = Some(justification.into());
        self
    }
}

/// Which calibration a pilot sample feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotKind {
    /// Attribute stop-or-go pilot.
    StopOrGo,
    Mus,
    Cav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotPhase {
    PilotOnly,
    Expanded,
}

/// Calibration data from a pilot-mode run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotMetrics {
    pub kind: PilotKind,
    pub phase: PilotPhase,
    pub initial_size: usize,
    /// Sigma supplied before calibration (CAV only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_sigma: Option<f64>,
    /// Unbiased sample standard deviation of the pilot (CAV only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibrated_sigma: Option<f64>,
    /// Expected error used when the pilot was drawn (MUS only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_expected_error: Option<f64>,
    /// Population total projected from the pilot mean (CAV only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_total: Option<f64>,
}

impl PilotMetrics {
    pub fn new(kind: PilotKind, initial_size: usize) -> Self {
        Self {
            kind,
            phase: PilotPhase::PilotOnly,
            initial_size,
            initial_sigma: None,
            calibrated_sigma: None,
            initial_expected_error: None,
            projected_total: None,
        }
    }
}

/// The core's output artifact for one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResults {
    pub method: SamplingMethod,
    pub sample_size: usize,
    pub sample: Vec<AuditSampleItem>,
    pub total_error_projection: f64,
    pub upper_error_limit: f64,
    pub methodology_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pilot_metrics: Option<PilotMetrics>,
    /// Fingerprint of the population the sample was drawn from.
    #[serde(default)]
    pub population_fingerprint: String,
}

impl AuditResults {
    pub fn new(method: SamplingMethod) -> Self {
        Self {
            method,
            sample_size: 0,
            sample: Vec::new(),
            total_error_projection: 0.0,
            upper_error_limit: 0.0,
            methodology_notes: Vec::new(),
            pilot_metrics: None,
            population_fingerprint: String::new(),
        }
    }

    /// A zero-size result explaining why sampling was not possible.
    pub fn infeasible(method: SamplingMethod, reason: impl Into<String>) -> Self {
        let mut results = Self::new(method);
        results.methodology_notes.push(reason.into());
        results
    }

    pub fn is_infeasible(&self) -> bool {
        self.sample_size == 0 && self.sample.is_empty()
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.methodology_notes.push(note.into());
    }

    pub fn pilot_items(&self) -> impl Iterator<Item = &AuditSampleItem> {
        self.sample.iter().filter(|item| item.is_pilot_item)
    }
}

/// Recommended sample enlargement after a pilot or stop-or-go phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionPlan {
    pub recommended_expansion: usize,
    pub justification: String,
    pub new_total: usize,
    /// Human-readable derivation for the work-paper.
    pub formula: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_score() {
        assert_eq!(RiskLevel::from_score(0.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(2.5), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(4.0), RiskLevel::Critical);
        assert!(RiskLevel::Critical > RiskLevel::High);
    }

    #[test]
    fn test_pilot_selection_marks_pilot_flag() {
        let item = AuditSampleItem::new("A", 1.0).with_selection(SelectionKind::Pilot);
        assert!(item.is_pilot_item);
        let item = AuditSampleItem::new("B", 1.0).with_selection(SelectionKind::KeyItem);
        assert!(!item.is_pilot_item);
    }

    #[test]
    fn test_infeasible_has_note_and_no_sample() {
        let results = AuditResults::infeasible(SamplingMethod::Attribute, "nope");
        assert!(results.is_infeasible());
        assert_eq!(results.methodology_notes, vec!["nope".to_string()]);
    }

    #[test]
    fn test_risk_level_serializes_lowercase() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
