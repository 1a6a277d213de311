//! Domain models shared by the profiler, recommender, and calculators.

pub mod params;
pub mod population;
pub mod profile;
pub mod recommendation;
pub mod results;

pub use params::{
    AllocationMethod, AttributeParams, CavParams, EstimationTechnique, MusParams,
    NegativeTreatment, NonStatisticalParams, RiskCriterion, SamplingParams, StratificationBasis,
    StratifiedParams,
};
pub use population::{fingerprint_rows, Population, PopulationRow};
pub use profile::{AdvancedAnalysis, BenfordDigit, DescriptiveStats, PopulationProfile};
pub use recommendation::{AiRecommendation, RiskIndicator, SamplingMethod};
pub use results::{
    AuditResults, AuditSampleItem, ExpansionPlan, PilotKind, PilotMetrics, PilotPhase, RiskFactor,
    RiskLevel, SelectionKind,
};
