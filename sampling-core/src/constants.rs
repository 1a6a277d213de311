//! Shared constants for the audit sampling engine.

// ---- Seeded selection ----

/// LCG multiplier: `seed' = (seed * 9301 + 49297) mod 233280`.
pub const LCG_MULTIPLIER: u64 = 9301;

/// LCG increment.
pub const LCG_INCREMENT: u64 = 49297;

/// LCG modulus. Draws are `state / LCG_MODULUS` in `[0, 1)`.
pub const LCG_MODULUS: u64 = 233_280;

/// Default seed when neither the caller nor the config provides one.
pub const DEFAULT_SEED: u64 = 12_345;

/// Seed offset applied when appending expansion items to a sample.
pub const DEFAULT_EXPANSION_SEED_OFFSET: u64 = 888;

/// Practical population batch size supplied by collaborators.
pub const DEFAULT_MAX_POPULATION_ROWS: usize = 10_000;

// ---- Profiling ----

/// Expected first-digit frequencies (%) under Benford's law, digits 1..=9.
pub const BENFORD_EXPECTED: [f64; 9] = [30.1, 17.6, 12.5, 9.7, 7.9, 6.7, 5.8, 5.1, 4.6];

/// A Benford digit is suspicious when |actual% - expected%| exceeds this.
pub const DEFAULT_BENFORD_DEVIATION_THRESHOLD: f64 = 5.0;

/// Tukey fence multiplier for the upper IQR fence.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Risk scoring flags values beyond `avg + k * std_dev`.
pub const DEFAULT_OUTLIER_SIGMA_MULTIPLIER: f64 = 2.0;

// ---- Recommendation ----

/// Coefficient of variation above which a population is "highly volatile".
pub const HIGH_VOLATILITY_CV: f64 = 1.5;

/// Coefficient of variation above which MUS is no longer recommended.
pub const EXTREME_VOLATILITY_CV: f64 = 3.0;

/// Env var holding the recommendation service credential.
pub const DEFAULT_API_KEY_ENV: &str = "AUDIT_SAMPLING_API_KEY";

/// Recommendation service request timeout.
pub const DEFAULT_RECOMMENDER_TIMEOUT_MS: u64 = 10_000;

// ---- Fixed sample sizes ----

/// Attribute stop-or-go pilot size.
pub const ATTRIBUTE_PILOT_SIZE: usize = 25;

/// MUS calibration pilot size.
pub const MUS_PILOT_SIZE: usize = 30;

/// CAV sigma-calibration pilot size.
pub const CAV_PILOT_SIZE: usize = 50;

/// CAV sample size clamp.
pub const CAV_MIN_SAMPLE: usize = 30;
pub const CAV_MAX_SAMPLE: usize = 200;

/// Two-sided 95% normal quantile used by CAV.
pub const CAV_Z: f64 = 1.96;

/// Stratified per-stratum sufficiency window.
pub const STRATUM_MIN_ALLOCATION: usize = 30;
pub const STRATUM_MAX_ALLOCATION: usize = 45;

/// Default number of monetary strata.
pub const DEFAULT_STRATA_COUNT: usize = 3;

/// Non-statistical single-criterion sample sizes.
pub const BENFORD_CRITERION_SIZE: usize = 40;
pub const OUTLIERS_CRITERION_SIZE: usize = 15;
pub const DUPLICATES_CRITERION_SIZE: usize = 10;
pub const ROUND_NUMBERS_CRITERION_SIZE: usize = 20;

/// Combined risk scoring sample bounds.
pub const RISK_SCORE_MIN_SAMPLE: usize = 30;
pub const RISK_SCORE_MAX_SAMPLE: usize = 60;

/// Score at or above which a row counts as high risk.
pub const HIGH_RISK_SCORE: f64 = 2.0;
