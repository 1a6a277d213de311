//! Descriptive statistics.
//!
//! The population profile uses population variance (divide by `n`). Pilot
//! sigma calibration uses the unbiased sample estimator (divide by `n - 1`),
//! see [`sample_std_dev`].

use sampling_core::models::DescriptiveStats;

/// Sum, extremes, mean, population standard deviation, and coefficient of
/// variation. An empty slice yields all zeros.
pub fn compute_stats(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats::default();
    }

    let count = values.len();
    let n = count as f64;
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = sum / n;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
    let std_dev = if variance.is_finite() && variance > 0.0 {
        variance.sqrt()
    } else {
        0.0
    };
    let coefficient_of_variation = if avg != 0.0 {
        std_dev / avg.abs()
    } else {
        0.0
    };

    DescriptiveStats {
        count,
        sum,
        min,
        max,
        avg,
        std_dev,
        coefficient_of_variation,
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Unbiased sample standard deviation. Fewer than two values yield 0.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    if variance.is_finite() && variance > 0.0 {
        variance.sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(compute_stats(&[]), DescriptiveStats::default());
    }

    #[test]
    fn test_population_variance_divides_by_n() {
        let stats = compute_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.count, 8);
        assert!((stats.avg - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.coefficient_of_variation - 0.4).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_sample_std_dev_divides_by_n_minus_one() {
        let s = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[3.0]), 0.0);
    }

    #[test]
    fn test_zero_mean_has_zero_cv() {
        let stats = compute_stats(&[-5.0, 5.0]);
        assert_eq!(stats.avg, 0.0);
        assert_eq!(stats.coefficient_of_variation, 0.0);
    }
}
