//! IQR with an upper Tukey fence.
//!
//! Quartiles are nearest-rank on the sorted values (`floor(0.25 n)`,
//! `floor(0.75 n)`). Only the upper tail is fenced: overstatement is the
//! audit risk of interest.

/// Quartiles and upper fence of a value set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// `q3 + multiplier * iqr`. Values strictly above are outliers.
    pub threshold: f64,
}

impl IqrFence {
    /// Compute the fence. An empty slice yields an all-zero fence.
    pub fn compute(values: &[f64], multiplier: f64) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self::from_sorted(&sorted, multiplier)
    }

    /// Compute the fence from values already sorted ascending.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Self {
        if sorted.is_empty() {
            return Self {
                q1: 0.0,
                q3: 0.0,
                iqr: 0.0,
                threshold: 0.0,
            };
        }
        let q1 = nearest_rank(sorted, 0.25);
        let q3 = nearest_rank(sorted, 0.75);
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            iqr,
            threshold: q3 + multiplier * iqr,
        }
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value > self.threshold
    }
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() as f64 * p).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Indices of values strictly above the upper fence.
pub fn detect(values: &[f64], multiplier: f64) -> (IqrFence, Vec<usize>) {
    let fence = IqrFence::compute(values, multiplier);
    if values.is_empty() {
        return (fence, Vec::new());
    }
    let outliers = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| fence.is_outlier(v))
        .map(|(i, _)| i)
        .collect();
    (fence, outliers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iqr_no_outliers() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let (_, outliers) = detect(&values, 1.5);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_iqr_with_outlier() {
        let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
        values[0] = 1_000.0;
        let (fence, outliers) = detect(&values, 1.5);
        assert_eq!(outliers, vec![0]);
        assert!(fence.threshold < 1_000.0);
    }

    #[test]
    fn test_nearest_rank_quartiles() {
        // n = 8: q1 = sorted[2], q3 = sorted[6]
        let fence = IqrFence::compute(&[8.0, 1.0, 7.0, 2.0, 6.0, 3.0, 5.0, 4.0], 1.5);
        assert_eq!(fence.q1, 3.0);
        assert_eq!(fence.q3, 7.0);
        assert_eq!(fence.threshold, 13.0);
    }

    #[test]
    fn test_lower_tail_not_fenced() {
        let mut values = vec![100.0; 20];
        values[3] = -1_000_000.0;
        let (_, outliers) = detect(&values, 1.5);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_identical_values() {
        let (fence, outliers) = detect(&[5.0; 20], 1.5);
        assert!(outliers.is_empty());
        assert_eq!(fence.threshold, 5.0);
    }
}
