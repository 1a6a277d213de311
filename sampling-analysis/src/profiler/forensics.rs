//! Duplicate, zero, negative, and round-number counters.

use rustc_hash::FxHashMap;

/// Hash key for a monetary value; `-0.0` and `0.0` share a key.
pub fn value_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Occurrence count per distinct value.
pub fn value_occurrences(values: &[f64]) -> FxHashMap<u64, usize> {
    let mut counts = FxHashMap::default();
    for &v in values {
        *counts.entry(value_key(v)).or_insert(0) += 1;
    }
    counts
}

/// Every repeat beyond a value's first occurrence counts once.
pub fn count_duplicates(values: &[f64]) -> usize {
    value_occurrences(values)
        .values()
        .map(|&n| n.saturating_sub(1))
        .sum()
}

/// Nonzero and an exact multiple of `unit` in absolute value.
pub fn is_multiple_of(value: f64, unit: f64) -> bool {
    let abs = value.abs();
    abs != 0.0 && abs.is_finite() && abs % unit == 0.0
}

/// Tiered round-number rule: values of 1000 or more must be multiples of
/// 1000, values in `[100, 1000)` multiples of 100. Smaller values never
/// count.
pub fn is_round_number(value: f64) -> bool {
    let abs = value.abs();
    if abs >= 1_000.0 {
        is_multiple_of(abs, 1_000.0)
    } else if abs >= 100.0 {
        is_multiple_of(abs, 100.0)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_count_repeats_beyond_first() {
        assert_eq!(count_duplicates(&[1.0, 1.0, 1.0, 2.0, 3.0, 3.0]), 3);
        assert_eq!(count_duplicates(&[0.0, -0.0]), 1);
        assert_eq!(count_duplicates(&[]), 0);
    }

    #[test]
    fn test_tiered_round_numbers() {
        assert!(is_round_number(500.0));
        assert!(is_round_number(-3_000.0));
        assert!(!is_round_number(1_500.0));
        assert!(!is_round_number(50.0));
        assert!(!is_round_number(0.0));
        assert!(!is_round_number(250.5));
    }

    #[test]
    fn test_multiple_of_excludes_zero() {
        assert!(is_multiple_of(1_200.0, 100.0));
        assert!(!is_multiple_of(0.0, 100.0));
        assert!(!is_multiple_of(f64::INFINITY, 100.0));
    }
}
