//! Benford first-digit analysis.

use sampling_core::constants::BENFORD_EXPECTED;
use sampling_core::models::BenfordDigit;

/// First significant digit of `|value|`, or `None` for zero and
/// non-finite values.
pub fn first_significant_digit(value: f64) -> Option<u8> {
    let abs = value.abs();
    if abs == 0.0 || !abs.is_finite() {
        return None;
    }
    // Scientific notation always leads with the first significant digit.
    let formatted = format!("{abs:e}");
    let digit = formatted.bytes().next()?.checked_sub(b'0')?;
    (1..=9).contains(&digit).then_some(digit)
}

/// Observed vs. expected first-digit frequencies for digits 1..=9.
///
/// A digit is suspicious when its deviation exceeds `threshold` percentage
/// points. With no nonzero values every frequency is 0 and nothing is
/// flagged.
pub fn analyze(values: &[f64], threshold: f64) -> Vec<BenfordDigit> {
    let mut counts = [0usize; 9];
    let mut total = 0usize;
    for &v in values {
        if let Some(d) = first_significant_digit(v) {
            counts[usize::from(d - 1)] += 1;
            total += 1;
        }
    }

    (1u8..=9)
        .zip(counts)
        .zip(BENFORD_EXPECTED)
        .map(|((digit, actual_count), expected_freq)| {
            if total == 0 {
                return BenfordDigit {
                    digit,
                    expected_freq,
                    actual_freq: 0.0,
                    actual_count: 0,
                    deviation: 0.0,
                    is_suspicious: false,
                };
            }
            let actual_freq = actual_count as f64 / total as f64 * 100.0;
            let deviation = (actual_freq - expected_freq).abs();
            BenfordDigit {
                digit,
                expected_freq,
                actual_freq,
                actual_count,
                deviation,
                is_suspicious: deviation > threshold,
            }
        })
        .collect()
}
