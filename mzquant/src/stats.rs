//! Small numeric helpers shared by the quantitation engine.

use itertools::Itertools;

/// Divide `numerator` by `denominator`, treating a zero denominator as the
/// absence of signal rather than an error.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// The arithmetic mean of `values`, or [`None`] for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// The standard median of `values`: the middle value for an odd count, the
/// mean of the two middle values for an even count, [`None`] for an empty
/// slice.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n if n % 2 == 0 => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
        n => Some(sorted[n / 2]),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(100.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(-5.0, 0.0), 0.0);
        assert_eq!(safe_div(600.0, 300.0), 2.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[2.0]), Some(2.0));
        assert_eq!(median(&[]), None);
        // unsorted input is handled
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0]), Some(1.5));
    }
}
