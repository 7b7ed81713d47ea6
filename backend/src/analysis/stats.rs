//! Descriptive statistics on `f64` samples.
//!
//! Standard deviations are sample deviations (N-1 denominator) and are NaN
//! for fewer than two values. Every function is total: empty input yields
//! NaN rather than a panic.

use std::collections::HashMap;

use crate::error::AnalysisError;
use crate::models::TemperatureSummary;

/// Round half away from zero to `decimals` places. NaN and infinities pass through.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value; average of the two middle values for an even count.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample variance (N-1 denominator).
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    ss / (values.len() - 1) as f64
}

/// Sample standard deviation (N-1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Most frequent value, smallest first on ties.
///
/// Returns `None` when no value occurs more than once.
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for &v in values {
        // -0.0 and 0.0 count as the same value
        let key = if v == 0.0 { 0f64.to_bits() } else { v.to_bits() };
        counts.entry(key).or_insert((v, 0)).1 += 1;
    }

    counts
        .into_values()
        .filter(|&(_, count)| count > 1)
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.total_cmp(&a.0)))
        .map(|(value, _)| value)
}

/// Mode, falling back to the median when every value is unique.
pub fn mode_or_median(values: &[f64]) -> f64 {
    mode(values).unwrap_or_else(|| median(values))
}

/// Mean, median, mode and sample standard deviation, rounded to 2 decimals.
pub fn summarize(values: &[f64]) -> Result<TemperatureSummary, AnalysisError> {
    let mean = ensure_finite("temperature mean", mean(values))?;
    let median = ensure_finite("temperature median", median(values))?;
    let mode = ensure_finite("temperature mode", mode_or_median(values))?;

    let std = sample_std(values);
    if values.len() > 1 {
        ensure_finite("temperature standard deviation", std)?;
    }

    Ok(TemperatureSummary {
        mean: round_to(mean, 2),
        median: round_to(median, 2),
        mode: round_to(mode, 2),
        standard_deviation: round_to(std, 2),
    })
}

pub(crate) fn ensure_finite(what: &str, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::new(format!("{} is not a finite number ({})", what, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(10.125, 2), 10.13);
        assert_eq!(round_to(-10.125, 2), -10.13);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sample_std() {
        // var = ((2-5)^2 + (4-5)^2 + (4-5)^2 + (4-5)^2 + (5-5)^2 + (5-5)^2 + (7-5)^2 + (9-5)^2) / 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_variance(&values) - 32.0 / 7.0).abs() < 1e-12);
        assert!(sample_std(&[5.0]).is_nan());
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), Some(2.0));
        // tie between 1.0 and 3.0 -> smallest
        assert_eq!(mode(&[3.0, 3.0, 1.0, 1.0, 2.0]), Some(1.0));
        assert_eq!(mode(&[0.0, -0.0, 5.0]), Some(0.0));
        assert_eq!(mode(&[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_mode_falls_back_to_median() {
        assert_eq!(mode_or_median(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mode_or_median(&[3.0, 10.0]), 6.5);
    }

    #[test]
    fn test_summarize_rounds() {
        let summary = summarize(&[10.123, 10.127]).unwrap();
        assert_eq!(summary.mean, 10.13);
        assert_eq!(summary.median, 10.13);
        assert_eq!(summary.mode, 10.13);
        assert_eq!(summary.standard_deviation, 0.0);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize(&[7.0]).unwrap();
        assert_eq!(summary.mean, 7.0);
        assert!(summary.standard_deviation.is_nan());
    }

    #[test]
    fn test_summarize_overflow_is_an_error() {
        let err = summarize(&[f64::MAX, f64::MAX]).unwrap_err();
        assert!(err.message.contains("mean"));
    }
}
