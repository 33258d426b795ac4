//! Percentile helpers using linear interpolation between order statistics
//! (the R-7 / spreadsheet `PERCENTILE.INC` convention).
//!
//! - Empty input => `0.0`.
//! - The fractional position is `(p / 100) * (len - 1)`; the result blends
//!   the two bracketing values by the fractional part.
//! - `p` outside [0, 100] clamps to the first or last element.

/// Returns the percentile of a slice that is already sorted ascending.
pub fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return 0.0;
    };

    let position = (percentile / 100.0 * last as f64).clamp(0.0, last as f64);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted_values[lower];
    }

    let weight = position - lower as f64;
    sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
}

/// Sorts a copy of `values` and returns its percentile.
pub fn percentile(values: &[f64], percentile: f64) -> f64 {
    percentile_sorted(&sorted_copy(values), percentile)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
