//! Descriptive statistics and project-finance ratios over sample series.
//!
//! Every function here is total: degenerate input yields a sentinel value
//! (`0.0`, `+inf`, or an unconverged IRR estimate) instead of an error.

use serde::Serialize;

use crate::services::percentiles::{percentile_sorted, sorted_copy};

const IRR_MAX_ITERATIONS: u32 = 100;
const IRR_TOLERANCE: f64 = 1e-7;
const IRR_MIN_DERIVATIVE: f64 = 1e-10;
pub const IRR_DEFAULT_GUESS: f64 = 0.10;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with Bessel's correction.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let squared_diffs: f64 = values.iter().map(|value| (value - m).powi(2)).sum();
    squared_diffs / (values.len() - 1) as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Smallest value under `f64::total_cmp`, matching the sorted copy in
/// `calculate_stats`.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().min_by(f64::total_cmp).unwrap_or(0.0)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().max_by(f64::total_cmp).unwrap_or(0.0)
}

/// Summarises one series. Percentiles and bounds come from a single sorted
/// copy, moments from a linear pass over the same values.
pub fn calculate_stats(samples: &[f64]) -> SummaryStats {
    let sorted = sorted_copy(samples);
    let variance = variance(samples);
    SummaryStats {
        mean: mean(samples),
        variance,
        std_dev: variance.sqrt(),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
        p10: percentile_sorted(&sorted, 10.0),
        p50: percentile_sorted(&sorted, 50.0),
        p90: percentile_sorted(&sorted, 90.0),
    }
}

/// Pearson correlation. Returns `0.0` for mismatched lengths, fewer than
/// two points, or a side with zero variance.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sum_xy += dx * dy;
        sum_x2 += dx * dx;
        sum_y2 += dy * dy;
    }

    let denominator = (sum_x2 * sum_y2).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    sum_xy / denominator
}

/// Net present value of `cashflows[t]` discounted at `rate`, with the first
/// cashflow at t = 0.
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, cashflow)| cashflow / (1.0 + rate).powi(t as i32))
        .sum()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct IrrEstimate {
    pub rate: f64,
    /// `false` when the iteration cap was hit or the derivative vanished
    /// before the step fell below tolerance.
    pub converged: bool,
    pub iterations: u32,
}

pub fn calculate_irr(cashflows: &[f64]) -> IrrEstimate {
    calculate_irr_with_guess(cashflows, IRR_DEFAULT_GUESS)
}

/// Newton–Raphson on NPV(r). Sign patterns with several roots (or none)
/// converge to whichever root the guess leads to, if any.
pub fn calculate_irr_with_guess(cashflows: &[f64], guess: f64) -> IrrEstimate {
    let mut rate = guess;

    for iteration in 1..=IRR_MAX_ITERATIONS {
        let mut value = 0.0;
        let mut derivative = 0.0;
        for (t, cashflow) in cashflows.iter().enumerate() {
            let t = t as i32;
            value += cashflow / (1.0 + rate).powi(t);
            derivative -= f64::from(t) * cashflow / (1.0 + rate).powi(t + 1);
        }

        if derivative.abs() < IRR_MIN_DERIVATIVE {
            return IrrEstimate {
                rate,
                converged: false,
                iterations: iteration,
            };
        }

        let next_rate = rate - value / derivative;
        if (next_rate - rate).abs() < IRR_TOLERANCE {
            return IrrEstimate {
                rate: next_rate,
                converged: true,
                iterations: iteration,
            };
        }
        rate = next_rate;
    }

    IrrEstimate {
        rate,
        converged: false,
        iterations: IRR_MAX_ITERATIONS,
    }
}

/// Debt service coverage ratio; `+inf` when debt service is exactly zero.
pub fn calculate_dscr(net_cashflow: f64, debt_service: f64) -> f64 {
    if debt_service == 0.0 {
        return f64::INFINITY;
    }
    net_cashflow / debt_service
}
