use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// The simulation a lesson declares. Each kind maps to exactly one
/// composition recipe in `services::simulation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationKind {
    SingleNormal,
    ExpectedVsRealized,
    VarianceComparison,
    PercentileFinder,
    SumIndependent,
    SumCorrelated,
    SqrtNEffect,
    SqrtNCorrelated,
    SimpleCashflow,
    BinaryDefault,
    MultiPeriod,
    IrrDistribution,
    DscrDistribution,
    PortfolioAggregation,
    ReserveSizing,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 15] = [
        SimulationKind::SingleNormal,
        SimulationKind::ExpectedVsRealized,
        SimulationKind::VarianceComparison,
        SimulationKind::PercentileFinder,
        SimulationKind::SumIndependent,
        SimulationKind::SumCorrelated,
        SimulationKind::SqrtNEffect,
        SimulationKind::SqrtNCorrelated,
        SimulationKind::SimpleCashflow,
        SimulationKind::BinaryDefault,
        SimulationKind::MultiPeriod,
        SimulationKind::IrrDistribution,
        SimulationKind::DscrDistribution,
        SimulationKind::PortfolioAggregation,
        SimulationKind::ReserveSizing,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SimulationKind::SingleNormal => "single-normal",
            SimulationKind::ExpectedVsRealized => "expected-vs-realized",
            SimulationKind::VarianceComparison => "variance-comparison",
            SimulationKind::PercentileFinder => "percentile-finder",
            SimulationKind::SumIndependent => "sum-independent",
            SimulationKind::SumCorrelated => "sum-correlated",
            SimulationKind::SqrtNEffect => "sqrt-n-effect",
            SimulationKind::SqrtNCorrelated => "sqrt-n-correlated",
            SimulationKind::SimpleCashflow => "simple-cashflow",
            SimulationKind::BinaryDefault => "binary-default",
            SimulationKind::MultiPeriod => "multi-period",
            SimulationKind::IrrDistribution => "irr-distribution",
            SimulationKind::DscrDistribution => "dscr-distribution",
            SimulationKind::PortfolioAggregation => "portfolio-aggregation",
            SimulationKind::ReserveSizing => "reserve-sizing",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ParamError {
    #[error("unknown simulation kind: {0}")]
    UnknownKind(String),
    #[error("expected name=value, got: {0}")]
    MissingSeparator(String),
    #[error("parameter name is empty in: {0}")]
    EmptyName(String),
    #[error("invalid number for {name}: {value}")]
    InvalidNumber { name: String, value: String },
}

impl FromStr for SimulationKind {
    type Err = ParamError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SimulationKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == value)
            .ok_or_else(|| ParamError::UnknownKind(value.to_string()))
    }
}

pub const MAX_SAMPLE_COUNT: usize = 1_000_000;

/// Named numeric parameters of a simulation run, e.g. `mean`, `stdDev`, `rho`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationParams {
    values: BTreeMap<String, f64>,
}

impl SimulationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of `name`, or `default` when the parameter is absent.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// Sample count parameter. Negative, fractional and NaN values truncate
    /// toward zero; anything above [`MAX_SAMPLE_COUNT`] (including infinity)
    /// is capped.
    pub fn sample_count(&self, default: usize) -> usize {
        let Some(samples) = self.get("samples") else {
            return default;
        };
        let count = samples as usize;
        if count > MAX_SAMPLE_COUNT {
            warn!(requested = samples, cap = MAX_SAMPLE_COUNT, "sample count capped");
            return MAX_SAMPLE_COUNT;
        }
        count
    }

    /// Returns a copy where every entry of `overrides` replaces or adds to
    /// the current values.
    pub fn merged(&self, overrides: &SimulationParams) -> SimulationParams {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.set(name, value);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parses a single `name=value` override as given on the command line.
pub fn parse_param_override(input: &str) -> Result<(String, f64), ParamError> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| ParamError::MissingSeparator(input.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParamError::EmptyName(input.to_string()));
    }
    let value = value.trim();
    let number = value.parse::<f64>().map_err(|_| ParamError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    Ok((name.to_string(), number))
}

pub fn params_from_overrides<S: AsRef<str>>(
    overrides: &[S],
) -> Result<SimulationParams, ParamError> {
    let mut params = SimulationParams::new();
    for input in overrides {
        let (name, value) = parse_param_override(input.as_ref())?;
        params.set(&name, value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip_through_from_str() {
        for kind in SimulationKind::ALL {
            assert_eq!(kind.tag().parse::<SimulationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_deserializes_from_kebab_case_yaml() {
        let kind: SimulationKind = serde_yaml::from_str("sum-correlated").unwrap();
        assert_eq!(kind, SimulationKind::SumCorrelated);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "monte-carlo".parse::<SimulationKind>().unwrap_err();
        assert_eq!(err, ParamError::UnknownKind("monte-carlo".to_string()));
    }

    #[test]
    fn get_or_falls_back_only_when_absent() {
        let params = SimulationParams::new().with("mean", 0.0);
        assert_eq!(params.get_or("mean", 1500.0), 0.0);
        assert_eq!(params.get_or("stdDev", 100.0), 100.0);
    }

    #[test]
    fn sample_count_truncates_negative_values_to_zero() {
        let params = SimulationParams::new().with("samples", -5.0);
        assert_eq!(params.sample_count(1000), 0);
        assert_eq!(SimulationParams::new().sample_count(1000), 1000);
    }

    #[test]
    fn sample_count_caps_huge_and_infinite_values() {
        for samples in [1e30, f64::INFINITY, 5_000_000.0] {
            let params = SimulationParams::new().with("samples", samples);
            assert_eq!(params.sample_count(1000), MAX_SAMPLE_COUNT);
        }
        let params = SimulationParams::new().with("samples", f64::NAN);
        assert_eq!(params.sample_count(1000), 0);
        let params = SimulationParams::new().with("samples", 2500.9);
        assert_eq!(params.sample_count(1000), 2500);
    }

    #[test]
    fn merged_overrides_replace_defaults() {
        let defaults = SimulationParams::new().with("mean", 1500.0).with("stdDev", 100.0);
        let overrides = SimulationParams::new().with("stdDev", 50.0).with("samples", 10.0);
        let merged = defaults.merged(&overrides);

        assert_eq!(merged.get("mean"), Some(1500.0));
        assert_eq!(merged.get("stdDev"), Some(50.0));
        assert_eq!(merged.get("samples"), Some(10.0));
    }

    #[test]
    fn parse_param_override_accepts_name_value_pairs() {
        assert_eq!(
            parse_param_override(" rho = 0.7").unwrap(),
            ("rho".to_string(), 0.7)
        );
        assert!(matches!(
            parse_param_override("rho"),
            Err(ParamError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_param_override("=1"),
            Err(ParamError::EmptyName(_))
        ));
        assert!(matches!(
            parse_param_override("rho=high"),
            Err(ParamError::InvalidNumber { .. })
        ));
    }
}
