use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::lesson::{Lesson, LessonId};
use crate::domain::simulation::{SimulationKind, SimulationParams};
use crate::services::histogram::create_histogram_bins;
use crate::services::progress_store::ProgressStoreError;
use crate::services::sampler::Sampler;
use crate::services::simulation_types::{RunState, SimulationResult};
use crate::services::statistics::calculate_stats;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("a simulation is already running for lesson {0}")]
    Busy(LessonId),
    #[error("failed to record simulation completion: {0}")]
    Progress(#[from] ProgressStoreError),
}

/// Receives the "simulation completed" notification of a session.
pub trait CompletionSink {
    fn simulation_completed(&mut self, lesson_id: LessonId) -> Result<(), ProgressStoreError>;
}

/// Builds the sample series for `kind` from `params`, drawing from
/// `sampler`. Absent parameters fall back to the recipe's defaults.
pub fn compose_series<S: Sampler + ?Sized>(
    kind: SimulationKind,
    params: &SimulationParams,
    sampler: &mut S,
) -> Vec<f64> {
    match kind {
        SimulationKind::SingleNormal
        | SimulationKind::ExpectedVsRealized
        | SimulationKind::PercentileFinder => sampler.sample_normal(
            params.sample_count(1000),
            params.get_or("mean", 1500.0),
            params.get_or("stdDev", 100.0),
        ),
        // Only the first of the two distributions is visualised.
        SimulationKind::VarianceComparison => sampler.sample_normal(
            params.sample_count(1000),
            params.get_or("mean", 1500.0),
            params.get_or("stdDev1", 50.0),
        ),
        SimulationKind::SumIndependent => {
            let n = params.sample_count(1000);
            let xs = sampler.sample_normal(n, params.get_or("mean1", 100.0), params.get_or("std1", 20.0));
            let ys = sampler.sample_normal(n, params.get_or("mean2", 100.0), params.get_or("std2", 20.0));
            xs.iter().zip(&ys).map(|(x, y)| x + y).collect()
        }
        SimulationKind::SumCorrelated => {
            let (xs, ys) = sampler.sample_correlated_normals(
                params.sample_count(1000),
                params.get_or("mean1", 100.0),
                params.get_or("std1", 20.0),
                params.get_or("mean2", 100.0),
                params.get_or("std2", 20.0),
                params.get_or("rho", 0.5),
            );
            xs.iter().zip(&ys).map(|(x, y)| x + y).collect()
        }
        SimulationKind::SimpleCashflow => {
            let n = params.sample_count(1000);
            let revenues = sampler.sample_normal(
                n,
                params.get_or("revenueMean", 150.0),
                params.get_or("revenueStd", 20.0),
            );
            let costs = sampler.sample_normal(
                n,
                params.get_or("costMean", 80.0),
                params.get_or("costStd", 10.0),
            );
            revenues.iter().zip(&costs).map(|(r, c)| r - c).collect()
        }
        SimulationKind::BinaryDefault => {
            let cashflows = sampler.sample_normal(
                params.sample_count(10_000),
                params.get_or("cashflowMean", 70.0),
                params.get_or("cashflowStd", 22.0),
            );
            let default_prob = params.get_or("defaultProb", 0.05);
            cashflows
                .into_iter()
                .map(|cashflow| {
                    if sampler.bernoulli(default_prob) == 1.0 {
                        0.0
                    } else {
                        cashflow
                    }
                })
                .collect()
        }
        SimulationKind::SqrtNEffect
        | SimulationKind::SqrtNCorrelated
        | SimulationKind::MultiPeriod
        | SimulationKind::IrrDistribution
        | SimulationKind::DscrDistribution
        | SimulationKind::PortfolioAggregation
        | SimulationKind::ReserveSizing => sampler.sample_normal(
            params.sample_count(1000),
            params.get_or("mean", 100.0),
            params.get_or("stdDev", 20.0),
        ),
    }
}

/// Composes one series and summarises it.
pub fn run_simulation<S: Sampler + ?Sized>(
    lesson_id: LessonId,
    kind: SimulationKind,
    params: &SimulationParams,
    bin_count: usize,
    sampler: &mut S,
) -> SimulationResult {
    let samples = compose_series(kind, params, sampler);
    debug!(lesson_id, %kind, samples = samples.len(), "composed sample series");
    SimulationResult {
        lesson_id,
        kind,
        params: params.clone(),
        sample_count: samples.len(),
        stats: calculate_stats(&samples),
        histogram: create_histogram_bins(&samples, bin_count),
        samples,
    }
}

/// One lesson's simulation panel: editable parameters, a busy guard, and
/// the latest result, which each run replaces.
pub struct SimulationSession {
    lesson_id: LessonId,
    kind: SimulationKind,
    params: SimulationParams,
    bin_count: usize,
    run_delay: Duration,
    state: RunState,
    notified: bool,
    result: Option<SimulationResult>,
}

impl SimulationSession {
    pub fn new(lesson: &Lesson, bin_count: usize) -> Self {
        Self {
            lesson_id: lesson.id,
            kind: lesson.simulation.kind,
            params: lesson.simulation.default_params.clone(),
            bin_count,
            run_delay: Duration::ZERO,
            state: RunState::Idle,
            notified: false,
            result: None,
        }
    }

    /// Pause before a run completes, so a "running" indicator can render.
    pub fn with_run_delay(mut self, run_delay: Duration) -> Self {
        self.run_delay = run_delay;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn set_param(&mut self, name: &str, value: f64) -> Result<(), SimulationError> {
        self.ensure_not_running()?;
        self.params.set(name, value);
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &SimulationParams) -> Result<(), SimulationError> {
        self.ensure_not_running()?;
        self.params = self.params.merged(overrides);
        Ok(())
    }

    /// Moves the session to `Running` and freezes the parameters for the run.
    fn begin(&mut self) -> Result<SimulationParams, SimulationError> {
        self.ensure_not_running()?;
        self.state = RunState::Running;
        Ok(self.params.clone())
    }

    pub fn run<S, C>(&mut self, sampler: &mut S, sink: &mut C) -> Result<&SimulationResult, SimulationError>
    where
        S: Sampler + ?Sized,
        C: CompletionSink + ?Sized,
    {
        let params = self.begin()?;
        let result = run_simulation(self.lesson_id, self.kind, &params, self.bin_count, sampler);
        if !self.run_delay.is_zero() {
            std::thread::sleep(self.run_delay);
        }
        self.finish(result, sink)
    }

    fn finish<C: CompletionSink + ?Sized>(
        &mut self,
        result: SimulationResult,
        sink: &mut C,
    ) -> Result<&SimulationResult, SimulationError> {
        info!(
            lesson_id = self.lesson_id,
            kind = %self.kind,
            samples = result.sample_count,
            mean = result.stats.mean,
            "simulation completed"
        );
        self.state = RunState::Completed;
        let stored = self.result.insert(result);
        if !self.notified {
            sink.simulation_completed(self.lesson_id)?;
            self.notified = true;
        }
        Ok(&*stored)
    }

    fn ensure_not_running(&self) -> Result<(), SimulationError> {
        if self.state == RunState::Running {
            return Err(SimulationError::Busy(self.lesson_id));
        }
        Ok(())
    }
}
