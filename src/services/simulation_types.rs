use serde::Serialize;

use crate::domain::lesson::LessonId;
use crate::domain::simulation::{SimulationKind, SimulationParams};
use crate::services::histogram::HistogramBin;
use crate::services::statistics::SummaryStats;

/// Outcome of one run. Stats and histogram are derived from `samples`.
#[derive(Serialize, Debug, Clone)]
pub struct SimulationResult {
    pub lesson_id: LessonId,
    pub kind: SimulationKind,
    pub params: SimulationParams,
    pub sample_count: usize,
    pub stats: SummaryStats,
    pub histogram: Vec<HistogramBin>,
    #[serde(skip)]
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
}
