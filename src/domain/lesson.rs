use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::quiz::Quiz;
use crate::domain::simulation::{SimulationKind, SimulationParams};

pub type LessonId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    A,
    B,
    C,
    D,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Phase::A => "A",
            Phase::B => "B",
            Phase::C => "C",
            Phase::D => "D",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseInfo {
    pub id: Phase,
    pub title: String,
    pub subtitle: String,
    pub lessons: Vec<LessonId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub kind: SimulationKind,
    pub description: String,
    pub default_params: SimulationParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub phase: Phase,
    pub concept: String,
    pub context: String,
    pub key_insight: String,
    pub reflection_questions: Vec<String>,
    pub simulation: SimulationConfig,
    pub quiz: Quiz,
}

/// Read-only course content: phases in order, lessons in order.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonCatalog {
    phases: Vec<PhaseInfo>,
    lessons: Vec<Lesson>,
}

impl LessonCatalog {
    pub fn new(phases: Vec<PhaseInfo>, lessons: Vec<Lesson>) -> Self {
        Self { phases, lessons }
    }

    pub fn phases(&self) -> &[PhaseInfo] {
        &self.phases
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    pub fn phase_for_lesson(&self, id: LessonId) -> Option<&PhaseInfo> {
        self.phases.iter().find(|phase| phase.lessons.contains(&id))
    }

    pub fn next_lesson(&self, id: LessonId) -> Option<LessonId> {
        let index = self.position(id)?;
        self.lessons.get(index + 1).map(|lesson| lesson.id)
    }

    pub fn previous_lesson(&self, id: LessonId) -> Option<LessonId> {
        let index = self.position(id)?;
        index
            .checked_sub(1)
            .and_then(|previous| self.lessons.get(previous))
            .map(|lesson| lesson.id)
    }

    fn position(&self, id: LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| lesson.id == id)
    }
}
