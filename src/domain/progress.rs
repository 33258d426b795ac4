use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::lesson::LessonId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonProgress {
    pub started: bool,
    pub simulation_completed: bool,
    pub quiz_score: Option<u32>,
    pub quiz_attempts: u32,
    pub completed: bool,
    pub notes: String,
    pub last_accessed: Option<DateTime<Utc>>,
}

/// The persisted progress document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub lesson_progress: BTreeMap<LessonId, LessonProgress>,
    pub current_lesson: LessonId,
    pub last_accessed: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            lesson_progress: BTreeMap::new(),
            current_lesson: 1,
            last_accessed: now,
        }
    }

    pub fn lesson(&self, id: LessonId) -> LessonProgress {
        self.lesson_progress.get(&id).cloned().unwrap_or_default()
    }

    pub fn completed_lessons(&self) -> usize {
        self.lesson_progress
            .values()
            .filter(|lesson| lesson.completed)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}
