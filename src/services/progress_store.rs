use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::lesson::LessonId;
use crate::domain::progress::{LessonProgress, PhaseProgress, UserProgress};
use crate::services::simulation::CompletionSink;

pub const DEFAULT_PROGRESS_FILE: &str = "stochastic-course-progress.json";

#[derive(Error, Debug)]
pub enum ProgressStoreError {
    #[error("failed to read progress file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write progress file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove progress file {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("failed to serialize progress: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raw storage of the serialized progress document.
pub trait ProgressBackend {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>, ProgressStoreError>;
    fn save(&mut self, contents: &str) -> Result<(), ProgressStoreError>;
    fn clear(&mut self) -> Result<(), ProgressStoreError>;
}

/// Keeps the document in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<String>, ProgressStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ProgressStoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), ProgressStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ProgressStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|source| ProgressStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&mut self) -> Result<(), ProgressStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ProgressStoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Some(contents.to_string()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, ProgressStoreError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), ProgressStoreError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ProgressStoreError> {
        self.contents = None;
        Ok(())
    }
}

pub type Clock = fn() -> DateTime<Utc>;

/// Read/update/reset operations over the persisted [`UserProgress`].
///
/// Every update is a read-modify-write of the whole document. Missing or
/// malformed stored data reads as a fresh default document.
pub struct ProgressStore<B: ProgressBackend> {
    backend: B,
    clock: Clock,
}

impl<B: ProgressBackend> ProgressStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Utc::now)
    }

    pub fn with_clock(backend: B, clock: Clock) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn progress(&self) -> UserProgress {
        let stored = match self.backend.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "progress unavailable, using defaults");
                None
            }
        };
        let Some(contents) = stored else {
            return UserProgress::new((self.clock)());
        };
        match serde_json::from_str(&contents) {
            Ok(progress) => progress,
            Err(e) => {
                warn!(error = %e, "stored progress is malformed, using defaults");
                UserProgress::new((self.clock)())
            }
        }
    }

    pub fn lesson_progress(&self, lesson_id: LessonId) -> LessonProgress {
        self.progress().lesson(lesson_id)
    }

    pub fn update_lesson<F>(&mut self, lesson_id: LessonId, apply: F) -> Result<LessonProgress, ProgressStoreError>
    where
        F: FnOnce(&mut LessonProgress),
    {
        let mut progress = self.progress();
        let mut lesson = progress.lesson(lesson_id);
        apply(&mut lesson);
        lesson.last_accessed = Some((self.clock)());
        progress.lesson_progress.insert(lesson_id, lesson.clone());
        self.save(&mut progress)?;
        Ok(lesson)
    }

    pub fn mark_lesson_started(&mut self, lesson_id: LessonId) -> Result<(), ProgressStoreError> {
        let mut progress = self.progress();
        let mut lesson = progress.lesson(lesson_id);
        lesson.started = true;
        lesson.last_accessed = Some((self.clock)());
        progress.lesson_progress.insert(lesson_id, lesson);
        progress.current_lesson = lesson_id;
        self.save(&mut progress)
    }

    /// Idempotent: once the flag is set, further calls do not touch storage.
    pub fn mark_simulation_completed(&mut self, lesson_id: LessonId) -> Result<(), ProgressStoreError> {
        if self.lesson_progress(lesson_id).simulation_completed {
            debug!(lesson_id, "simulation already recorded as completed");
            return Ok(());
        }
        self.update_lesson(lesson_id, |lesson| lesson.simulation_completed = true)?;
        Ok(())
    }

    /// Records a quiz attempt and returns whether it passed.
    pub fn save_quiz_score(
        &mut self,
        lesson_id: LessonId,
        score: u32,
        passing_score: u32,
    ) -> Result<bool, ProgressStoreError> {
        let passed = score >= passing_score;
        self.update_lesson(lesson_id, |lesson| {
            lesson.quiz_score = Some(score);
            lesson.quiz_attempts += 1;
            lesson.completed = passed;
        })?;
        Ok(passed)
    }

    pub fn save_lesson_notes(&mut self, lesson_id: LessonId, notes: &str) -> Result<(), ProgressStoreError> {
        self.update_lesson(lesson_id, |lesson| lesson.notes = notes.to_string())?;
        Ok(())
    }

    pub fn reset_progress(&mut self) -> Result<(), ProgressStoreError> {
        self.backend.clear()
    }

    pub fn completed_lessons_count(&self) -> usize {
        self.progress().completed_lessons()
    }

    pub fn phase_progress(&self, phase_lessons: &[LessonId]) -> PhaseProgress {
        let progress = self.progress();
        let completed = phase_lessons
            .iter()
            .filter(|id| progress.lesson_progress.get(*id).is_some_and(|lesson| lesson.completed))
            .count();
        let total = phase_lessons.len();
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        PhaseProgress {
            completed,
            total,
            percentage,
        }
    }

    fn save(&mut self, progress: &mut UserProgress) -> Result<(), ProgressStoreError> {
        progress.last_accessed = (self.clock)();
        let contents = serde_json::to_string_pretty(progress)?;
        self.backend.save(&contents)
    }
}

impl<B: ProgressBackend> CompletionSink for ProgressStore<B> {
    fn simulation_completed(&mut self, lesson_id: LessonId) -> Result<(), ProgressStoreError> {
        self.mark_simulation_completed(lesson_id)
    }
}
