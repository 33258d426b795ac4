use std::time::Duration;

use thiserror::Error;

use crate::commands::base_commands::CliArgs;
use crate::config::{ConfigError, CourseConfig};
use crate::domain::lesson::{Lesson, LessonCatalog, LessonId};
use crate::services::lesson_yaml::{load_catalog, LessonYamlError};
use crate::services::progress_store::{JsonFileBackend, ProgressStore};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lessons(#[from] LessonYamlError),
}

#[derive(Error, Debug)]
#[error("unknown lesson: {0}")]
pub struct UnknownLesson(pub LessonId);

/// Everything a command needs: settings, course content, progress.
pub struct CourseContext {
    pub config: CourseConfig,
    pub catalog: LessonCatalog,
    pub store: ProgressStore<JsonFileBackend>,
}

impl CourseContext {
    /// Config file and environment first, then command line flags.
    pub fn from_args(args: &CliArgs) -> Result<Self, ContextError> {
        let mut config = CourseConfig::load(args.config.as_deref())?;
        if let Some(lessons) = &args.lessons {
            config.lessons_file = Some(lessons.clone());
        }
        if let Some(progress) = &args.progress {
            config.progress_file = progress.clone();
        }

        let catalog = load_catalog(config.lessons_file.as_deref())?;
        let store = ProgressStore::new(JsonFileBackend::new(&config.progress_file));
        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    pub fn lesson(&self, id: LessonId) -> Result<&Lesson, UnknownLesson> {
        self.catalog.lesson(id).ok_or(UnknownLesson(id))
    }

    pub fn run_delay(&self) -> Duration {
        Duration::from_millis(self.config.run_delay_ms)
    }
}
