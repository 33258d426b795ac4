use std::env;
use std::fs;
use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::services::histogram::DEFAULT_BIN_COUNT;
use crate::services::progress_store::DEFAULT_PROGRESS_FILE;

pub const PROGRESS_FILE_ENV: &str = "STOCHASTICS_PROGRESS_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Course settings. Every field is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Lesson catalog to use instead of the built-in course.
    pub lessons_file: Option<String>,
    pub progress_file: String,
    pub histogram_bins: usize,
    /// Pause before a simulation result is shown.
    pub run_delay_ms: u64,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            lessons_file: None,
            progress_file: DEFAULT_PROGRESS_FILE.to_string(),
            histogram_bins: DEFAULT_BIN_COUNT,
            run_delay_ms: 0,
        }
    }
}

impl CourseConfig {
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input)
    }

    /// Config file (or defaults), then the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        if let Ok(progress_file) = env::var(PROGRESS_FILE_ENV) {
            if !progress_file.is_empty() {
                config.progress_file = progress_file;
            }
        }
        Ok(config)
    }
}
