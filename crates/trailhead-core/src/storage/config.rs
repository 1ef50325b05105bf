//! TOML-based application configuration.
//!
//! Stored at `~/.config/trailhead/config.toml`. Every field has a serde
//! default so a partial or missing file never fails to load.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

fn default_pass_threshold() -> u32 {
    70
}

fn default_daily_goal() -> u32 {
    3
}

fn default_quiz_questions() -> usize {
    5
}

/// Study/quiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Percentage needed to pass a quiz attempt
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold_pct: u32,
    /// Default daily resource-completion goal for new users
    #[serde(default = "default_daily_goal")]
    pub default_daily_goal: u32,
    /// Question count for generated quizzes
    #[serde(default = "default_quiz_questions")]
    pub quiz_questions: usize,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            pass_threshold_pct: default_pass_threshold(),
            default_daily_goal: default_daily_goal(),
            quiz_questions: default_quiz_questions(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub study: StudyConfig,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/trailhead"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}
