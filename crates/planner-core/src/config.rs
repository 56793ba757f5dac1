//! Configuration for the task planner.

use crate::error::{PlannerError, PlannerResult};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "task-planner";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str::<Config>(&s).ok())
            .filter(|c| c.validate().is_ok())
            .unwrap_or_default()
    }

    /// Load from an explicit file. Unlike [`Config::load`], a bad file is an error.
    pub fn from_file(path: &Path) -> PlannerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.scheduler.interval_secs == 0 {
            return Err(PlannerError::Config(
                "scheduler.interval_secs must be greater than zero".to_string(),
            ));
        }
        let format = &self.display.date_format;
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(PlannerError::Config(format!(
                "display.date_format {format:?} is not a valid date format"
            )));
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Directory holding `<user>_tasks.json` files.
    pub fn data_dir(&self) -> PathBuf {
        self.store
            .data_dir
            .clone()
            .or_else(|| directories::ProjectDirs::from("", "", APP_NAME).map(|d| d.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Seed example tasks when a user has no task file yet.
    #[serde(default = "default_true")]
    pub seed_examples: bool,
}

fn default_true() -> bool { true }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_examples: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 { 60 }

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String { "%d.%m.%Y".to_string() }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}
