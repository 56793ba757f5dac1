//! Planner error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the planner core.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The task file could not be read, written or decoded.
    #[error("Persistence error ({}): {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceSource,
    },

    /// A reminder string has no valid `dd.MM.yyyy HH:mm` prefix.
    #[error("Invalid reminder {input:?}: {reason}")]
    ReminderParse { input: String, reason: String },

    /// Rejected user input (blank text, missing file).
    #[error("Validation error: {0}")]
    Validation(String),

    /// No task at the given position.
    #[error("Task not found: {0}")]
    TaskNotFound(usize),

    /// No attachment at the given position on a task.
    #[error("Attachment {index} not found on task {task}")]
    AttachmentNotFound { task: usize, index: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Underlying cause of a [`PlannerError::Persistence`].
#[derive(Debug, Error)]
pub enum PersistenceSource {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: impl Into<PersistenceSource>) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn reminder(input: &str, reason: impl Into<String>) -> Self {
        Self::ReminderParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the data file rather than by the caller.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

impl From<toml::de::Error> for PlannerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
