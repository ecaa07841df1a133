use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the project store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("project '{0}' already exists")]
    AlreadyExists(String),

    #[error("malformed file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("invalid score {score} for '{criterion}': must be between 0 and 10")]
    InvalidScore { criterion: String, score: i64 },

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by what the user typed rather than by the files
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidScore { .. } | StoreError::InvalidName { .. }
        )
    }
}
