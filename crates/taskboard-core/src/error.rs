//! Core error types for Taskboard.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in core operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header row is missing or lacks a required column
    #[error("Schema error in {path}: {message}")]
    Schema { path: PathBuf, message: String },

    /// A single field could not be interpreted
    #[error("Invalid value for {column}: {value:?}")]
    InvalidValue { column: &'static str, value: String },

    /// An action was rejected before touching storage
    #[error("Validation error: {0}")]
    Validation(String),

    /// No task carries the given id
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        BoardError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for BoardError {
    fn from(e: serde_yaml::Error) -> Self {
        BoardError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::Schema {
            path: PathBuf::from("/data/gorevler.csv"),
            message: "missing column Durum".to_string(),
        };
        assert!(err.to_string().contains("/data/gorevler.csv"));
        assert!(err.to_string().contains("Durum"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: BoardError = io_err.into();
        assert!(matches!(err, BoardError::Io(_)));
    }
}
