//! Error types for the narrative chunker.
//!
//! A single error enum covers every failure category in the workspace:
//! configuration, input tables, embedding, vector storage and serialization.
//! Skipped records are not errors; they are counted by the run reporter.

use thiserror::Error;

/// Unified error type for the narrative chunker.
///
/// Library functions return `Result<T, AppError>` and propagate with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid chunking or runtime configuration. Raised before any record
    /// is processed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record source could not be read or parsed. Fatal to the run.
    #[error("Input error: {0}")]
    Input(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store errors
    #[error("Vector store error: {0}")]
    Store(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
