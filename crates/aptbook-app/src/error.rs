//! Application-level errors.

use aptbook_core::{TracingError, ValidationError};
use aptbook_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// An appointment draft failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage service reported a failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Command-line input that cannot be expressed as a clap constraint.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Convenience alias for application results.
pub type AppResult<T> = Result<T, AppError>;
