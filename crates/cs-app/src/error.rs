//! Error types for the cs-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Time index {index} out of range for {len} display points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cs-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<cs_config::ConfigError> for AppError {
    fn from(err: cs_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<cs_model::ModelError> for AppError {
    fn from(err: cs_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<cs_pipeline::PipelineError> for AppError {
    fn from(err: cs_pipeline::PipelineError) -> Self {
        AppError::Pipeline(err.to_string())
    }
}
