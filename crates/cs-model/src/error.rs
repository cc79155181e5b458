//! Error types for model operations.

use thiserror::Error;

/// Errors raised by battery models and the transient integrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Malformed simulation run: {what}")]
    MalformedRun { what: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<cs_core::CoreError> for ModelError {
    fn from(e: cs_core::CoreError) -> Self {
        ModelError::Backend {
            message: e.to_string(),
        }
    }
}
