//! Error types for the resampling and assembly pipeline.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    #[error("Simulation run carries no internal state")]
    MissingInternalState,

    #[error("Channel layout mismatch: {what}")]
    Channel { what: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] cs_core::CoreError),

    #[error("Model failed: {0}")]
    Model(#[from] cs_model::ModelError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Serialization(e.to_string())
    }
}
