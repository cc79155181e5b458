//! Shared application service layer for cellscope.
//!
//! Centralizes configuration loading, model lookup, pipeline execution,
//! and time-slice queries so front ends stay thin.

pub mod config_service;
pub mod error;
pub mod query;
pub mod run_service;

// Re-export key types for convenience
pub use config_service::{ModelSummary, get_model, list_models, load_config};
pub use error::{AppError, AppResult};
pub use query::{Marker, ProfileSlice, TimeSlice, time_slice};
pub use run_service::{RunRequest, RunResponse, simulate, simulate_model};
