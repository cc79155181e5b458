//! Dashboard series pipeline for cellscope.
//!
//! A request flows through four stages:
//! - `invoke`: map the requested current to a model run (or idle)
//! - `resample`: PCHIP resampling of raw channels onto the display axis
//! - `partition`: split internal state into per-region particle bundles
//! - `assemble`: build the JSON payload and the capacity metric

pub mod assemble;
pub mod capacity;
pub mod error;
pub mod invoke;
pub mod partition;
pub mod payload;
pub mod resample;

pub use assemble::{
    AssemblySettings, PipelineSettings, assemble, display_axis, run_capacity, run_pipeline,
    run_pipeline_timed,
};
pub use capacity::derived_capacity;
pub use error::{PipelineError, PipelineResult};
pub use invoke::{
    DEFAULT_CURRENT_FLOOR_A, Invocation, InvocationSettings, invoke, resolve_current,
};
pub use partition::{ParticleProfile, Partitioned, RegionBundle, partition, partition_region};
pub use payload::{
    DashboardPayload, InternalData, MainPayload, PayloadJson, PipelineOutput, RegionPayload,
    RunSummary, VoltageData,
};
pub use resample::{Pchip, ResampledSeries, resample_channel, resample_columns};
