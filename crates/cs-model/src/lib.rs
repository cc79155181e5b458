//! Battery model capability layer for cellscope.
//!
//! Provides:
//! - `BatteryModel`: the black-box interface the dashboard pipeline drives
//! - `SimulationRun` / `ChannelIndex` / `ModelDescription`: run output and layout
//! - Fixed-step RK4 and forward Euler integration for transient models
//! - Reference finite-difference particle models (single particle,
//!   single particle with SEI film, multi-particle pseudo-two-dimensional)

pub mod cell;
pub mod channels;
pub mod error;
pub mod integrator;
pub mod model;
pub mod ocp;
pub mod particle;
pub mod presets;
pub mod run;
pub mod sim;

// Internal modules
mod events;

// Re-exports for public API
pub use cell::{CellParams, ElectrodeParams, ParticleCell};
pub use channels::{
    ChannelIndex, DepthOrder, ModelDescription, ParticleChannels, Region, RegionGeometry,
};
pub use error::{ModelError, ModelResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::{BatteryModel, TransientModel};
pub use particle::SphericalParticle;
pub use presets::{ModelPreset, PresetOverrides};
pub use run::{ChargeDirection, RunRequest, SimulationRun};
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim};
