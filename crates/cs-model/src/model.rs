//! Model traits: transient dynamics and the battery black-box capability.

use crate::channels::ModelDescription;
use crate::error::ModelResult;
use crate::run::{RunRequest, SimulationRun};

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self to allow models to keep scratch buffers between calls.
    fn rhs(&mut self, t: f64, x: &Self::State) -> ModelResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Terminal event: return true once integration should stop at `x`.
    fn should_stop(&self, _t: f64, _x: &Self::State) -> bool {
        false
    }
}

/// A battery simulation treated as a black box.
///
/// Given a current and a direction the model returns time-series voltage
/// plus internal per-node state; `describe` reports where each physical
/// quantity lives in the internal rows and the geometry needed to build
/// spatial axes. New model variants plug in here without touching the
/// resampling or assembly code.
pub trait BatteryModel: Send + Sync {
    /// Short identifier used in logs and payload summaries.
    fn name(&self) -> &str;

    /// Static layout: channel offsets, node counts and dimensions.
    fn describe(&self) -> ModelDescription;

    /// Run one simulation. Errors are the model's own and are not retried.
    fn run(&self, request: &RunRequest) -> ModelResult<SimulationRun>;
}
