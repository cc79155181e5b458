//! Turning a requested current into a model run.

use cs_core::numeric::ensure_finite;
use cs_model::{BatteryModel, ChargeDirection, ModelDescription, RunRequest, SimulationRun};

use crate::error::PipelineResult;

/// Smallest current magnitude a model is ever driven at, in amperes.
pub const DEFAULT_CURRENT_FLOOR_A: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvocationSettings {
    pub current_floor_a: f64,
    /// End runs at the voltage cutoff.
    pub trim: bool,
}

impl Default for InvocationSettings {
    fn default() -> Self {
        Self {
            current_floor_a: DEFAULT_CURRENT_FLOOR_A,
            trim: true,
        }
    }
}

/// A completed run together with the layout needed to read it.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub run: SimulationRun,
    pub description: ModelDescription,
}

/// Map a signed request to a direction and magnitude.
///
/// Zero means idle. Positive discharges, negative charges, and any
/// magnitude below `floor` is raised to it.
pub fn resolve_current(amps: f64, floor: f64) -> PipelineResult<Option<(ChargeDirection, f64)>> {
    let amps = ensure_finite(amps, "requested current")?;
    let floor = ensure_finite(floor, "current floor")?;
    if amps == 0.0 {
        return Ok(None);
    }
    let direction = if amps > 0.0 {
        ChargeDirection::Discharge
    } else {
        ChargeDirection::Charge
    };
    Ok(Some((direction, amps.abs().max(floor))))
}

/// Run `model` for the requested current, or return `None` when idle.
pub fn invoke(
    model: &dyn BatteryModel,
    amps: f64,
    settings: &InvocationSettings,
) -> PipelineResult<Option<Invocation>> {
    let Some((direction, current_a)) = resolve_current(amps, settings.current_floor_a)? else {
        tracing::debug!(model = model.name(), "zero current, skipping simulation");
        return Ok(None);
    };

    let request = RunRequest {
        direction,
        current_a,
        internal: true,
        trim: settings.trim,
    };
    tracing::debug!(
        model = model.name(),
        direction = direction.as_str(),
        current_a,
        "invoking model"
    );

    let run = model
        .run(&request)
        .inspect_err(|e| tracing::warn!(model = model.name(), error = %e, "model run failed"))?;
    Ok(Some(Invocation {
        run,
        description: model.describe(),
    }))
}
