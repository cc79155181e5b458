//! Simulation runner and result recording.

use crate::error::{ModelError, ModelResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
///
/// The step starts at `dt_initial` and grows by `dt_growth` each step until
/// it reaches `dt_max`, so the recorded time axis is irregular near t=0.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// First time step (seconds)
    pub dt_initial: f64,
    /// Largest time step (seconds)
    pub dt_max: f64,
    /// Step growth factor per step (>= 1)
    pub dt_growth: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_initial: 0.1,
            dt_max: 5.0,
            dt_growth: 1.2,
            t_end: 3600.0,
            max_steps: 200_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    fn validate(&self) -> ModelResult<()> {
        if !(self.dt_initial > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "dt_initial must be positive",
            });
        }
        if self.dt_max < self.dt_initial {
            return Err(ModelError::InvalidArg {
                what: "dt_max must be at least dt_initial",
            });
        }
        if !(self.dt_growth >= 1.0) {
            return Err(ModelError::InvalidArg {
                what: "dt_growth must be >= 1",
            });
        }
        if !(self.t_end >= 0.0) {
            return Err(ModelError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(ModelError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
    /// True when the model's terminal event ended the run.
    pub stopped_by_event: bool,
}

/// Run a transient simulation, recording every step.
///
/// Integration ends at `t_end`, after `max_steps`, or at the first state for
/// which [`TransientModel::should_stop`] returns true (that state is kept).
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> ModelResult<SimRecord<M::State>> {
    opts.validate()?;

    let mut t = 0.0;
    let mut x = model.initial_state();

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];

    let mut dt = opts.dt_initial;
    let mut step = 0;
    let mut stopped_by_event = false;
    while t < opts.t_end && step < opts.max_steps {
        let remaining = opts.t_end - t;
        let h = dt.min(remaining);
        x = match opts.integrator {
            IntegratorType::RK4 => RK4.step(model, t, &x, h)?,
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, &x, h)?,
        };
        t = if h >= remaining { opts.t_end } else { t + h };
        step += 1;
        dt = (dt * opts.dt_growth).min(opts.dt_max);

        t_record.push(t);
        x_record.push(x.clone());

        if model.should_stop(t, &x) {
            stopped_by_event = true;
            break;
        }
    }

    tracing::debug!(steps = step, t_final = t, stopped_by_event, "transient run finished");

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        stopped_by_event,
    })
}
