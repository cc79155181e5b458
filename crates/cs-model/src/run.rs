//! Run requests and the raw output of one simulation.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Direction of the applied current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeDirection {
    Discharge,
    Charge,
}

impl ChargeDirection {
    /// Sign of the cell current: positive while discharging.
    pub fn sign(self) -> f64 {
        match self {
            ChargeDirection::Discharge => 1.0,
            ChargeDirection::Charge => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChargeDirection::Discharge => "discharge",
            ChargeDirection::Charge => "charge",
        }
    }
}

/// Request for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRequest {
    pub direction: ChargeDirection,
    /// Current magnitude in amperes (always positive).
    pub current_a: f64,
    /// Record per-node internal state alongside voltage.
    pub internal: bool,
    /// End the run at the voltage cutoff instead of the time limit.
    pub trim: bool,
}

impl RunRequest {
    pub fn discharge(current_a: f64) -> Self {
        Self {
            direction: ChargeDirection::Discharge,
            current_a,
            internal: true,
            trim: true,
        }
    }

    pub fn charge(current_a: f64) -> Self {
        Self {
            direction: ChargeDirection::Charge,
            current_a,
            internal: true,
            trim: true,
        }
    }

    /// Signed cell current, positive on discharge.
    pub fn signed_current_a(&self) -> f64 {
        self.direction.sign() * self.current_a
    }
}

/// Result of one simulation.
///
/// `raw_time` and `internal` share the simulation's own irregular axis;
/// `time` and `voltage` share the coarser display axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    direction: ChargeDirection,
    current_a: f64,
    raw_time: Vec<f64>,
    internal: Vec<Vec<f64>>,
    time: Vec<f64>,
    voltage: Vec<f64>,
}

impl SimulationRun {
    pub fn new(
        direction: ChargeDirection,
        current_a: f64,
        raw_time: Vec<f64>,
        internal: Vec<Vec<f64>>,
        time: Vec<f64>,
        voltage: Vec<f64>,
    ) -> ModelResult<Self> {
        if raw_time.len() != internal.len() {
            return Err(ModelError::MalformedRun {
                what: format!(
                    "{} raw timestamps but {} internal rows",
                    raw_time.len(),
                    internal.len()
                ),
            });
        }
        if let Some(first) = internal.first() {
            let width = first.len();
            if let Some(pos) = internal.iter().position(|row| row.len() != width) {
                return Err(ModelError::MalformedRun {
                    what: format!("internal row {pos} has width {}, expected {width}", internal[pos].len()),
                });
            }
        }
        if time.len() != voltage.len() {
            return Err(ModelError::MalformedRun {
                what: format!(
                    "{} display timestamps but {} voltage samples",
                    time.len(),
                    voltage.len()
                ),
            });
        }
        Ok(Self {
            direction,
            current_a,
            raw_time,
            internal,
            time,
            voltage,
        })
    }

    pub fn direction(&self) -> ChargeDirection {
        self.direction
    }

    pub fn current_a(&self) -> f64 {
        self.current_a
    }

    pub fn raw_time(&self) -> &[f64] {
        &self.raw_time
    }

    pub fn internal(&self) -> &[Vec<f64>] {
        &self.internal
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub fn has_internal(&self) -> bool {
        !self.internal.is_empty()
    }

    /// Number of columns in each internal row.
    pub fn width(&self) -> usize {
        self.internal.first().map_or(0, Vec::len)
    }

    /// Copy one internal column out as a series on the raw axis.
    pub fn column(&self, index: usize) -> ModelResult<Vec<f64>> {
        let width = self.width();
        if index >= width {
            return Err(ModelError::MalformedRun {
                what: format!("column {index} out of range for width {width}"),
            });
        }
        Ok(self.internal.iter().map(|row| row[index]).collect())
    }
}
