//! Delivered-capacity display metric.
//!
//! Left-step integral of the current channel over its own time axis,
//! divided by a per-model normalization. The result is signed; callers
//! display its magnitude.

use cs_core::units::{Charge, amps, s, to_amp_hours};
use uom::si::electric_charge::coulomb;

use crate::error::{PipelineError, PipelineResult};

/// `sum_{i>=1} (t_i - t_{i-1}) * I_i / 3600 / normalization_ah`
pub fn derived_capacity(time: &[f64], current: &[f64], normalization_ah: f64) -> PipelineResult<f64> {
    if time.len() != current.len() {
        return Err(PipelineError::Channel {
            what: format!(
                "current has {} samples, time axis has {}",
                current.len(),
                time.len()
            ),
        });
    }
    if !(normalization_ah.is_finite() && normalization_ah > 0.0) {
        return Err(PipelineError::InvalidInput {
            what: "capacity normalization must be positive",
        });
    }

    let mut charge = Charge::new::<coulomb>(0.0);
    for (w, &i) in time.windows(2).zip(current.iter().skip(1)) {
        charge += amps(i) * s(w[1] - w[0]);
    }
    Ok(to_amp_hours(charge) / normalization_ah)
}
