//! Minimal event handling for transient cell simulation.

use crate::error::{ModelError, ModelResult};
use crate::run::ChargeDirection;

/// Voltage window that ends a run once crossed in the direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VoltageCutoff {
    pub v_min: f64,
    pub v_max: f64,
}

impl VoltageCutoff {
    /// Discharge ends at the lower limit, charge at the upper.
    pub(crate) fn crossed(&self, direction: ChargeDirection, voltage: f64) -> bool {
        if !voltage.is_finite() {
            return true;
        }
        match direction {
            ChargeDirection::Discharge => voltage <= self.v_min,
            ChargeDirection::Charge => voltage >= self.v_max,
        }
    }
}

/// Check a quantity is finite and strictly positive.
pub(crate) fn validate_positive(val: f64, name: &'static str) -> ModelResult<f64> {
    if !val.is_finite() || val <= 0.0 {
        return Err(ModelError::InvalidArg { what: name });
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_follows_direction() {
        let cut = VoltageCutoff {
            v_min: 2.5,
            v_max: 4.2,
        };
        assert!(cut.crossed(ChargeDirection::Discharge, 2.49));
        assert!(!cut.crossed(ChargeDirection::Discharge, 4.3));
        assert!(cut.crossed(ChargeDirection::Charge, 4.2));
        assert!(!cut.crossed(ChargeDirection::Charge, 2.0));
        assert!(cut.crossed(ChargeDirection::Charge, f64::NAN));
    }

    #[test]
    fn validate_positive_ok() {
        assert!(validate_positive(1.0, "test").is_ok());
    }

    #[test]
    fn validate_positive_fails_on_zero_and_nan() {
        assert!(validate_positive(0.0, "test").is_err());
        assert!(validate_positive(-0.1, "test").is_err());
        assert!(validate_positive(f64::NAN, "test").is_err());
    }
}
