//! Open-circuit potential curves for the reference electrodes.
//!
//! Smooth, monotone stand-ins: a linear slope plus a Nernst-like log term
//! that diverges toward empty and full stoichiometry so voltage cutoffs are
//! always reached. Inputs are clamped away from 0 and 1.

use cs_core::units::constants::THERMAL_VOLTAGE_298K;

const X_EPS: f64 = 1e-6;

fn clamp_stoichiometry(x: f64) -> f64 {
    x.clamp(X_EPS, 1.0 - X_EPS)
}

/// Positive electrode potential vs Li/Li+ (V) at stoichiometry `x`.
pub fn positive_ocp(x: f64) -> f64 {
    let x = clamp_stoichiometry(x);
    3.9 - 0.6 * (x - 0.5) - THERMAL_VOLTAGE_298K * (x / (1.0 - x)).ln()
}

/// Negative electrode potential vs Li/Li+ (V) at stoichiometry `x`.
pub fn negative_ocp(x: f64) -> f64 {
    let x = clamp_stoichiometry(x);
    0.1 + 0.5 * (-30.0 * x).exp() + THERMAL_VOLTAGE_298K * ((1.0 - x) / x).ln()
}
