use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that every sample is finite and each one is larger than the last.
pub fn ensure_strictly_increasing(axis: &[Real], what: &'static str) -> Result<(), CoreError> {
    for (i, &v) in axis.iter().enumerate() {
        ensure_finite(v, what)?;
        if i > 0 && v <= axis[i - 1] {
            return Err(CoreError::NotIncreasing { what, index: i });
        }
    }
    Ok(())
}

/// `n` evenly spaced points from `start` to `end`, both ends included.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as Real })
                .collect()
        }
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_strictly_increasing(
            start in -1e3f64..1e3,
            span in 1e-3f64..1e3,
            n in 2usize..500,
        ) {
            let xs = linspace(start, start + span, n);
            prop_assert_eq!(xs.len(), n);
            prop_assert_eq!(xs[0], start);
            prop_assert_eq!(xs[n - 1], start + span);
            prop_assert!(ensure_strictly_increasing(&xs, "xs").is_ok());
        }
    }
}
