//! Shape-preserving resampling of raw channels onto the display axis.
//!
//! Interpolation is piecewise cubic Hermite with Fritsch–Carlson slopes
//! (PCHIP). It never overshoots the data between knots, so concentrations
//! stay physical. Targets outside the raw range get no value.

use cs_core::numeric::ensure_strictly_increasing;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// One channel sampled on the display axis.
///
/// `None` marks a display timestamp outside the raw range and serializes
/// as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResampledSeries(Vec<Option<f64>>);

impl ResampledSeries {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    /// Series with a value at every timestamp.
    pub fn from_values(values: &[f64]) -> Self {
        Self(values.iter().copied().map(Some).collect())
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn missing(&self) -> usize {
        self.0.iter().filter(|v| v.is_none()).count()
    }
}

/// PCHIP interpolant over one raw channel.
#[derive(Debug, Clone)]
pub struct Pchip {
    x: Vec<f64>,
    y: Vec<f64>,
    d: Vec<f64>,
}

impl Pchip {
    pub fn new(x: &[f64], y: &[f64]) -> PipelineResult<Self> {
        if x.is_empty() {
            return Err(PipelineError::InvalidInput {
                what: "raw axis is empty",
            });
        }
        if x.len() != y.len() {
            return Err(PipelineError::Channel {
                what: format!("channel has {} samples, raw axis has {}", y.len(), x.len()),
            });
        }
        ensure_strictly_increasing(x, "raw time axis")?;
        let d = slopes(x, y);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            d,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn evaluate(&self, t: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !t.is_finite() || t < lo || t > hi {
            return None;
        }
        let n = self.x.len();
        if n == 1 {
            return Some(self.y[0]);
        }
        let k = self.x.partition_point(|&v| v <= t).saturating_sub(1).min(n - 2);
        if self.x[k] == t {
            return Some(self.y[k]);
        }
        if self.x[k + 1] == t {
            return Some(self.y[k + 1]);
        }

        let h = self.x[k + 1] - self.x[k];
        let s = (t - self.x[k]) / h;
        let one_minus = 1.0 - s;
        let h00 = (1.0 + 2.0 * s) * one_minus * one_minus;
        let h10 = s * one_minus * one_minus;
        let h01 = s * s * (3.0 - 2.0 * s);
        let h11 = s * s * (s - 1.0);
        Some(
            h00 * self.y[k]
                + h10 * h * self.d[k]
                + h01 * self.y[k + 1]
                + h11 * h * self.d[k + 1],
        )
    }

    pub fn sample(&self, targets: &[f64]) -> ResampledSeries {
        ResampledSeries(targets.iter().map(|&t| self.evaluate(t)).collect())
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Knot derivatives: weighted harmonic mean inside, three-point rule at the ends.
fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    match n {
        1 => return vec![0.0],
        2 => {
            let delta = (y[1] - y[0]) / (x[1] - x[0]);
            return vec![delta, delta];
        }
        _ => {}
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if sign(delta[k - 1]) * sign(delta[k]) <= 0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
    }
    d[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Resample one channel from the raw axis onto `target`.
pub fn resample_channel(raw_time: &[f64], values: &[f64], target: &[f64]) -> PipelineResult<ResampledSeries> {
    Ok(Pchip::new(raw_time, values)?.sample(target))
}

/// Resample a set of internal-row columns, output in `columns` order.
pub fn resample_columns(
    raw_time: &[f64],
    rows: &[Vec<f64>],
    columns: &[usize],
    target: &[f64],
) -> PipelineResult<Vec<ResampledSeries>> {
    if rows.len() != raw_time.len() {
        return Err(PipelineError::Channel {
            what: format!("{} internal rows for {} raw timestamps", rows.len(), raw_time.len()),
        });
    }
    let width = rows.first().map_or(0, Vec::len);
    let mut out = Vec::with_capacity(columns.len());
    for &col in columns {
        if col >= width {
            return Err(PipelineError::Channel {
                what: format!("column {col} out of range for width {width}"),
            });
        }
        let values: Vec<f64> = rows.iter().map(|row| row[col]).collect();
        out.push(resample_channel(raw_time, &values, target)?);
    }
    if let Some(first) = out.first() {
        let missing = first.missing();
        if missing > 0 {
            tracing::debug!(missing, targets = target.len(), "display targets outside raw range");
        }
    }
    Ok(out)
}
