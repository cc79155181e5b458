//! JSON payload handed to the dashboard client.

use std::collections::BTreeMap;

use cs_model::{ChargeDirection, Region};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::PipelineResult;
use crate::partition::RegionBundle;
use crate::resample::ResampledSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageData {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
}

/// Collector-side electrode potentials on the display axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalData {
    pub p_pot: ResampledSeries,
    pub n_pot: ResampledSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainPayload {
    pub voltage_data: VoltageData,
    pub internal_data: InternalData,
}

/// Concentration profiles of one region.
///
/// Serializes as `{"p_x": axis, "positive": {"0": [[..], ..], ..}}` (or the
/// `n_x`/`negative` pair), rows time-major and one value per radial node.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPayload {
    pub region: Region,
    pub axis: Vec<f64>,
    /// Depth labels, indexed like `particles`.
    pub labels: Vec<String>,
    pub particles: BTreeMap<usize, Vec<Vec<Option<f64>>>>,
}

impl RegionPayload {
    pub fn from_bundle(bundle: &RegionBundle) -> Self {
        Self {
            region: bundle.region,
            axis: bundle.radius_axis.clone(),
            labels: bundle.particles.iter().map(|p| p.label.clone()).collect(),
            particles: bundle
                .particles
                .iter()
                .map(|p| (p.index, p.time_major()))
                .collect(),
        }
    }

    pub fn axis_key(&self) -> &'static str {
        match self.region {
            Region::Positive => "p_x",
            Region::Negative => "n_x",
        }
    }

    /// Radial profile of one particle at one display index.
    pub fn profile(&self, particle: usize, time_index: usize) -> Option<&[Option<f64>]> {
        self.particles
            .get(&particle)
            .and_then(|rows| rows.get(time_index))
            .map(Vec::as_slice)
    }
}

impl Serialize for RegionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.axis_key(), &self.axis)?;
        map.serialize_entry(self.region.as_str(), &self.particles)?;
        map.end()
    }
}

/// Run metadata shown next to the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub model: String,
    pub direction: ChargeDirection,
    pub current_a: f64,
    pub display_points: usize,
    pub raw_points: usize,
    /// Delivered capacity magnitude, rounded to 0.01.
    pub capacity_ah: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub main: MainPayload,
    pub positive: RegionPayload,
    pub negative: RegionPayload,
    pub summary: RunSummary,
}

/// The three client objects as separate JSON documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadJson {
    pub main: String,
    pub positive: String,
    pub negative: String,
}

impl DashboardPayload {
    pub fn display_len(&self) -> usize {
        self.main.voltage_data.time.len()
    }

    pub fn region(&self, region: Region) -> &RegionPayload {
        match region {
            Region::Positive => &self.positive,
            Region::Negative => &self.negative,
        }
    }

    pub fn to_json_parts(&self) -> PipelineResult<PayloadJson> {
        Ok(PayloadJson {
            main: serde_json::to_string(&self.main)?,
            positive: serde_json::to_string(&self.positive)?,
            negative: serde_json::to_string(&self.negative)?,
        })
    }
}

/// Result of one dashboard request.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// Zero current: nothing was simulated.
    Idle,
    Ready(Box<DashboardPayload>),
}

impl PipelineOutput {
    pub fn payload(&self) -> Option<&DashboardPayload> {
        match self {
            PipelineOutput::Idle => None,
            PipelineOutput::Ready(p) => Some(p.as_ref()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PipelineOutput::Idle)
    }
}
