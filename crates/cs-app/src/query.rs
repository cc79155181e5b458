//! Time-slice queries over an assembled payload.
//!
//! Mirrors what the dashboard client does when the time slider moves: pick
//! one display index and read every chart's value there.

use cs_model::Region;
use cs_pipeline::{DashboardPayload, RegionPayload};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Vertical line marking the selected time on the voltage chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Radial profile of one particle at the selected time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSlice {
    pub label: String,
    pub axis: Vec<f64>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlice {
    pub index: usize,
    pub time: f64,
    pub voltage: f64,
    pub voltage_marker: Marker,
    pub positive_potential: Option<f64>,
    pub negative_potential: Option<f64>,
    pub positive_profiles: Vec<ProfileSlice>,
    pub negative_profiles: Vec<ProfileSlice>,
}

/// Read every chart at display index `index`.
pub fn time_slice(
    payload: &DashboardPayload,
    index: usize,
    marker_span_v: [f64; 2],
) -> AppResult<TimeSlice> {
    let len = payload.display_len();
    if index >= len {
        return Err(AppError::IndexOutOfRange { index, len });
    }
    let time = payload.main.voltage_data.time[index];
    let voltage = payload.main.voltage_data.voltage[index];
    let internal = &payload.main.internal_data;

    Ok(TimeSlice {
        index,
        time,
        voltage,
        voltage_marker: Marker {
            x: [time, time],
            y: marker_span_v,
        },
        positive_potential: internal.p_pot.get(index),
        negative_potential: internal.n_pot.get(index),
        positive_profiles: profiles(payload.region(Region::Positive), index),
        negative_profiles: profiles(payload.region(Region::Negative), index),
    })
}

fn profiles(region: &RegionPayload, index: usize) -> Vec<ProfileSlice> {
    region
        .particles
        .keys()
        .map(|&particle| ProfileSlice {
            label: region.labels.get(particle).cloned().unwrap_or_default(),
            axis: region.axis.clone(),
            values: region
                .profile(particle, index)
                .map(<[Option<f64>]>::to_vec)
                .unwrap_or_default(),
        })
        .collect()
}
