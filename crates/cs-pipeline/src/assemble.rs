//! Building the dashboard payload from a completed run.

use cs_core::numeric::round_to;
use cs_core::timing::{StageTimings, Timer};
use cs_model::BatteryModel;

use crate::capacity::derived_capacity;
use crate::error::{PipelineError, PipelineResult};
use crate::invoke::{Invocation, InvocationSettings, invoke};
use crate::partition::{Partitioned, partition};
use crate::payload::{
    DashboardPayload, InternalData, MainPayload, PipelineOutput, RegionPayload, RunSummary,
    VoltageData,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblySettings {
    /// Keep every `display_stride`-th display sample.
    pub display_stride: usize,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self { display_stride: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineSettings {
    pub invocation: InvocationSettings,
    pub assembly: AssemblySettings,
}

/// Display time and voltage after down-sampling by `stride`.
pub fn display_axis(time: &[f64], voltage: &[f64], stride: usize) -> PipelineResult<(Vec<f64>, Vec<f64>)> {
    if stride == 0 {
        return Err(PipelineError::InvalidInput {
            what: "display stride must be at least 1",
        });
    }
    if time.len() != voltage.len() {
        return Err(PipelineError::Channel {
            what: format!("{} display timestamps but {} voltages", time.len(), voltage.len()),
        });
    }
    Ok((
        time.iter().copied().step_by(stride).collect(),
        voltage.iter().copied().step_by(stride).collect(),
    ))
}

/// Capacity metric for a run, `None` when the model records no current.
pub fn run_capacity(invocation: &Invocation) -> PipelineResult<Option<f64>> {
    let Some(column) = invocation.description.channels.current else {
        return Ok(None);
    };
    let current = invocation.run.column(column)?;
    let value = derived_capacity(
        invocation.run.raw_time(),
        &current,
        invocation.description.capacity_normalization_ah,
    )?;
    Ok(Some(round_to(value.abs(), 2)))
}

/// Combine the display axis and partitioned regions into the payload.
pub fn assemble(
    invocation: &Invocation,
    time: Vec<f64>,
    voltage: Vec<f64>,
    partitioned: &Partitioned,
) -> PipelineResult<DashboardPayload> {
    let summary = RunSummary {
        model: invocation.description.name.clone(),
        direction: invocation.run.direction(),
        current_a: invocation.run.current_a(),
        display_points: time.len(),
        raw_points: invocation.run.raw_time().len(),
        capacity_ah: run_capacity(invocation)?,
    };
    tracing::info!(
        model = %summary.model,
        display_points = summary.display_points,
        raw_points = summary.raw_points,
        capacity_ah = ?summary.capacity_ah,
        "assembled dashboard payload"
    );

    Ok(DashboardPayload {
        main: MainPayload {
            voltage_data: VoltageData { time, voltage },
            internal_data: InternalData {
                p_pot: partitioned.positive.potential.clone(),
                n_pot: partitioned.negative.potential.clone(),
            },
        },
        positive: RegionPayload::from_bundle(&partitioned.positive),
        negative: RegionPayload::from_bundle(&partitioned.negative),
        summary,
    })
}

/// Invoke, resample, and assemble, recording stage durations.
pub fn run_pipeline_timed(
    model: &dyn BatteryModel,
    amps: f64,
    settings: &PipelineSettings,
    timings: &mut StageTimings,
) -> PipelineResult<PipelineOutput> {
    let timer = Timer::start("simulate");
    let invocation = invoke(model, amps, &settings.invocation)?;
    timings.simulate_s = timer.stop_and_log().unwrap_or(0.0);
    let Some(invocation) = invocation else {
        return Ok(PipelineOutput::Idle);
    };

    let timer = Timer::start("resample");
    let (time, voltage) = display_axis(
        invocation.run.time(),
        invocation.run.voltage(),
        settings.assembly.display_stride,
    )?;
    let partitioned = partition(&invocation.run, &invocation.description, &time)?;
    timings.resample_s = timer.stop_and_log().unwrap_or(0.0);

    let timer = Timer::start("assemble");
    let payload = assemble(&invocation, time, voltage, &partitioned)?;
    timings.assemble_s = timer.stop_and_log().unwrap_or(0.0);

    Ok(PipelineOutput::Ready(Box::new(payload)))
}

pub fn run_pipeline(
    model: &dyn BatteryModel,
    amps: f64,
    settings: &PipelineSettings,
) -> PipelineResult<PipelineOutput> {
    run_pipeline_timed(model, amps, settings, &mut StageTimings::default())
}
