//! Dashboard run execution.

use cs_config::Config;
use cs_core::timing::StageTimings;
use cs_model::BatteryModel;
use cs_pipeline::{PipelineOutput, PipelineSettings, run_pipeline_timed};

use crate::config_service;
use crate::error::AppResult;

/// Request for one dashboard payload.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub config: &'a Config,
    pub model_id: &'a str,
    /// Signed current in amperes: positive discharges, negative charges.
    pub current_a: f64,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub model_id: String,
    pub output: PipelineOutput,
    pub timing: StageTimings,
}

/// Build the configured model and run the pipeline at the requested current.
#[tracing::instrument(skip(request), fields(model = request.model_id, current_a = request.current_a))]
pub fn simulate(request: &RunRequest<'_>) -> AppResult<RunResponse> {
    let def = config_service::get_model(request.config, request.model_id)?;
    let model = def.build()?;
    let settings = request.config.settings_for(def);

    let (output, timing) = simulate_model(&model, request.current_a, &settings)?;
    Ok(RunResponse {
        model_id: def.id.clone(),
        output,
        timing,
    })
}

/// Run the pipeline for an already built model.
pub fn simulate_model(
    model: &dyn BatteryModel,
    current_a: f64,
    settings: &PipelineSettings,
) -> AppResult<(PipelineOutput, StageTimings)> {
    let mut timing = StageTimings::default();
    let output = run_pipeline_timed(model, current_a, settings, &mut timing)?;
    match &output {
        PipelineOutput::Idle => tracing::info!(model = model.name(), "idle request, nothing simulated"),
        PipelineOutput::Ready(payload) => {
            tracing::info!(
                model = model.name(),
                display_points = payload.summary.display_points,
                "dashboard payload ready"
            );
            timing.log_summary();
        }
    }
    Ok((output, timing))
}
