//! Configuration loading and model introspection.

use std::path::Path;

use cs_config::{Config, ModelDef};
use cs_model::BatteryModel;

use crate::error::{AppError, AppResult};

/// Summary of a configured model for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub preset: String,
    pub display_stride: usize,
    pub positive_particles: usize,
    pub negative_particles: usize,
    pub radial_nodes: usize,
}

/// Load a configuration file (YAML or JSON by extension).
pub fn load_config(path: &Path) -> AppResult<Config> {
    if !path.exists() {
        return Err(AppError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let config = cs_config::load(path)?;
    tracing::debug!(path = %path.display(), models = config.models.len(), "loaded configuration");
    Ok(config)
}

/// List every configured model with its layout.
pub fn list_models(config: &Config) -> AppResult<Vec<ModelSummary>> {
    config
        .models
        .iter()
        .map(|def| {
            let description = def.build()?.describe();
            Ok(ModelSummary {
                id: def.id.clone(),
                name: def.display_name().to_string(),
                preset: def.preset.as_str().to_string(),
                display_stride: def.display_stride,
                positive_particles: description.positive.particles,
                negative_particles: description.negative.particles,
                radial_nodes: description.positive.radial_nodes,
            })
        })
        .collect()
}

/// Get a configured model by ID.
pub fn get_model<'a>(config: &'a Config, model_id: &str) -> AppResult<&'a ModelDef> {
    config
        .model(model_id)
        .ok_or_else(|| AppError::ModelNotFound(model_id.to_string()))
}
