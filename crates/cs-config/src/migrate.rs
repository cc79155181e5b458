//! Schema migration framework.

use crate::ConfigError;
use crate::schema::{Config, ModelDef};
use cs_model::ModelPreset;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut config: Config) -> Result<Config, ConfigError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: Config) -> Result<Config, ConfigError> {
    match config.version {
        0 => migrate_v0_to_v1(config),
        v => Err(ConfigError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 had no `display_stride`; single-particle models were always
/// thinned by three.
fn migrate_v0_to_v1(mut config: Config) -> Result<Config, ConfigError> {
    for model in &mut config.models {
        if is_single_particle(model) && model.display_stride == 1 {
            model.display_stride = 3;
        }
    }
    config.version = 1;
    Ok(config)
}

fn is_single_particle(model: &ModelDef) -> bool {
    matches!(
        model.preset,
        ModelPreset::SingleParticle | ModelPreset::SingleParticleSei
    )
}
