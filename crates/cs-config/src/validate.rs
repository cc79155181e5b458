//! Configuration validation logic.

use std::collections::HashSet;

use crate::schema::{Config, ModelDef, PipelineDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    validate_pipeline(&config.pipeline)?;

    let mut model_ids = HashSet::new();
    for model in &config.models {
        if !model_ids.insert(&model.id) {
            return Err(ValidationError::DuplicateId {
                id: model.id.clone(),
                context: "models".to_string(),
            });
        }
        validate_model(model)?;
    }

    Ok(())
}

fn validate_pipeline(pipeline: &PipelineDef) -> Result<(), ValidationError> {
    let floor = pipeline.current_floor_a;
    if !floor.is_finite() || floor <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "pipeline.current_floor_a".to_string(),
            value: floor.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }

    let [lo, hi] = pipeline.marker_span_v;
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(ValidationError::InvalidValue {
            field: "pipeline.marker_span_v".to_string(),
            value: format!("[{lo}, {hi}]"),
            reason: "low must be below high".to_string(),
        });
    }
    Ok(())
}

fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    if model.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "models.id".to_string(),
            value: format!("{:?}", model.id),
            reason: "must not be empty".to_string(),
        });
    }

    if model.display_stride == 0 {
        return Err(ValidationError::InvalidValue {
            field: format!("models.{}.display_stride", model.id),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    // Overrides are checked by building the cell they describe.
    if let Err(e) = model.build() {
        return Err(ValidationError::InvalidValue {
            field: format!("models.{}.overrides", model.id),
            value: format!("{:?}", model.overrides),
            reason: e.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::{ModelPreset, PresetOverrides};

    fn config() -> Config {
        Config {
            version: 1,
            pipeline: PipelineDef::default(),
            models: vec![ModelDef {
                id: "spm".to_string(),
                name: None,
                preset: ModelPreset::SingleParticle,
                display_stride: 3,
                overrides: PresetOverrides::default(),
            }],
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut c = config();
        c.version = 7;
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::UnsupportedVersion { version: 7 })
        );
    }

    #[test]
    fn rejects_non_positive_floor() {
        let mut c = config();
        c.pipeline.current_floor_a = 0.0;
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::InvalidValue { .. })
        ));
        c.pipeline.current_floor_a = f64::NAN;
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn rejects_inverted_marker_span() {
        let mut c = config();
        c.pipeline.marker_span_v = [4.2, 2.0];
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn rejects_duplicate_model_ids() {
        let mut c = config();
        let copy = c.models[0].clone();
        c.models.push(copy);
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_zero_stride_and_bad_overrides() {
        let mut c = config();
        c.models[0].display_stride = 0;
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.models[0].overrides.radial_nodes = Some(0);
        let err = validate_config(&c).unwrap_err();
        assert!(err.to_string().contains("overrides"), "{err}");
    }
}
