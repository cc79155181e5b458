//! Configuration schema definitions.

use cs_model::{ModelPreset, ModelResult, ParticleCell, PresetOverrides};
use cs_pipeline::{AssemblySettings, DEFAULT_CURRENT_FLOOR_A, InvocationSettings, PipelineSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub pipeline: PipelineDef,
    #[serde(default)]
    pub models: Vec<ModelDef>,
}

impl Config {
    pub fn model(&self, id: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Pipeline settings for one configured model.
    pub fn settings_for(&self, model: &ModelDef) -> PipelineSettings {
        PipelineSettings {
            invocation: InvocationSettings {
                current_floor_a: self.pipeline.current_floor_a,
                trim: self.pipeline.trim,
            },
            assembly: AssemblySettings {
                display_stride: model.display_stride,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineDef {
    #[serde(default = "default_current_floor")]
    pub current_floor_a: f64,
    /// Vertical extent of the voltage time marker, `[low, high]` volts.
    #[serde(default = "default_marker_span")]
    pub marker_span_v: [f64; 2],
    #[serde(default = "default_trim")]
    pub trim: bool,
}

impl Default for PipelineDef {
    fn default() -> Self {
        Self {
            current_floor_a: default_current_floor(),
            marker_span_v: default_marker_span(),
            trim: default_trim(),
        }
    }
}

fn default_current_floor() -> f64 {
    DEFAULT_CURRENT_FLOOR_A
}

fn default_marker_span() -> [f64; 2] {
    [2.0, 4.2]
}

fn default_trim() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub preset: ModelPreset,
    #[serde(default = "default_display_stride")]
    pub display_stride: usize,
    #[serde(default, skip_serializing_if = "PresetOverrides::is_empty")]
    pub overrides: PresetOverrides,
}

fn default_display_stride() -> usize {
    1
}

impl ModelDef {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Build the reference cell this entry describes.
    pub fn build(&self) -> ModelResult<ParticleCell> {
        self.preset.build_with(&self.overrides)
    }
}
