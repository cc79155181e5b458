//! Named parameter sets for the reference cell.

use serde::{Deserialize, Serialize};

use crate::cell::{CellParams, ElectrodeParams, ParticleCell};
use crate::error::ModelResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPreset {
    /// One particle per electrode.
    SingleParticle,
    /// Single particle with a growing SEI film resistance.
    SingleParticleSei,
    /// A row of particles across each electrode depth.
    PseudoTwoDim,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 3] = [
        ModelPreset::SingleParticle,
        ModelPreset::SingleParticleSei,
        ModelPreset::PseudoTwoDim,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelPreset::SingleParticle => "single_particle",
            ModelPreset::SingleParticleSei => "single_particle_sei",
            ModelPreset::PseudoTwoDim => "pseudo_two_dim",
        }
    }

    pub fn params(self) -> CellParams {
        let positive = ElectrodeParams {
            particles: 1,
            radial_nodes: 10,
            particle_radius_m: 8e-6,
            thickness_m: 80e-6,
            diffusivity_m2_s: 1e-14,
            max_concentration_mol_m3: 51_554.0,
            initial_stoichiometry: 0.4,
            surface_area_m2: 1.3,
            charge_transfer_resistance_ohm: 0.01,
        };
        let negative = ElectrodeParams {
            particles: 1,
            radial_nodes: 10,
            particle_radius_m: 1e-5,
            thickness_m: 88e-6,
            diffusivity_m2_s: 3.9e-14,
            max_concentration_mol_m3: 30_555.0,
            initial_stoichiometry: 0.8,
            surface_area_m2: 1.05,
            charge_transfer_resistance_ohm: 0.01,
        };
        let base = CellParams {
            name: self.as_str().to_string(),
            positive,
            negative,
            ohmic_resistance_ohm: 0.02,
            sei_growth_ohm_per_c: None,
            initial_sei_resistance_ohm: 0.0,
            depth_skew: 0.0,
            v_min: 2.5,
            v_max: 4.2,
            nominal_capacity_ah: 2.0,
            capacity_normalization_ah: 1.0,
            display_points: 300,
            dt_initial_s: 0.1,
            dt_max_s: 5.0,
            dt_growth: 1.2,
            t_max_factor: 2.0,
        };

        match self {
            ModelPreset::SingleParticle => base,
            ModelPreset::SingleParticleSei => CellParams {
                sei_growth_ohm_per_c: Some(2e-6),
                initial_sei_resistance_ohm: 0.005,
                ..base
            },
            ModelPreset::PseudoTwoDim => CellParams {
                positive: ElectrodeParams {
                    particles: 11,
                    radial_nodes: 9,
                    diffusivity_m2_s: 3.5e-13,
                    ..base.positive
                },
                negative: ElectrodeParams {
                    particles: 11,
                    radial_nodes: 9,
                    thickness_m: 40e-6,
                    ..base.negative
                },
                depth_skew: 1.5,
                ..base
            },
        }
    }

    pub fn build(self) -> ModelResult<ParticleCell> {
        ParticleCell::new(self.params())
    }

    pub fn build_with(self, overrides: &PresetOverrides) -> ModelResult<ParticleCell> {
        let mut params = self.params();
        overrides.apply(&mut params);
        ParticleCell::new(params)
    }
}

impl std::str::FromStr for ModelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelPreset::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown model preset '{s}'"))
    }
}

/// Optional adjustments applied on top of a preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetOverrides {
    pub positive_particles: Option<usize>,
    pub negative_particles: Option<usize>,
    pub radial_nodes: Option<usize>,
    pub positive_thickness_m: Option<f64>,
    pub negative_thickness_m: Option<f64>,
    pub positive_diffusivity_m2_s: Option<f64>,
    pub negative_diffusivity_m2_s: Option<f64>,
    pub depth_skew: Option<f64>,
    pub nominal_capacity_ah: Option<f64>,
    pub capacity_normalization_ah: Option<f64>,
    pub display_points: Option<usize>,
}

impl PresetOverrides {
    pub fn is_empty(&self) -> bool {
        *self == PresetOverrides::default()
    }

    pub fn apply(&self, params: &mut CellParams) {
        if let Some(n) = self.positive_particles {
            params.positive.particles = n;
        }
        if let Some(n) = self.negative_particles {
            params.negative.particles = n;
        }
        if let Some(n) = self.radial_nodes {
            params.positive.radial_nodes = n;
            params.negative.radial_nodes = n;
        }
        if let Some(v) = self.positive_thickness_m {
            params.positive.thickness_m = v;
        }
        if let Some(v) = self.negative_thickness_m {
            params.negative.thickness_m = v;
        }
        if let Some(v) = self.positive_diffusivity_m2_s {
            params.positive.diffusivity_m2_s = v;
        }
        if let Some(v) = self.negative_diffusivity_m2_s {
            params.negative.diffusivity_m2_s = v;
        }
        if let Some(v) = self.depth_skew {
            params.depth_skew = v;
        }
        if let Some(v) = self.nominal_capacity_ah {
            params.nominal_capacity_ah = v;
        }
        if let Some(v) = self.capacity_normalization_ah {
            params.capacity_normalization_ah = v;
        }
        if let Some(n) = self.display_points {
            params.display_points = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds() {
        for preset in ModelPreset::ALL {
            assert!(preset.build().is_ok(), "{}", preset.as_str());
        }
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in ModelPreset::ALL {
            assert_eq!(preset.as_str().parse::<ModelPreset>().unwrap(), preset);
        }
        assert!("p3d".parse::<ModelPreset>().is_err());
    }

    #[test]
    fn overrides_replace_node_counts() {
        let overrides = PresetOverrides {
            positive_particles: Some(4),
            radial_nodes: Some(6),
            ..PresetOverrides::default()
        };
        let cell = ModelPreset::PseudoTwoDim.build_with(&overrides).unwrap();
        assert_eq!(cell.params().positive.particles, 4);
        assert_eq!(cell.params().negative.particles, 11);
        assert_eq!(cell.params().negative.radial_nodes, 6);
    }

    #[test]
    fn invalid_override_fails_build() {
        let overrides = PresetOverrides {
            negative_particles: Some(0),
            ..PresetOverrides::default()
        };
        assert!(ModelPreset::SingleParticle.build_with(&overrides).is_err());
    }
}
