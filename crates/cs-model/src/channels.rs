//! Channel layout and geometry reported by a battery model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Electrode region of the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Positive,
    Negative,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Positive, Region::Negative];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Positive => "positive",
            Region::Negative => "negative",
        }
    }
}

/// Which end of the electrode particle index 0 sits at.
///
/// The positive electrode is listed starting at the current collector and
/// the negative electrode starting at the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthOrder {
    FromCurrentCollector,
    FromSeparator,
}

/// Columns holding the radial concentration profile of one depth particle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleChannels {
    pub region: Region,
    /// Position in the region's depth order.
    pub particle: usize,
    /// One column per radial node, centre first, boundary nodes included.
    pub columns: Vec<usize>,
}

/// Map from physical quantity to column offsets in the internal rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelIndex {
    /// Column holding the raw timestamp.
    pub time: usize,
    /// Column holding the signed cell current, if recorded.
    pub current: Option<usize>,
    /// Solid-phase potential per region, one column per depth particle.
    pub solid_phase_potential: BTreeMap<Region, Vec<usize>>,
    /// Solid lithium concentration, region particles in depth order.
    pub solid_lithium_concentration: Vec<ParticleChannels>,
    /// Model-specific scalar channels (e.g. `sei_resistance`).
    #[serde(default)]
    pub extras: BTreeMap<String, usize>,
}

impl ChannelIndex {
    /// Particles of one region in the order reported by the model.
    pub fn particles(&self, region: Region) -> impl Iterator<Item = &ParticleChannels> {
        self.solid_lithium_concentration
            .iter()
            .filter(move |p| p.region == region)
    }

    pub fn potential_columns(&self, region: Region) -> &[usize] {
        self.solid_phase_potential
            .get(&region)
            .map_or(&[], Vec::as_slice)
    }

    /// Largest referenced column plus one.
    pub fn width(&self) -> usize {
        let mut max = self.time;
        if let Some(c) = self.current {
            max = max.max(c);
        }
        for cols in self.solid_phase_potential.values() {
            max = cols.iter().copied().fold(max, usize::max);
        }
        for p in &self.solid_lithium_concentration {
            max = p.columns.iter().copied().fold(max, usize::max);
        }
        max = self.extras.values().copied().fold(max, usize::max);
        max + 1
    }
}

/// Physical layout of one electrode region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionGeometry {
    /// Particles across the electrode depth.
    pub particles: usize,
    /// Interior radial nodes per particle (two boundary nodes are extra).
    pub radial_nodes: usize,
    pub particle_radius_m: f64,
    pub thickness_m: f64,
    pub depth_order: DepthOrder,
}

impl RegionGeometry {
    /// Radial samples per particle including centre and surface.
    pub fn nodes_per_particle(&self) -> usize {
        self.radial_nodes + 2
    }
}

/// Static description of a model: channel layout plus geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    pub channels: ChannelIndex,
    pub positive: RegionGeometry,
    pub negative: RegionGeometry,
    /// Divisor applied to delivered amp-hours in the capacity display metric.
    pub capacity_normalization_ah: f64,
}

impl ModelDescription {
    pub fn geometry(&self, region: Region) -> &RegionGeometry {
        match region {
            Region::Positive => &self.positive,
            Region::Negative => &self.negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ChannelIndex {
        let mut potentials = BTreeMap::new();
        potentials.insert(Region::Positive, vec![7]);
        potentials.insert(Region::Negative, vec![8]);
        ChannelIndex {
            time: 0,
            current: Some(9),
            solid_phase_potential: potentials,
            solid_lithium_concentration: vec![
                ParticleChannels {
                    region: Region::Positive,
                    particle: 0,
                    columns: vec![1, 2, 3],
                },
                ParticleChannels {
                    region: Region::Negative,
                    particle: 0,
                    columns: vec![4, 5, 6],
                },
            ],
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn width_covers_every_column() {
        assert_eq!(index().width(), 10);
    }

    #[test]
    fn particles_filter_by_region() {
        let idx = index();
        let neg: Vec<_> = idx.particles(Region::Negative).collect();
        assert_eq!(neg.len(), 1);
        assert_eq!(neg[0].columns, vec![4, 5, 6]);
        assert_eq!(idx.potential_columns(Region::Positive), &[7]);
    }

    #[test]
    fn missing_region_has_no_potentials() {
        let mut idx = index();
        idx.solid_phase_potential.remove(&Region::Negative);
        assert!(idx.potential_columns(Region::Negative).is_empty());
    }
}
