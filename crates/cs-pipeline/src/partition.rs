//! Splitting internal state into per-region, per-particle bundles.

use cs_core::numeric::{linspace, round_to};
use cs_core::units::{m, to_micrometers};
use cs_model::{DepthOrder, ModelDescription, Region, RegionGeometry, SimulationRun};

use crate::error::{PipelineError, PipelineResult};
use crate::resample::{ResampledSeries, resample_columns};

/// Radial concentration history of one depth particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleProfile {
    /// Position in the region's depth order.
    pub index: usize,
    pub depth_m: f64,
    /// Depth in micrometres, rounded to 0.1.
    pub depth_um: f64,
    pub label: String,
    /// One series per radial node, centre first.
    pub nodes: Vec<ResampledSeries>,
}

impl ParticleProfile {
    /// Radial profile at one display index.
    pub fn at(&self, time_index: usize) -> Vec<Option<f64>> {
        self.nodes.iter().map(|n| n.get(time_index)).collect()
    }

    /// Rows of radial profiles, one per display timestamp.
    pub fn time_major(&self) -> Vec<Vec<Option<f64>>> {
        let len = self.nodes.first().map_or(0, ResampledSeries::len);
        (0..len).map(|i| self.at(i)).collect()
    }
}

/// Everything the client needs to draw one electrode region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBundle {
    pub region: Region,
    pub depth_order: DepthOrder,
    /// Radial positions from centre to surface, in metres.
    pub radius_axis: Vec<f64>,
    pub particles: Vec<ParticleProfile>,
    /// Electrode potential of the particle at the current collector.
    pub potential: ResampledSeries,
}

/// Both regions of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Partitioned {
    pub positive: RegionBundle,
    pub negative: RegionBundle,
}

impl Partitioned {
    pub fn region(&self, region: Region) -> &RegionBundle {
        match region {
            Region::Positive => &self.positive,
            Region::Negative => &self.negative,
        }
    }
}

/// Depth of particle `index` measured from the current collector.
pub fn particle_depth_m(geometry: &RegionGeometry, index: usize) -> f64 {
    let fraction = if geometry.particles > 1 {
        index as f64 / (geometry.particles - 1) as f64
    } else {
        0.5
    };
    match geometry.depth_order {
        DepthOrder::FromCurrentCollector => geometry.thickness_m * fraction,
        DepthOrder::FromSeparator => geometry.thickness_m - geometry.thickness_m * fraction,
    }
}

pub fn depth_label(depth_um: f64) -> String {
    format!("Li at {depth_um}um")
}

fn collector_side_column(columns: &[usize], order: DepthOrder) -> Option<usize> {
    match order {
        DepthOrder::FromCurrentCollector => columns.first().copied(),
        DepthOrder::FromSeparator => columns.last().copied(),
    }
}

pub fn partition_region(
    run: &SimulationRun,
    description: &ModelDescription,
    region: Region,
    target: &[f64],
) -> PipelineResult<RegionBundle> {
    let geometry = description.geometry(region);
    let nodes = geometry.nodes_per_particle();
    let channels = &description.channels;

    let radius_axis: Vec<f64> = linspace(0.0, 1.0, nodes)
        .into_iter()
        .map(|f| f * geometry.particle_radius_m)
        .collect();

    let mut particles = Vec::with_capacity(geometry.particles);
    for (index, channel) in channels.particles(region).enumerate() {
        if channel.columns.len() != nodes {
            return Err(PipelineError::Channel {
                what: format!(
                    "{} particle {} has {} columns, expected {nodes}",
                    region.as_str(),
                    channel.particle,
                    channel.columns.len()
                ),
            });
        }
        let depth_m = particle_depth_m(geometry, index);
        let depth_um = round_to(to_micrometers(m(depth_m)), 1);
        particles.push(ParticleProfile {
            index,
            depth_m,
            depth_um,
            label: depth_label(depth_um),
            nodes: resample_columns(run.raw_time(), run.internal(), &channel.columns, target)?,
        });
    }
    if particles.len() != geometry.particles {
        return Err(PipelineError::Channel {
            what: format!(
                "{} region reports {} particles, geometry has {}",
                region.as_str(),
                particles.len(),
                geometry.particles
            ),
        });
    }

    let column = collector_side_column(channels.potential_columns(region), geometry.depth_order)
        .ok_or_else(|| PipelineError::Channel {
            what: format!("{} region has no potential channel", region.as_str()),
        })?;
    let potential = resample_columns(run.raw_time(), run.internal(), &[column], target)?
        .pop()
        .unwrap_or_default();

    tracing::debug!(
        region = region.as_str(),
        particles = particles.len(),
        nodes,
        "partitioned region"
    );
    Ok(RegionBundle {
        region,
        depth_order: geometry.depth_order,
        radius_axis,
        particles,
        potential,
    })
}

/// Partition both regions onto `target`, the display time axis.
pub fn partition(
    run: &SimulationRun,
    description: &ModelDescription,
    target: &[f64],
) -> PipelineResult<Partitioned> {
    if !run.has_internal() {
        return Err(PipelineError::MissingInternalState);
    }
    Ok(Partitioned {
        positive: partition_region(run, description, Region::Positive, target)?,
        negative: partition_region(run, description, Region::Negative, target)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(particles: usize, order: DepthOrder) -> RegionGeometry {
        RegionGeometry {
            particles,
            radial_nodes: 3,
            particle_radius_m: 5e-6,
            thickness_m: 80e-6,
            depth_order: order,
        }
    }

    #[test]
    fn collector_first_depths_grow() {
        let g = geometry(5, DepthOrder::FromCurrentCollector);
        assert_eq!(particle_depth_m(&g, 0), 0.0);
        assert!((particle_depth_m(&g, 4) - 80e-6).abs() < 1e-18);
        assert!((particle_depth_m(&g, 2) - 40e-6).abs() < 1e-18);
    }

    #[test]
    fn separator_first_depths_shrink() {
        let g = geometry(5, DepthOrder::FromSeparator);
        assert!((particle_depth_m(&g, 0) - 80e-6).abs() < 1e-18);
        assert!(particle_depth_m(&g, 4).abs() < 1e-18);
    }

    #[test]
    fn single_particle_sits_mid_electrode() {
        let g = geometry(1, DepthOrder::FromSeparator);
        assert!((particle_depth_m(&g, 0) - 40e-6).abs() < 1e-18);
    }

    #[test]
    fn label_uses_rounded_micrometres() {
        let depth_um = round_to(to_micrometers(m(17.777e-6)), 1);
        assert_eq!(depth_label(depth_um), "Li at 17.8um");
        assert_eq!(depth_label(80.0), "Li at 80um");
    }

    #[test]
    fn collector_side_depends_on_order() {
        let cols = [4, 5, 6];
        assert_eq!(collector_side_column(&cols, DepthOrder::FromCurrentCollector), Some(4));
        assert_eq!(collector_side_column(&cols, DepthOrder::FromSeparator), Some(6));
        assert_eq!(collector_side_column(&[], DepthOrder::FromSeparator), None);
    }
}
