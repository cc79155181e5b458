//! Reference particle cell: the stand-in battery model.
//!
//! Each electrode is a row of spherical particles across its depth. Current
//! is shared between particles with a weight that favours those nearest the
//! separator; one particle per electrode gives the single particle model.
//! An optional film resistance grows with charge throughput (SEI).

use std::collections::BTreeMap;

use cs_core::linspace;
use cs_core::units::constants::{FARADAY, SECONDS_PER_HOUR};
use serde::{Deserialize, Serialize};

use crate::channels::{ChannelIndex, DepthOrder, ModelDescription, ParticleChannels, Region, RegionGeometry};
use crate::error::{ModelError, ModelResult};
use crate::events::{VoltageCutoff, validate_positive};
use crate::model::{BatteryModel, TransientModel};
use crate::ocp::{negative_ocp, positive_ocp};
use crate::particle::SphericalParticle;
use crate::run::{ChargeDirection, RunRequest, SimulationRun};
use crate::sim::{IntegratorType, SimOptions, run_sim};

/// RK4 is stable for `dt * lambda` below about 2.78; keep half of that.
const RK4_STABILITY_MARGIN: f64 = 0.5 * 2.785;

/// Parameters of one electrode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeParams {
    pub particles: usize,
    pub radial_nodes: usize,
    pub particle_radius_m: f64,
    pub thickness_m: f64,
    pub diffusivity_m2_s: f64,
    pub max_concentration_mol_m3: f64,
    pub initial_stoichiometry: f64,
    /// Total active particle surface in the electrode.
    pub surface_area_m2: f64,
    pub charge_transfer_resistance_ohm: f64,
}

impl ElectrodeParams {
    fn particle(&self) -> SphericalParticle {
        SphericalParticle {
            radial_nodes: self.radial_nodes,
            radius_m: self.particle_radius_m,
            diffusivity_m2_s: self.diffusivity_m2_s,
        }
    }

    fn validate(&self) -> ModelResult<()> {
        if self.particles == 0 {
            return Err(ModelError::InvalidArg {
                what: "electrode needs at least one particle",
            });
        }
        if self.radial_nodes == 0 {
            return Err(ModelError::InvalidArg {
                what: "particle needs at least one radial node",
            });
        }
        validate_positive(self.particle_radius_m, "particle_radius_m")?;
        validate_positive(self.thickness_m, "thickness_m")?;
        validate_positive(self.diffusivity_m2_s, "diffusivity_m2_s")?;
        validate_positive(self.max_concentration_mol_m3, "max_concentration_mol_m3")?;
        validate_positive(self.surface_area_m2, "surface_area_m2")?;
        if !(self.initial_stoichiometry > 0.0 && self.initial_stoichiometry < 1.0) {
            return Err(ModelError::InvalidArg {
                what: "initial_stoichiometry must lie in (0, 1)",
            });
        }
        if !(self.charge_transfer_resistance_ohm >= 0.0) {
            return Err(ModelError::InvalidArg {
                what: "charge_transfer_resistance_ohm must be non-negative",
            });
        }
        Ok(())
    }

    fn state_len(&self) -> usize {
        self.particles * self.radial_nodes
    }
}

/// Full parameter set of the reference cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellParams {
    pub name: String,
    pub positive: ElectrodeParams,
    pub negative: ElectrodeParams,
    pub ohmic_resistance_ohm: f64,
    /// Film growth rate in ohm per coulomb passed; `None` disables the film.
    pub sei_growth_ohm_per_c: Option<f64>,
    pub initial_sei_resistance_ohm: f64,
    /// Exponential bias of current toward the separator (0 = uniform).
    pub depth_skew: f64,
    pub v_min: f64,
    pub v_max: f64,
    pub nominal_capacity_ah: f64,
    pub capacity_normalization_ah: f64,
    /// Upper bound on display samples per run.
    pub display_points: usize,
    pub dt_initial_s: f64,
    pub dt_max_s: f64,
    pub dt_growth: f64,
    /// Time limit as a multiple of the nominal duration at the requested current.
    pub t_max_factor: f64,
}

impl CellParams {
    fn validate(&self) -> ModelResult<()> {
        self.positive.validate()?;
        self.negative.validate()?;
        if !(self.ohmic_resistance_ohm >= 0.0) || !(self.initial_sei_resistance_ohm >= 0.0) {
            return Err(ModelError::InvalidArg {
                what: "resistances must be non-negative",
            });
        }
        if let Some(rate) = self.sei_growth_ohm_per_c {
            if !(rate >= 0.0) {
                return Err(ModelError::InvalidArg {
                    what: "sei_growth_ohm_per_c must be non-negative",
                });
            }
        }
        if !self.depth_skew.is_finite() {
            return Err(ModelError::InvalidArg {
                what: "depth_skew must be finite",
            });
        }
        if !(self.v_min < self.v_max) {
            return Err(ModelError::InvalidArg {
                what: "v_min must be below v_max",
            });
        }
        validate_positive(self.nominal_capacity_ah, "nominal_capacity_ah")?;
        validate_positive(self.capacity_normalization_ah, "capacity_normalization_ah")?;
        validate_positive(self.dt_initial_s, "dt_initial_s")?;
        validate_positive(self.dt_max_s, "dt_max_s")?;
        validate_positive(self.t_max_factor, "t_max_factor")?;
        if !(self.dt_growth >= 1.0) {
            return Err(ModelError::InvalidArg {
                what: "dt_growth must be >= 1",
            });
        }
        if self.display_points == 0 {
            return Err(ModelError::InvalidArg {
                what: "display_points must be positive",
            });
        }
        Ok(())
    }

    fn electrode(&self, region: Region) -> &ElectrodeParams {
        match region {
            Region::Positive => &self.positive,
            Region::Negative => &self.negative,
        }
    }
}

fn depth_order(region: Region) -> DepthOrder {
    match region {
        Region::Positive => DepthOrder::FromCurrentCollector,
        Region::Negative => DepthOrder::FromSeparator,
    }
}

/// Share of the electrode current carried by each particle, mean 1.
fn depth_weights(order: DepthOrder, particles: usize, skew: f64) -> Vec<f64> {
    if particles == 1 {
        return vec![1.0];
    }
    let last = (particles - 1) as f64;
    let raw: Vec<f64> = (0..particles)
        .map(|i| {
            let from_separator = match order {
                DepthOrder::FromSeparator => i as f64 / last,
                DepthOrder::FromCurrentCollector => (last - i as f64) / last,
            };
            (-skew * from_separator).exp()
        })
        .collect();
    let mean = raw.iter().sum::<f64>() / particles as f64;
    raw.into_iter().map(|w| w / mean).collect()
}

/// Transient state: interior concentrations (positive particles first) and film resistance.
#[derive(Debug, Clone, PartialEq)]
pub struct CellState {
    pub concentration: Vec<f64>,
    pub sei_resistance_ohm: f64,
}

/// Observable quantities derived from one state.
struct Observation {
    profiles: Vec<Vec<f64>>,
    positive_potential: Vec<f64>,
    negative_potential: Vec<f64>,
    voltage: f64,
}

/// One run's dynamics at a fixed signed current.
struct CellDynamics<'a> {
    params: &'a CellParams,
    current_a: f64,
    direction: ChargeDirection,
    cutoff: Option<VoltageCutoff>,
    positive: SphericalParticle,
    negative: SphericalParticle,
    positive_weights: Vec<f64>,
    negative_weights: Vec<f64>,
}

impl<'a> CellDynamics<'a> {
    fn new(params: &'a CellParams, request: &RunRequest) -> Self {
        let cutoff = request.trim.then_some(VoltageCutoff {
            v_min: params.v_min,
            v_max: params.v_max,
        });
        Self {
            params,
            current_a: request.signed_current_a(),
            direction: request.direction,
            cutoff,
            positive: params.positive.particle(),
            negative: params.negative.particle(),
            positive_weights: depth_weights(
                depth_order(Region::Positive),
                params.positive.particles,
                params.depth_skew,
            ),
            negative_weights: depth_weights(
                depth_order(Region::Negative),
                params.negative.particles,
                params.depth_skew,
            ),
        }
    }

    fn stiffness(&self) -> f64 {
        self.positive.stiffness().max(self.negative.stiffness())
    }

    /// Outward molar flux of particle `k` in `region`.
    fn flux(&self, region: Region, k: usize) -> f64 {
        let electrode = self.params.electrode(region);
        let (weight, sign) = match region {
            // Discharge inserts lithium into the positive particles.
            Region::Positive => (self.positive_weights[k], -1.0),
            Region::Negative => (self.negative_weights[k], 1.0),
        };
        sign * self.current_a * weight / (FARADAY * electrode.surface_area_m2)
    }

    /// Iterate (region, particle index, interior slice) over the state.
    fn particles<'s>(&self, x: &'s CellState) -> Vec<(Region, usize, &'s [f64])> {
        let split = self.params.positive.state_len();
        let (pos, neg) = x.concentration.split_at(split);
        let mut out = Vec::with_capacity(self.params.positive.particles + self.params.negative.particles);
        for (k, chunk) in pos.chunks(self.params.positive.radial_nodes).enumerate() {
            out.push((Region::Positive, k, chunk));
        }
        for (k, chunk) in neg.chunks(self.params.negative.radial_nodes).enumerate() {
            out.push((Region::Negative, k, chunk));
        }
        out
    }

    fn sphere(&self, region: Region) -> &SphericalParticle {
        match region {
            Region::Positive => &self.positive,
            Region::Negative => &self.negative,
        }
    }

    fn observe(&self, x: &CellState) -> Observation {
        let mut profiles = Vec::new();
        let mut positive_potential = Vec::new();
        let mut negative_potential = Vec::new();
        for (region, k, interior) in self.particles(x) {
            let flux = self.flux(region, k);
            let sphere = self.sphere(region);
            let electrode = self.params.electrode(region);
            let surface = sphere.surface(interior, flux) / electrode.max_concentration_mol_m3;
            match region {
                Region::Positive => positive_potential.push(
                    positive_ocp(surface)
                        - self.current_a * self.positive_weights[k] * electrode.charge_transfer_resistance_ohm,
                ),
                Region::Negative => negative_potential.push(
                    negative_ocp(surface)
                        + self.current_a * self.negative_weights[k] * electrode.charge_transfer_resistance_ohm,
                ),
            }
            profiles.push(sphere.profile(interior, flux));
        }
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        let resistance = self.params.ohmic_resistance_ohm + x.sei_resistance_ohm;
        let voltage = mean(&positive_potential) - mean(&negative_potential) - self.current_a * resistance;
        Observation {
            profiles,
            positive_potential,
            negative_potential,
            voltage,
        }
    }

    /// Internal row in the layout reported by [`ParticleCell::channel_index`].
    fn row(&self, t: f64, obs: &Observation, x: &CellState) -> Vec<f64> {
        let mut row = vec![t];
        for profile in &obs.profiles {
            row.extend_from_slice(profile);
        }
        row.extend_from_slice(&obs.positive_potential);
        row.extend_from_slice(&obs.negative_potential);
        if self.params.sei_growth_ohm_per_c.is_some() {
            row.push(x.sei_resistance_ohm);
        }
        row.push(self.current_a);
        row
    }
}

impl TransientModel for CellDynamics<'_> {
    type State = CellState;

    fn initial_state(&self) -> CellState {
        let fill = |e: &ElectrodeParams| {
            std::iter::repeat_n(e.initial_stoichiometry * e.max_concentration_mol_m3, e.state_len())
        };
        CellState {
            concentration: fill(&self.params.positive)
                .chain(fill(&self.params.negative))
                .collect(),
            sei_resistance_ohm: self.params.initial_sei_resistance_ohm,
        }
    }

    fn rhs(&mut self, _t: f64, x: &CellState) -> ModelResult<CellState> {
        let mut dcdt = vec![0.0; x.concentration.len()];
        let mut offset = 0;
        for (region, k, interior) in self.particles(x) {
            let flux = self.flux(region, k);
            let n = interior.len();
            self.sphere(region)
                .derivative(interior, flux, &mut dcdt[offset..offset + n]);
            offset += n;
        }
        if let Some(bad) = dcdt.iter().find(|d| !d.is_finite()) {
            tracing::warn!(value = bad, "non-finite concentration derivative");
            return Err(ModelError::NonPhysical {
                what: "concentration derivative is not finite",
            });
        }
        let sei_rate = self
            .params
            .sei_growth_ohm_per_c
            .map_or(0.0, |rate| rate * self.current_a.abs());
        Ok(CellState {
            concentration: dcdt,
            sei_resistance_ohm: sei_rate,
        })
    }

    fn add(&self, a: &CellState, b: &CellState) -> CellState {
        CellState {
            concentration: a
                .concentration
                .iter()
                .zip(&b.concentration)
                .map(|(x, y)| x + y)
                .collect(),
            sei_resistance_ohm: a.sei_resistance_ohm + b.sei_resistance_ohm,
        }
    }

    fn scale(&self, a: &CellState, scale: f64) -> CellState {
        CellState {
            concentration: a.concentration.iter().map(|x| x * scale).collect(),
            sei_resistance_ohm: a.sei_resistance_ohm * scale,
        }
    }

    fn should_stop(&self, _t: f64, x: &CellState) -> bool {
        match self.cutoff {
            Some(cutoff) => cutoff.crossed(self.direction, self.observe(x).voltage),
            None => false,
        }
    }
}

/// Linear interpolation of `ys` over increasing `xs`, clamped to the ends.
fn sample_linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let hi = xs.partition_point(|&v| v < x);
    if hi == 0 {
        return ys[0];
    }
    if hi >= xs.len() {
        return ys[ys.len() - 1];
    }
    let lo = hi - 1;
    let alpha = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + alpha * (ys[hi] - ys[lo])
}

/// Reference cell implementing [`BatteryModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleCell {
    params: CellParams,
}

impl ParticleCell {
    pub fn new(params: CellParams) -> ModelResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CellParams {
        &self.params
    }

    /// Column layout of the internal rows produced by [`BatteryModel::run`].
    pub fn channel_index(&self) -> ChannelIndex {
        let mut next = 1;
        let mut take = |n: usize| {
            let cols: Vec<usize> = (next..next + n).collect();
            next += n;
            cols
        };

        let mut concentration = Vec::new();
        for region in Region::ALL {
            let e = self.params.electrode(region);
            for particle in 0..e.particles {
                concentration.push(ParticleChannels {
                    region,
                    particle,
                    columns: take(e.radial_nodes + 2),
                });
            }
        }

        let mut potentials = BTreeMap::new();
        for region in Region::ALL {
            potentials.insert(region, take(self.params.electrode(region).particles));
        }

        let mut extras = BTreeMap::new();
        if self.params.sei_growth_ohm_per_c.is_some() {
            extras.insert("sei_resistance".to_string(), take(1)[0]);
        }
        let current = take(1)[0];

        ChannelIndex {
            time: 0,
            current: Some(current),
            solid_phase_potential: potentials,
            solid_lithium_concentration: concentration,
            extras,
        }
    }

    fn geometry(&self, region: Region) -> RegionGeometry {
        let e = self.params.electrode(region);
        RegionGeometry {
            particles: e.particles,
            radial_nodes: e.radial_nodes,
            particle_radius_m: e.particle_radius_m,
            thickness_m: e.thickness_m,
            depth_order: depth_order(region),
        }
    }

    fn sim_options(&self, current_a: f64, stiffness: f64) -> SimOptions {
        let dt_max = self.params.dt_max_s.min(RK4_STABILITY_MARGIN / stiffness);
        SimOptions {
            dt_initial: self.params.dt_initial_s.min(dt_max),
            dt_max,
            dt_growth: self.params.dt_growth,
            t_end: self.params.t_max_factor * self.params.nominal_capacity_ah * SECONDS_PER_HOUR / current_a,
            max_steps: 2_000_000,
            integrator: IntegratorType::RK4,
        }
    }
}

impl BatteryModel for ParticleCell {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            name: self.params.name.clone(),
            channels: self.channel_index(),
            positive: self.geometry(Region::Positive),
            negative: self.geometry(Region::Negative),
            capacity_normalization_ah: self.params.capacity_normalization_ah,
        }
    }

    fn run(&self, request: &RunRequest) -> ModelResult<SimulationRun> {
        validate_positive(request.current_a, "current_a must be positive and finite")?;

        let mut dynamics = CellDynamics::new(&self.params, request);
        let opts = self.sim_options(request.current_a, dynamics.stiffness());
        tracing::debug!(
            model = %self.params.name,
            dt_max = opts.dt_max,
            t_end = opts.t_end,
            "starting reference cell run"
        );
        let record = run_sim(&mut dynamics, &opts)?;

        let mut raw_voltage = Vec::with_capacity(record.t.len());
        let mut internal = Vec::new();
        for (&t, x) in record.t.iter().zip(&record.x) {
            let obs = dynamics.observe(x);
            raw_voltage.push(obs.voltage);
            if request.internal {
                internal.push(dynamics.row(t, &obs, x));
            }
        }

        let t_first = record.t.first().copied().unwrap_or(0.0);
        let t_last = record.t.last().copied().unwrap_or(0.0);
        let display_len = self.params.display_points.min(record.t.len().saturating_sub(1)) + 1;
        let time = linspace(t_first, t_last, display_len);
        let voltage = time
            .iter()
            .map(|&t| sample_linear(&record.t, &raw_voltage, t))
            .collect();

        tracing::info!(
            model = %self.params.name,
            direction = request.direction.as_str(),
            current_a = request.current_a,
            raw_points = record.t.len(),
            display_points = display_len,
            duration_s = t_last - t_first,
            stopped_by_cutoff = record.stopped_by_event,
            "reference cell run complete"
        );

        let raw_time = if request.internal { record.t } else { Vec::new() };
        SimulationRun::new(
            request.direction,
            request.current_a,
            raw_time,
            internal,
            time,
            voltage,
        )
    }
}
