//! Pipeline behaviour against a small hand-built model.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cs_model::{
    BatteryModel, ChannelIndex, ChargeDirection, DepthOrder, ModelDescription, ModelError,
    ModelResult, ParticleChannels, Region, RegionGeometry, RunRequest, SimulationRun,
};
use cs_pipeline::{
    AssemblySettings, PipelineError, PipelineOutput, PipelineSettings, run_pipeline,
};

const RAW_TIME: [f64; 5] = [0.0, 900.0, 1800.0, 2700.0, 3600.0];
const CURRENT_COLUMN: usize = 13;

/// Two positive particles, one negative, one interior node each.
///
/// Column `c` holds `10 * c + t / 900`, except the current column which
/// holds a constant 2 A.
struct MockModel {
    calls: AtomicUsize,
    last: Mutex<Option<RunRequest>>,
    radial_nodes: usize,
    internal: bool,
    fail: bool,
}

impl MockModel {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            radial_nodes: 1,
            internal: true,
            fail: false,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<RunRequest> {
        *self.last.lock().unwrap()
    }
}

impl BatteryModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn describe(&self) -> ModelDescription {
        let mut potentials = BTreeMap::new();
        potentials.insert(Region::Positive, vec![10, 11]);
        potentials.insert(Region::Negative, vec![12]);
        let particle = |region, particle, first: usize| ParticleChannels {
            region,
            particle,
            columns: (first..first + 3).collect(),
        };
        ModelDescription {
            name: "mock".to_string(),
            channels: ChannelIndex {
                time: 0,
                current: Some(CURRENT_COLUMN),
                solid_phase_potential: potentials,
                solid_lithium_concentration: vec![
                    particle(Region::Positive, 0, 1),
                    particle(Region::Positive, 1, 4),
                    particle(Region::Negative, 0, 7),
                ],
                extras: BTreeMap::new(),
            },
            positive: RegionGeometry {
                particles: 2,
                radial_nodes: self.radial_nodes,
                particle_radius_m: 4e-6,
                thickness_m: 60e-6,
                depth_order: DepthOrder::FromCurrentCollector,
            },
            negative: RegionGeometry {
                particles: 1,
                radial_nodes: self.radial_nodes,
                particle_radius_m: 6e-6,
                thickness_m: 50e-6,
                depth_order: DepthOrder::FromSeparator,
            },
            capacity_normalization_ah: 1.0,
        }
    }

    fn run(&self, request: &RunRequest) -> ModelResult<SimulationRun> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(*request);
        if self.fail {
            return Err(ModelError::Backend {
                message: "solver diverged".to_string(),
            });
        }

        let (raw_time, internal) = if self.internal {
            let rows = RAW_TIME
                .iter()
                .map(|&t| {
                    (0..14)
                        .map(|c| match c {
                            0 => t,
                            CURRENT_COLUMN => 2.0,
                            _ => 10.0 * c as f64 + t / 900.0,
                        })
                        .collect()
                })
                .collect();
            (RAW_TIME.to_vec(), rows)
        } else {
            (Vec::new(), Vec::new())
        };
        SimulationRun::new(
            request.direction,
            request.current_a,
            raw_time,
            internal,
            vec![0.0, 1350.0, 2700.0, 4050.0],
            vec![4.0, 3.9, 3.8, 3.7],
        )
    }
}

fn ready(output: PipelineOutput) -> Box<cs_pipeline::DashboardPayload> {
    match output {
        PipelineOutput::Ready(payload) => payload,
        PipelineOutput::Idle => panic!("expected a payload"),
    }
}

#[test]
fn zero_current_never_invokes_the_model() {
    let model = MockModel::new();
    let output = run_pipeline(&model, 0.0, &PipelineSettings::default()).unwrap();
    assert!(output.is_idle());
    assert_eq!(model.calls(), 0);
}

#[test]
fn tiny_current_is_raised_to_the_floor() {
    let model = MockModel::new();
    run_pipeline(&model, 0.05, &PipelineSettings::default()).unwrap();
    let request = model.last_request().unwrap();
    assert_eq!(request.direction, ChargeDirection::Discharge);
    assert_eq!(request.current_a, 0.2);
    assert!(request.internal);
    assert!(request.trim);
}

#[test]
fn negative_current_charges() {
    let model = MockModel::new();
    let payload = ready(run_pipeline(&model, -3.0, &PipelineSettings::default()).unwrap());
    assert_eq!(payload.summary.direction, ChargeDirection::Charge);
    assert_eq!(payload.summary.current_a, 3.0);
    assert_eq!(model.calls(), 1);
}

#[test]
fn main_object_carries_voltage_and_collector_potentials() {
    let model = MockModel::new();
    let payload = ready(run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap());
    let json: serde_json::Value =
        serde_json::from_str(&payload.to_json_parts().unwrap().main).unwrap();

    assert_eq!(
        json["voltage_data"]["time"],
        serde_json::json!([0.0, 1350.0, 2700.0, 4050.0])
    );
    assert_eq!(json["voltage_data"]["voltage"][0], 4.0);

    let p_pot = &json["internal_data"]["p_pot"];
    assert_eq!(p_pot[0], 100.0);
    assert!((p_pot[1].as_f64().unwrap() - 101.5).abs() < 1e-9);
    assert_eq!(p_pot[2], 103.0);
    assert!(p_pot[3].is_null());

    let n_pot = &json["internal_data"]["n_pot"];
    assert_eq!(n_pot[0], 120.0);
    assert!(n_pot[3].is_null());
}

#[test]
fn region_objects_are_keyed_by_particle() {
    let model = MockModel::new();
    let payload = ready(run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap());
    let parts = payload.to_json_parts().unwrap();
    let positive: serde_json::Value = serde_json::from_str(&parts.positive).unwrap();
    let negative: serde_json::Value = serde_json::from_str(&parts.negative).unwrap();

    assert_eq!(positive["p_x"], serde_json::json!([0.0, 2e-6, 4e-6]));
    let particles = positive["positive"].as_object().unwrap();
    assert_eq!(particles.len(), 2);
    let rows = particles["1"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], serde_json::json!([40.0, 50.0, 60.0]));
    assert!(rows[3].as_array().unwrap().iter().all(|v| v.is_null()));

    assert_eq!(negative["n_x"].as_array().unwrap().len(), 3);
    assert_eq!(negative["negative"].as_object().unwrap().len(), 1);
    assert_eq!(negative["negative"]["0"][2], serde_json::json!([73.0, 83.0, 93.0]));
}

#[test]
fn depth_labels_follow_region_order() {
    let model = MockModel::new();
    let payload = ready(run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap());
    assert_eq!(payload.positive.labels, vec!["Li at 0um", "Li at 60um"]);
    assert_eq!(payload.negative.labels, vec!["Li at 25um"]);
}

#[test]
fn capacity_integrates_raw_current() {
    let model = MockModel::new();
    let payload = ready(run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap());
    assert_eq!(payload.summary.capacity_ah, Some(2.0));
    assert_eq!(payload.summary.raw_points, 5);
    assert_eq!(payload.summary.display_points, 4);
}

#[test]
fn stride_thins_the_display_axis() {
    let model = MockModel::new();
    let settings = PipelineSettings {
        assembly: AssemblySettings { display_stride: 3 },
        ..PipelineSettings::default()
    };
    let payload = ready(run_pipeline(&model, 1.0, &settings).unwrap());
    assert_eq!(payload.main.voltage_data.time, vec![0.0, 4050.0]);
    assert_eq!(payload.main.internal_data.p_pot.len(), 2);
    assert_eq!(payload.positive.particles[&0].len(), 2);
}

#[test]
fn model_failure_propagates() {
    let model = MockModel {
        fail: true,
        ..MockModel::new()
    };
    let err = run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Model(ModelError::Backend { .. })));
    assert_eq!(model.calls(), 1);
}

#[test]
fn run_without_internal_state_is_rejected() {
    let model = MockModel {
        internal: false,
        ..MockModel::new()
    };
    let err = run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap_err();
    assert_eq!(err, PipelineError::MissingInternalState);
}

#[test]
fn node_count_mismatch_is_rejected() {
    let model = MockModel {
        radial_nodes: 2,
        ..MockModel::new()
    };
    let err = run_pipeline(&model, 1.0, &PipelineSettings::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Channel { .. }));
}
