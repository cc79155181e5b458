//! Integration test: reference particle cell runs end to end.
//!
//! Checks the trends a dashboard relies on:
//! - discharge ends at the lower cutoff and charge at the upper cutoff
//! - the raw axis is irregular and the display axis is uniform and in range
//! - lithium moves into the positive particle on discharge
//! - multi-particle electrodes starve the particles next to the separator first

use cs_model::{BatteryModel, ChargeDirection, ModelPreset, Region, RunRequest};

fn surface_column(model: &dyn BatteryModel, region: Region, particle: usize) -> usize {
    let description = model.describe();
    let channels = description
        .channels
        .particles(region)
        .find(|p| p.particle == particle)
        .expect("particle present");
    *channels.columns.last().expect("surface node")
}

#[test]
fn single_particle_discharge_reaches_cutoff() {
    let cell = ModelPreset::SingleParticle.build().unwrap();
    let run = cell.run(&RunRequest::discharge(4.0)).unwrap();

    assert_eq!(run.direction(), ChargeDirection::Discharge);
    let v = run.voltage();
    assert!(v[0] > 3.0, "initial voltage {}", v[0]);
    assert!(*v.last().unwrap() <= 2.5 + 1e-6);
    assert!(v.len() <= 301);

    let raw = run.raw_time();
    assert_eq!(raw.len(), run.internal().len());
    assert!(raw.windows(2).all(|w| w[1] > w[0]));
    let first_step = raw[1] - raw[0];
    let later_step = raw[raw.len() - 1] - raw[raw.len() - 2];
    assert!((first_step - 0.1).abs() < 1e-12);
    assert!(later_step > 10.0 * first_step);

    let t = run.time();
    assert_eq!(t[0], raw[0]);
    assert_eq!(*t.last().unwrap(), *raw.last().unwrap());
    let spacing = t[1] - t[0];
    assert!(t.windows(2).all(|w| ((w[1] - w[0]) - spacing).abs() < 1e-6 * spacing));
}

#[test]
fn discharge_lithiates_positive_surface() {
    let cell = ModelPreset::SingleParticle.build().unwrap();
    let run = cell.run(&RunRequest::discharge(4.0)).unwrap();
    let col = surface_column(&cell, Region::Positive, 0);
    let c = run.column(col).unwrap();
    assert!(c.last().unwrap() > c.first().unwrap());

    let col = surface_column(&cell, Region::Negative, 0);
    let c = run.column(col).unwrap();
    assert!(c.last().unwrap() < c.first().unwrap());
}

#[test]
fn charge_reaches_upper_cutoff() {
    let cell = ModelPreset::SingleParticle.build().unwrap();
    let run = cell.run(&RunRequest::charge(2.0)).unwrap();
    let v = run.voltage();
    assert!(*v.last().unwrap() >= 4.2 - 1e-6);
    assert!(v[0] < 4.2);

    let current_col = cell.describe().channels.current.unwrap();
    let current = run.column(current_col).unwrap();
    assert!(current.iter().all(|&i| (i + 2.0).abs() < 1e-12));
}

#[test]
fn pseudo_two_dim_starves_separator_particles() {
    let cell = ModelPreset::PseudoTwoDim.build().unwrap();
    let description = cell.describe();
    assert_eq!(description.channels.particles(Region::Negative).count(), 11);
    assert_eq!(description.channels.potential_columns(Region::Positive).len(), 11);

    let run = cell.run(&RunRequest::discharge(4.0)).unwrap();
    let mid = run.internal().len() / 2;
    let near_separator = run.internal()[mid][surface_column(&cell, Region::Negative, 0)];
    let near_collector = run.internal()[mid][surface_column(&cell, Region::Negative, 10)];
    assert!(near_separator < near_collector);
}

#[test]
fn untrimmed_run_goes_to_time_limit() {
    let cell = ModelPreset::SingleParticle.build().unwrap();
    let request = RunRequest {
        trim: false,
        ..RunRequest::discharge(10.0)
    };
    let run = cell.run(&request).unwrap();
    let t_end = 2.0 * 2.0 * 3600.0 / 10.0;
    assert!((run.raw_time().last().unwrap() - t_end).abs() < 1e-6);
}

#[test]
fn internal_state_is_optional() {
    let cell = ModelPreset::SingleParticle.build().unwrap();
    let request = RunRequest {
        internal: false,
        ..RunRequest::discharge(4.0)
    };
    let run = cell.run(&request).unwrap();
    assert!(!run.has_internal());
    assert!(run.raw_time().is_empty());
    assert!(!run.time().is_empty());
}
