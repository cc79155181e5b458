use cs_pipeline::{derived_capacity, resample_channel};
use proptest::prelude::*;

/// Strictly increasing axis and a non-decreasing channel on it.
fn monotone_data() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.1f64..10.0, 0.0f64..5.0), 2..40).prop_map(|steps| {
        let mut x = Vec::with_capacity(steps.len());
        let mut y = Vec::with_capacity(steps.len());
        let (mut xa, mut ya) = (0.0, 1.0);
        for (dx, dy) in steps {
            x.push(xa);
            y.push(ya);
            xa += dx;
            ya += dy;
        }
        (x, y)
    })
}

proptest! {
    #[test]
    fn values_stay_within_bracketing_knots(
        (x, y) in monotone_data(),
        fractions in prop::collection::vec(0.0f64..=1.0, 1..20),
    ) {
        let span = x[x.len() - 1] - x[0];
        let targets: Vec<f64> = fractions.iter().map(|f| x[0] + f * span).collect();
        let out = resample_channel(&x, &y, &targets).unwrap();

        for (&t, v) in targets.iter().zip(out.values()) {
            let v = v.expect("in-range target has a value");
            let k = x.partition_point(|&xi| xi <= t).saturating_sub(1).min(x.len() - 2);
            let lo = y[k].min(y[k + 1]);
            let hi = y[k].max(y[k + 1]);
            let eps = 1e-9 * (1.0 + hi.abs());
            prop_assert!(v >= lo - eps && v <= hi + eps, "t={t} v={v} in [{lo}, {hi}]");
        }
    }

    #[test]
    fn resampling_onto_raw_axis_is_identity((x, y) in monotone_data()) {
        let out = resample_channel(&x, &y, &x).unwrap();
        let expected: Vec<Option<f64>> = y.iter().copied().map(Some).collect();
        prop_assert_eq!(out.values(), expected.as_slice());
    }

    #[test]
    fn targets_beyond_range_are_missing((x, y) in monotone_data(), gap in 1e-3f64..100.0) {
        let last = x[x.len() - 1];
        let out = resample_channel(&x, &y, &[x[0] - gap, last + gap]).unwrap();
        prop_assert_eq!(out.values(), &[None, None][..]);
    }

    #[test]
    fn reversing_time_flips_capacity_sign(
        samples in prop::collection::vec((0.1f64..100.0, -5.0f64..5.0), 2..30),
    ) {
        let mut time = Vec::new();
        let mut current = Vec::new();
        let mut t = 0.0;
        for (dt, i) in &samples {
            time.push(t);
            current.push(*i);
            t += dt;
        }
        let forward = derived_capacity(&time, &current, 1.0).unwrap();
        let reversed: Vec<f64> = time.iter().map(|t| -t).collect();
        let backward = derived_capacity(&reversed, &current, 1.0).unwrap();
        prop_assert!((forward + backward).abs() <= 1e-9 * (1.0 + forward.abs()));
    }
}
