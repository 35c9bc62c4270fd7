//! Property-based tests for curve evaluation.

use openhandheld_curves::{CurveNode, SensitivityCurve, SteeringCurve};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn sanitize_f32(v: f32) -> f32 {
    if v.is_nan() {
        0.5
    } else if v.is_infinite() {
        if v > 0.0 { 1.0 } else { 0.0 }
    } else {
        v
    }
}

#[quickcheck]
fn prop_sensitivity_is_bounded(value: f32) -> bool {
    let value = sanitize_f32(value);
    let out = SensitivityCurve::flat().evaluate(value, 32767.0);
    (0.0..=1.0).contains(&out)
}

#[quickcheck]
fn prop_lut_tracks_direct_evaluation(value: f32) -> bool {
    // The curve steps from 0 at the first node and to 1 at the last one.
    let x = 0.01 + sanitize_f32(value).abs().fract() * 0.98;
    let curve = SensitivityCurve::flat();
    let lut = curve.to_lut();
    (lut.lookup(x) - curve.evaluate(x, 1.0)).abs() < 0.01
}

#[quickcheck]
fn prop_steering_is_odd(angle: f32, power: f32) -> bool {
    let angle = sanitize_f32(angle).clamp(-90.0, 90.0);
    let curve = SteeringCurve {
        max_angle: 45.0,
        power: sanitize_f32(power).abs().clamp(0.2, 4.0),
        deadzone: 5.0,
    };
    (curve.position(angle) + curve.position(-angle)).abs() < 1e-5
}

#[quickcheck]
fn prop_steering_magnitude_never_exceeds_one(angle: f32) -> bool {
    let curve = SteeringCurve::default();
    curve.position(sanitize_f32(angle) * 100.0).abs() <= 1.0
}

fn node() -> impl Strategy<Value = CurveNode> {
    (0.0f64..=1.0, 0.0f64..=2.0).prop_map(|(x, y)| CurveNode { x, y })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_custom_curve_lut_is_bounded(nodes in prop::collection::vec(node(), 1..12)) {
        let curve = SensitivityCurve::new(nodes).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let lut = curve.to_lut();
        for value in lut.table() {
            // Two blended nodes of at most 2.0 each.
            prop_assert!(value.is_finite());
            prop_assert!((0.0..=4.0).contains(value), "sample {}", value);
        }
    }

    #[test]
    fn prop_lut_lookup_stays_between_neighbours(nodes in prop::collection::vec(node(), 1..12), input in 0.0f32..=1.0) {
        let curve = SensitivityCurve::new(nodes).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let lut = curve.to_lut();
        let out = lut.lookup(input);
        let (lo, hi) = lut
            .table()
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        prop_assert!(out >= lo - 1e-4 && out <= hi + 1e-4);
    }

    #[test]
    fn prop_steering_is_monotonic(
        a in -120.0f32..120.0,
        b in -120.0f32..120.0,
        max_angle in 10.0f32..90.0,
        deadzone_share in 0.0f32..0.9,
        power in 0.2f32..4.0,
    ) {
        let curve = SteeringCurve {
            max_angle,
            power,
            deadzone: max_angle * deadzone_share,
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(curve.position(lo) <= curve.position(hi) + 1e-6);
    }
}
