//! Property-based tests for stick and trigger shaping.

use openhandheld_filters::prelude::*;
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn round_i16(v: f32) -> i32 {
    v.round().clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i32
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_radial_deadzone_never_grows(x in any::<i16>(), y in any::<i16>(), inner in 0.0f32..60.0) {
        let (ox, oy) = radial_inner_outer_deadzone(f32::from(x), f32::from(y), inner, 0.0);
        prop_assert!(round_i16(ox).abs() <= i32::from(x).abs());
        prop_assert!(round_i16(oy).abs() <= i32::from(y).abs());
    }

    #[test]
    fn prop_radial_deadzone_zero_inside_inner(
        angle in 0.0f32..std::f32::consts::TAU,
        fraction in 0.0f32..0.95,
        inner in 1.0f32..60.0,
    ) {
        let radius = fraction * inner / 100.0 * STICK_MAX;
        let x = (radius * angle.cos()).round();
        let y = (radius * angle.sin()).round();
        let (ox, oy) = radial_inner_outer_deadzone(x, y, inner, 0.0);
        prop_assert_eq!(round_i16(ox), 0);
        prop_assert_eq!(round_i16(oy), 0);
    }

    #[test]
    fn prop_scalar_deadzone_monotonic(x in any::<i16>(), inner in 0.0f32..60.0) {
        let out = inner_outer_deadzone(f32::from(x), inner, 0.0, STICK_MAX);
        prop_assert!(round_i16(out).abs() <= i32::from(x).abs());
        if (f32::from(x) / STICK_MAX).abs() < inner / 100.0 {
            prop_assert_eq!(round_i16(out), 0);
        }
    }

    #[test]
    fn prop_scalar_deadzone_preserves_order(a in any::<i16>(), b in any::<i16>(), inner in 0.0f32..60.0, outer in 0.0f32..30.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let out_lo = inner_outer_deadzone(f32::from(lo), inner, outer, STICK_MAX);
        let out_hi = inner_outer_deadzone(f32::from(hi), inner, outer, STICK_MAX);
        prop_assert!(out_lo <= out_hi + 1e-2);
    }

    #[test]
    fn prop_circularity_bounds_length(x in any::<i16>(), y in any::<i16>()) {
        let (ox, oy) = improve_circularity(f32::from(x), f32::from(y));
        prop_assert!(ox.hypot(oy) <= STICK_MAX + 1.0);
    }

    #[test]
    fn prop_trigger_deadzone_in_range(v in 0u8..=255, inner in 0.0f32..50.0, outer in 0.0f32..50.0) {
        let out = trigger_inner_outer_deadzone(f32::from(v), inner, outer);
        prop_assert!((0.0..=TRIGGER_MAX).contains(&out));
    }
}

#[quickcheck]
fn prop_anti_deadzone_never_shrinks(x: i16, pct: u8) -> bool {
    let pct = f32::from(pct % 90);
    let out = anti_deadzone_scalar(f32::from(x), pct, STICK_MAX);
    out.abs() + 1e-2 >= f32::from(x).abs().min(STICK_MAX)
}

#[quickcheck]
fn prop_rotation_preserves_length(x: i16, y: i16, degrees: i16) -> bool {
    let (ox, oy) = rotate(f32::from(x), f32::from(y), f32::from(degrees % 360));
    (ox.hypot(oy) - f32::from(x).hypot(f32::from(y))).abs() < 1.0
}
