//! Inner/outer deadzones
//!
//! The inner deadzone swallows small deflections; the outer deadzone lets a
//! stick reach full scale before the physical edge. Between the two the
//! magnitude is remapped linearly onto `0..=1`, so there is no jump at the
//! inner edge.

use crate::shape::map_range;
use crate::{STICK_MAX, TRIGGER_MAX};

/// Scaled radial inner/outer deadzone on a stick vector.
///
/// Direction is preserved; only the length is remapped. A vector at or
/// inside the inner radius becomes zero, one at or past `1 - outer` is
/// capped at full scale.
///
/// # Example
///
/// ```
/// use openhandheld_filters::radial_inner_outer_deadzone;
///
/// let (x, y) = radial_inner_outer_deadzone(16383.5, 0.0, 0.0, 50.0);
/// assert!((x - 32767.0).abs() < 1e-2);
/// assert_eq!(y, 0.0);
/// ```
pub fn radial_inner_outer_deadzone(x: f32, y: f32, inner_pct: f32, outer_pct: f32) -> (f32, f32) {
    if (inner_pct <= 0.0 && outer_pct <= 0.0) || (x == 0.0 && y == 0.0) {
        return (x, y);
    }
    if !x.is_finite() || !y.is_finite() {
        return (0.0, 0.0);
    }

    let inner = (inner_pct / 100.0).clamp(0.0, 1.0);
    let outer = (outer_pct / 100.0).clamp(0.0, 1.0);

    let nx = x / STICK_MAX;
    let ny = y / STICK_MAX;
    let length = nx.hypot(ny);

    if length <= inner {
        return (0.0, 0.0);
    }

    let scale = if length >= 1.0 - outer {
        1.0 / length
    } else {
        map_range(length, inner, 1.0 - outer, 0.0, 1.0) / length
    };

    (nx * scale * STICK_MAX, ny * scale * STICK_MAX)
}

/// Inner/outer deadzone on a signed scalar of magnitude `max`.
///
/// Returns 0 inside the inner deadzone and `±max` at or past `1 - outer`.
pub fn inner_outer_deadzone(value: f32, inner_pct: f32, outer_pct: f32, max: f32) -> f32 {
    if (inner_pct <= 0.0 && outer_pct <= 0.0) || value == 0.0 || max <= 0.0 {
        return value;
    }
    if !value.is_finite() {
        return 0.0;
    }

    let inner = (inner_pct / 100.0).clamp(0.0, 1.0);
    let outer = (outer_pct / 100.0).clamp(0.0, 1.0);
    let magnitude = (value / max).abs();
    let sign = value.signum();

    if magnitude <= inner {
        0.0
    } else if magnitude >= 1.0 - outer {
        max * sign
    } else {
        map_range(magnitude, inner, 1.0 - outer, 0.0, 1.0) * max * sign
    }
}

/// [`inner_outer_deadzone`] on a `0..=255` trigger.
pub fn trigger_inner_outer_deadzone(value: f32, inner_pct: f32, outer_pct: f32) -> f32 {
    inner_outer_deadzone(value.clamp(0.0, TRIGGER_MAX), inner_pct, outer_pct, TRIGGER_MAX)
}
