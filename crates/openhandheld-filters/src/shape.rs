//! Remaps that do not depend on a deadzone.

use crate::STICK_MAX;

/// Linear remap of `value` from `[old_min, old_max]` to `[new_min, new_max]`.
///
/// Not clamped; a degenerate source range maps everything to `new_min`.
#[inline]
pub fn map_range(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    let span = old_max - old_min;
    if span.abs() < f32::EPSILON {
        return new_min;
    }
    new_min + (new_max - new_min) * (value - old_min) / span
}

/// Signed 16-bit axis to a byte centered at 128.
///
/// # Example
///
/// ```
/// use openhandheld_filters::normalize_xbox_input;
///
/// assert_eq!(normalize_xbox_input(0.0), 128);
/// assert_eq!(normalize_xbox_input(-32768.0), 0);
/// assert_eq!(normalize_xbox_input(32767.0), 255);
/// ```
pub fn normalize_xbox_input(value: f32) -> u8 {
    let value = if value.is_nan() { 0.0 } else { value };
    let clamped = value.clamp(f32::from(i16::MIN), f32::from(i16::MAX));
    let output = clamped / f32::from(u16::MAX) * f32::from(u8::MAX) + f32::from(u8::MAX) / 2.0;
    output.round().clamp(0.0, f32::from(u8::MAX)) as u8
}

/// Signed 16-bit axis to `-1..=1`.
#[inline]
pub fn map_short_to_unit(value: i16) -> f32 {
    map_range(
        f32::from(value),
        f32::from(i16::MIN),
        f32::from(i16::MAX),
        -1.0,
        1.0,
    )
}

/// Cap a stick vector at unit length so diagonals do not exceed full scale.
pub fn improve_circularity(x: f32, y: f32) -> (f32, f32) {
    let nx = x / STICK_MAX;
    let ny = y / STICK_MAX;
    let length = nx.hypot(ny);
    if !length.is_finite() || length <= 1.0 {
        return (x, y);
    }
    (nx / length * STICK_MAX, ny / length * STICK_MAX)
}

/// Rotate a stick vector counter-clockwise by `degrees`.
pub fn rotate(x: f32, y: f32, degrees: f32) -> (f32, f32) {
    if degrees == 0.0 || !degrees.is_finite() {
        return (x, y);
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Negate the selected components.
#[inline]
pub fn invert(x: f32, y: f32, invert_x: bool, invert_y: bool) -> (f32, f32) {
    (
        if invert_x { -x } else { x },
        if invert_y { -y } else { y },
    )
}
