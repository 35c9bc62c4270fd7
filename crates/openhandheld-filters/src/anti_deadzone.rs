//! Anti-deadzone
//!
//! Games often apply their own stick deadzone. The anti-deadzone remaps a
//! non-zero magnitude `m` in `0..=1` to `d + (1 - d) * m`, so the first
//! output step already clears a game deadzone of `d`.

use crate::STICK_MAX;

/// Radial anti-deadzone on a stick vector; `pct` is `0..=100`.
pub fn anti_deadzone(x: f32, y: f32, pct: f32) -> (f32, f32) {
    if pct <= 0.0 || (x == 0.0 && y == 0.0) || !x.is_finite() || !y.is_finite() {
        return (x, y);
    }

    let deadzone = (pct / 100.0).clamp(0.0, 1.0);
    let nx = x / STICK_MAX;
    let ny = y / STICK_MAX;
    let length = nx.hypot(ny);
    let multiplier = ((1.0 - deadzone) * length + deadzone) / length;

    (nx * multiplier * STICK_MAX, ny * multiplier * STICK_MAX)
}

/// Anti-deadzone on a scalar with full scale `max`.
pub fn anti_deadzone_scalar(value: f32, pct: f32, max: f32) -> f32 {
    if pct <= 0.0 || value == 0.0 || max <= 0.0 || !value.is_finite() {
        return value;
    }

    let deadzone = (pct / 100.0).clamp(0.0, 1.0);
    let magnitude = (value / max).abs();
    ((1.0 - deadzone) * magnitude + deadzone) * max * value.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stays_zero() {
        assert_eq!(anti_deadzone(0.0, 0.0, 30.0), (0.0, 0.0));
        assert_eq!(anti_deadzone_scalar(0.0, 30.0, 255.0), 0.0);
    }

    #[test]
    fn test_smallest_input_clears_deadzone() {
        let (x, y) = anti_deadzone(1.0, 0.0, 25.0);
        assert!((x - 0.25 * STICK_MAX).abs() < 2.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_full_scale_is_unchanged() {
        let (x, _) = anti_deadzone(STICK_MAX, 0.0, 40.0);
        assert!((x - STICK_MAX).abs() < 1e-2);
        assert!((anti_deadzone_scalar(-255.0, 40.0, 255.0) + 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_scalar_keeps_sign() {
        assert!(anti_deadzone_scalar(-10.0, 20.0, 255.0) < -50.0);
    }
}
