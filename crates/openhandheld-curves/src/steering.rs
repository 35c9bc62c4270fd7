//! Tilt-to-stick steering response.

use serde::{Deserialize, Serialize};

use crate::CurveError;

/// Deadzone plus power curve applied to a device tilt angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringCurve {
    /// Tilt in degrees that produces full lock.
    pub max_angle: f32,
    /// Exponent applied after the deadzone.
    pub power: f32,
    /// Tilt in degrees that is ignored around center.
    pub deadzone: f32,
}

impl Default for SteeringCurve {
    fn default() -> Self {
        Self {
            max_angle: 30.0,
            power: 1.0,
            deadzone: 0.0,
        }
    }
}

impl SteeringCurve {
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidConfiguration`] when the angles or the
    /// exponent are not usable.
    pub fn validate(&self) -> Result<(), CurveError> {
        if !self.max_angle.is_finite() || self.max_angle <= 0.0 {
            return Err(CurveError::InvalidConfiguration(format!(
                "steering max angle must be positive, got {}",
                self.max_angle
            )));
        }
        if !self.deadzone.is_finite() || self.deadzone < 0.0 || self.deadzone >= self.max_angle {
            return Err(CurveError::InvalidConfiguration(format!(
                "steering deadzone must be within 0..{}, got {}",
                self.max_angle, self.deadzone
            )));
        }
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(CurveError::InvalidConfiguration(format!(
                "steering power must be positive, got {}",
                self.power
            )));
        }
        Ok(())
    }

    /// Signed `-1..=1` stick position for a tilt angle.
    pub fn position(&self, angle: f32) -> f32 {
        let pos = angle_to_joystick_pos(angle, self.max_angle, self.deadzone);
        direction_respecting_power(pos, self.power)
    }

    /// Stick X value for a tilt angle; tilting right steers left, as the
    /// device frame is mirrored against the stick frame.
    pub fn evaluate(&self, angle: f32) -> f32 {
        -(self.position(angle) * f32::from(i16::MAX))
    }
}

/// Remap `|angle|` past the deadzone onto `0..=1` of `max`, keeping the sign.
pub fn angle_to_joystick_pos(angle: f32, max: f32, deadzone: f32) -> f32 {
    if !angle.is_finite() || max <= deadzone {
        return 0.0;
    }
    let remapped = (angle.abs() - deadzone) / (max - deadzone) * max;
    let result = remapped.clamp(0.0, max) / max;
    if angle < 0.0 { -result } else { result }
}

/// `|pos|^power` with the sign of `pos`.
pub fn direction_respecting_power(pos: f32, power: f32) -> f32 {
    let result = pos.abs().powf(power);
    if pos < 0.0 { -result } else { result }
}
