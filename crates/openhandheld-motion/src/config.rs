//! Gyro binding configuration.

use openhandheld_curves::{SensitivityCurve, SteeringCurve};
use openhandheld_errors::ConfigError;
use openhandheld_input::{AxisLayoutFlags, ButtonState};
use serde::{Deserialize, Serialize};

/// Which projection of the raw gyro drives the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionInput {
    /// Angular velocity about the device axes, ignoring orientation.
    #[default]
    LocalSpace,
    /// Yaw about gravity with local pitch, relaxed toward local yaw.
    PlayerSpace,
    /// Yaw about gravity with horizontal-plane pitch.
    WorldSpace,
    /// Roll or yaw chosen by how the device is held.
    AutoRollYawSwap,
    /// Device tilt mapped to stick X through a steering curve.
    JoystickSteering,
}

/// Stick the gyro output is summed onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionOutput {
    /// Only the gyro axes are written; a layout binding may consume them.
    Disabled,
    LeftStick,
    #[default]
    RightStick,
}

impl MotionOutput {
    pub fn layout(self) -> Option<AxisLayoutFlags> {
        match self {
            Self::Disabled => None,
            Self::LeftStick => Some(AxisLayoutFlags::LeftStick),
            Self::RightStick => Some(AxisLayoutFlags::RightStick),
        }
    }
}

/// How the activation trigger gates motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Motion is off unless the trigger is held.
    Off,
    /// Motion is on unless the trigger is held.
    #[default]
    On,
    /// Each trigger press flips motion on or off.
    Toggle,
}

/// Flick stick on a physical stick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickStickConfig {
    pub enabled: bool,
    /// Stick that is consumed and turned into yaw.
    pub source: AxisLayoutFlags,
    /// Duration of a half turn, in units of 1/62 s at speed 100.
    pub flick_sensitivity: f32,
    /// Gain on stick rotation after a flick.
    pub sweep_sensitivity: f32,
    /// Normalized stick length that starts a flick.
    pub threshold: f32,
    /// Output at full flick, percent of full stick deflection.
    pub speed: u32,
    /// Flicks closer than this to straight ahead, in degrees, are ignored.
    pub front_deadzone: f32,
}

impl Default for FlickStickConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source: AxisLayoutFlags::RightStick,
            flick_sensitivity: 5.0,
            sweep_sensitivity: 5.0,
            threshold: 0.9,
            speed: 100,
            front_deadzone: 15.0,
        }
    }
}

impl FlickStickConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-stick source or a value outside its
    /// range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.source, AxisLayoutFlags::LeftStick | AxisLayoutFlags::RightStick) {
            return Err(ConfigError::invalid("flick.source", "must be a stick"));
        }
        ConfigError::check_range("flick.flick_sensitivity", f64::from(self.flick_sensitivity), 0.0, 100.0)?;
        ConfigError::check_range("flick.sweep_sensitivity", f64::from(self.sweep_sensitivity), 0.0, 100.0)?;
        ConfigError::check_range("flick.threshold", f64::from(self.threshold), 0.1, 1.0)?;
        ConfigError::check_range("flick.speed", f64::from(self.speed), 1.0, 1000.0)?;
        ConfigError::check_range("flick.front_deadzone", f64::from(self.front_deadzone), 0.0, 180.0)?;
        Ok(())
    }
}

/// One gyro binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GyroConfig {
    pub input: MotionInput,
    pub output: MotionOutput,
    pub mode: MotionMode,
    /// Buttons that gate motion according to `mode`.
    pub trigger: ButtonState,
    pub invert_horizontal: bool,
    pub invert_vertical: bool,
    /// Horizontal gain; 1.0 maps 1 deg/s to 1000 stick units.
    pub sensitivity_x: f32,
    pub sensitivity_y: f32,
    /// Anti-deadzone, percent of the gyro full-scale input.
    pub anti_deadzone: f32,
    pub curve: SensitivityCurve,
    /// Gain applied while `aiming_trigger` is held.
    pub aiming_multiplier: f32,
    pub aiming_trigger: ButtonState,
    pub steering: SteeringCurve,
    pub flick: FlickStickConfig,
}

impl Default for GyroConfig {
    fn default() -> Self {
        Self {
            input: MotionInput::default(),
            output: MotionOutput::default(),
            mode: MotionMode::default(),
            trigger: ButtonState::new(),
            invert_horizontal: false,
            invert_vertical: false,
            sensitivity_x: 1.0,
            sensitivity_y: 1.0,
            anti_deadzone: 0.0,
            curve: SensitivityCurve::default(),
            aiming_multiplier: 1.0,
            aiming_trigger: ButtonState::new(),
            steering: SteeringCurve::default(),
            flick: FlickStickConfig::default(),
        }
    }
}

impl GyroConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an out-of-range gain or an unusable
    /// steering or flick configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("gyro.sensitivity_x", f64::from(self.sensitivity_x), 0.0, 100.0)?;
        ConfigError::check_range("gyro.sensitivity_y", f64::from(self.sensitivity_y), 0.0, 100.0)?;
        ConfigError::check_range("gyro.anti_deadzone", f64::from(self.anti_deadzone), 0.0, 100.0)?;
        ConfigError::check_range("gyro.aiming_multiplier", f64::from(self.aiming_multiplier), 0.0, 10.0)?;
        self.steering
            .validate()
            .map_err(|e| ConfigError::invalid("gyro.steering", e.to_string()))?;
        self.flick.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhandheld_input::ButtonFlags;

    #[test]
    fn default_is_valid() {
        assert!(GyroConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_trigger_as_flick_source() {
        let mut config = GyroConfig::default();
        config.flick.source = AxisLayoutFlags::L2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_steering() {
        let mut config = GyroConfig::default();
        config.steering.power = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn deserializes_sparse_document() -> Result<(), serde_json::Error> {
        let json = r#"{ "input": "player_space", "mode": "toggle", "trigger": 2097152 }"#;
        let config: GyroConfig = serde_json::from_str(json)?;
        assert_eq!(config.input, MotionInput::PlayerSpace);
        assert_eq!(config.mode, MotionMode::Toggle);
        assert!(config.trigger.is_pressed(ButtonFlags::L1));
        assert_eq!(config.output, MotionOutput::RightStick);
        Ok(())
    }
}
