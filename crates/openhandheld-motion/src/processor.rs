//! Per-tick gyro processing.
//!
//! Order of operations for one tick:
//!
//! 1. Update the gravity estimate from the raw sample.
//! 2. Decide activation from [`MotionMode`](crate::MotionMode) and the trigger.
//! 3. Project the gyro onto the configured input space.
//! 4. Invert, anti-deadzone, sensitivity curve, aiming multiplier, gain.
//! 5. Add the flick stick output, if enabled.
//! 6. Write [`AxisFlags::GyroX`]/[`AxisFlags::GyroY`] and sum them onto the
//!    output stick, saturating at the `i16` range.

use openhandheld_curves::CurveLut;
use openhandheld_filters::anti_deadzone_scalar;
use openhandheld_input::{AxisFlags, AxisState, ButtonFlags, ButtonState, GyroState, saturate_i16};
use tracing::debug;

use crate::activation::MotionActivation;
use crate::camera::project;
use crate::config::{GyroConfig, MotionInput};
use crate::flick_stick::FlickStick;
use crate::fusion::SensorFusion;
use crate::math::Vec3;

/// Gyro rate, in deg/s, treated as full scale by the sensitivity curve.
pub const GYRO_MAX_INPUT: f32 = 128.0;

/// Stick units per deg/s at a sensitivity of 1.0.
pub const SENSITIVITY_SCALE: f32 = 1000.0;

/// Holding all four face buttons resets the motion state.
pub const RESET_CHORD: [ButtonFlags; 4] = [
    ButtonFlags::B1,
    ButtonFlags::B2,
    ButtonFlags::B3,
    ButtonFlags::B4,
];

/// Result of one [`GyroProcessor::process`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionFrame {
    pub active: bool,
    pub gyro_x: i16,
    pub gyro_y: i16,
}

/// Runtime state of one gyro binding.
#[derive(Debug, Clone)]
pub struct GyroProcessor {
    config: GyroConfig,
    curve: CurveLut,
    fusion: SensorFusion,
    activation: MotionActivation,
    flick: FlickStick,
    reset_chord: ButtonState,
}

impl GyroProcessor {
    pub fn new(config: GyroConfig) -> Self {
        let curve = config.curve.to_lut();
        Self {
            config,
            curve,
            fusion: SensorFusion::new(),
            activation: MotionActivation::new(),
            flick: FlickStick::new(),
            reset_chord: RESET_CHORD.into_iter().collect(),
        }
    }

    pub fn config(&self) -> &GyroConfig {
        &self.config
    }

    pub fn fusion(&self) -> &SensorFusion {
        &self.fusion
    }

    /// Swap the configuration, keeping the fusion estimate.
    pub fn set_config(&mut self, config: GyroConfig) {
        self.curve = config.curve.to_lut();
        self.config = config;
        self.activation.reset();
        self.flick.reset();
    }

    /// Process one tick and fold the result into `axes`.
    pub fn process(
        &mut self,
        buttons: &ButtonState,
        gyro: &GyroState,
        axes: &mut AxisState,
        delta_ms: f32,
    ) -> MotionFrame {
        let angular_velocity = Vec3::from_array(gyro.angular_velocity);
        let acceleration = Vec3::from_array(gyro.acceleration);
        self.fusion
            .update(angular_velocity, acceleration, delta_ms / 1000.0);

        let active = self
            .activation
            .update(self.config.mode, &self.config.trigger, buttons);

        let (mut x, y) = if active {
            self.camera(buttons, angular_velocity)
        } else {
            (0.0, 0.0)
        };

        if self.config.flick.enabled {
            let source = self.config.flick.source;
            let (sx, sy) = axes.layout(source);
            let flick = self.flick.handle(sx, sy, delta_ms, &self.config.flick);
            axes.set_layout(source, 0, 0);
            x += flick / 100.0 * f32::from(i16::MAX);
        }

        let frame = MotionFrame {
            active,
            gyro_x: saturate_i16(x),
            gyro_y: saturate_i16(y),
        };
        axes.set(AxisFlags::GyroX, frame.gyro_x);
        axes.set(AxisFlags::GyroY, frame.gyro_y);

        if let Some(target) = self.config.output.layout() {
            let (tx, ty) = axes.layout(target);
            axes.set_layout(
                target,
                tx.saturating_add(frame.gyro_x),
                ty.saturating_add(frame.gyro_y),
            );
        }

        if buttons.contains_all(&self.reset_chord) {
            debug!("Motion reset chord held, clearing gravity estimate");
            self.fusion.reset();
            self.flick.reset();
        }

        frame
    }

    fn camera(&self, buttons: &ButtonState, gyro: Vec3) -> (f32, f32) {
        let config = &self.config;
        let (mut x, mut y) = project(config.input, gyro, &self.fusion, &config.steering);

        if config.invert_horizontal {
            x = -x;
        }
        if config.invert_vertical {
            y = -y;
        }

        if config.input == MotionInput::JoystickSteering {
            return (x, y);
        }

        x = anti_deadzone_scalar(x, config.anti_deadzone, GYRO_MAX_INPUT);
        y = anti_deadzone_scalar(y, config.anti_deadzone, GYRO_MAX_INPUT);
        x *= self.curve.lookup(x.abs() / GYRO_MAX_INPUT);
        y *= self.curve.lookup(y.abs() / GYRO_MAX_INPUT);

        if buttons.intersects(&config.aiming_trigger) {
            x *= config.aiming_multiplier;
            y *= config.aiming_multiplier;
        }

        (
            x * config.sensitivity_x * SENSITIVITY_SCALE,
            y * config.sensitivity_y * SENSITIVITY_SCALE,
        )
    }
}
