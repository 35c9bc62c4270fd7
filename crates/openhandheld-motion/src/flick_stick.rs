//! Flick stick
//!
//! Pushing the stick past the threshold in one tick snaps the camera toward
//! the stick direction: the output is held at full scale for a time
//! proportional to the flick angle, with the last tick scaled to the
//! remaining fraction. While the stick stays out, rotating it sweeps the
//! camera by the change in stick angle. Small rotations are averaged over
//! a short history so stick noise does not jitter the view.

use core::f32::consts::PI;

use openhandheld_filters::{OneEuroPair, map_short_to_unit};

use crate::config::FlickStickConfig;

/// Divides the configured flick sensitivity into seconds per half turn.
pub const FLICK_FINETUNE: f32 = 62.0;

/// Sweep rotation per tick, in radians, above which no smoothing applies.
const TURN_SMOOTH_THRESHOLD: f32 = 0.1;

const SMOOTHING_SAMPLES: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct FlickStick {
    progress: f32,
    duration: f32,
    angle: f32,
    samples: [f32; SMOOTHING_SAMPLES],
    sample_index: usize,
    filter: OneEuroPair,
    last_stick: (f32, f32),
    last_filtered: (f32, f32),
}

impl Default for FlickStick {
    fn default() -> Self {
        Self {
            progress: 0.0,
            duration: 0.0,
            angle: 0.0,
            samples: [0.0; SMOOTHING_SAMPLES],
            sample_index: 0,
            filter: OneEuroPair::default(),
            last_stick: (0.0, 0.0),
            last_filtered: (0.0, 0.0),
        }
    }
}

impl FlickStick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Yaw output for one stick sample, in `-speed..=speed` for a flick.
    ///
    /// Ticks with a non-positive `delta_ms` produce nothing and leave the
    /// state untouched.
    pub fn handle(&mut self, x: i16, y: i16, delta_ms: f32, config: &FlickStickConfig) -> f32 {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0.0;
        }

        let speed = config.speed.max(1) as f32;
        let half_turn = config.flick_sensitivity / FLICK_FINETUNE * (100.0 / speed);
        let sweep_gain = config.sweep_sensitivity * (100.0 / speed);
        let delta_s = delta_ms / 1000.0;

        let stick = (map_short_to_unit(x), map_short_to_unit(y));
        let (fx, fy) = self.filter.filter(
            f64::from(stick.0),
            f64::from(stick.1),
            1.0 / f64::from(delta_ms),
        );
        let filtered = (fx as f32, fy as f32);

        let length = stick.0.hypot(stick.1);
        let last_length = self.last_stick.0.hypot(self.last_stick.1);
        let mut result = 0.0;

        if length >= config.threshold {
            let angle = stick.0.atan2(stick.1);
            if last_length < config.threshold && angle.to_degrees().abs() > config.front_deadzone {
                self.progress = 0.0;
                self.angle = angle;
                self.duration = half_turn * angle.abs() / PI;
            } else {
                let current = filtered.0.atan2(filtered.1);
                let previous = self.last_filtered.0.atan2(self.last_filtered.1);
                let change = wrap_angle(current - previous);
                result = self.tiered_smoothed(change, TURN_SMOOTH_THRESHOLD / 2.0, TURN_SMOOTH_THRESHOLD)
                    * sweep_gain;
            }
        } else if last_length >= config.threshold {
            self.samples = [0.0; SMOOTHING_SAMPLES];
        }

        if self.progress < self.duration {
            let remaining = self.duration - self.progress;
            result = if remaining > delta_s { 1.0 } else { remaining / delta_s };
            result *= sign(self.angle);
            self.progress += delta_s;
        }

        self.last_stick = stick;
        self.last_filtered = filtered;

        result * speed
    }

    /// True while a flick pulse is still being emitted.
    pub fn is_flicking(&self) -> bool {
        self.progress < self.duration
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn smoothed(&mut self, input: f32) -> f32 {
        self.sample_index = (self.sample_index + 1) % SMOOTHING_SAMPLES;
        if let Some(slot) = self.samples.get_mut(self.sample_index) {
            *slot = input;
        }
        self.samples.iter().sum::<f32>() / SMOOTHING_SAMPLES as f32
    }

    /// Pass large inputs straight through and average small ones.
    fn tiered_smoothed(&mut self, input: f32, low: f32, high: f32) -> f32 {
        let direct = ((input.abs() - low) / (high - low)).clamp(0.0, 1.0);
        input * direct + self.smoothed(input * (1.0 - direct))
    }
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wrap an angle difference into `[-PI, PI)`.
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
