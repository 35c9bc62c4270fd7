//! Gravity estimation and gravity-relative gyro spaces.
//!
//! The gravity estimate is the "simple" complementary filter: every sample
//! rotates the previous estimate backwards by the gyro's rotation over the
//! tick, then nudges it a fixed step toward the measured down vector. The
//! gyro spaces below project the raw angular velocity onto axes defined by
//! that gravity vector.

use crate::math::{Quat, Vec3};

/// Step, in g, the gravity estimate moves toward the accelerometer per sample.
pub const GRAVITY_NUDGE: f32 = 0.02;

/// How far player-space yaw may exceed the world yaw component.
pub const YAW_RELAX_FACTOR: f32 = 1.41;

/// Gravity x component below which world-space pitch is not reduced.
pub const SIDE_REDUCTION_THRESHOLD: f32 = 0.125;

/// Device inclination in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceAngles {
    /// Rotation about the device X axis.
    pub x: f32,
    /// Rotation about the device Y axis; this is the steering tilt.
    pub y: f32,
}

/// Gravity vector estimate from gyro and accelerometer samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorFusion {
    gravity: Vec3,
    angles: DeviceAngles,
}

impl SensorFusion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample: angular velocity in deg/s, acceleration in g.
    ///
    /// Samples where either sensor reads all zeros are ignored; the first
    /// usable sample seeds the estimate directly from the accelerometer.
    pub fn update(&mut self, angular_velocity: Vec3, acceleration: Vec3, delta_s: f32) {
        if angular_velocity.is_zero() || acceleration.is_zero() {
            return;
        }
        if !angular_velocity.is_finite() || !acceleration.is_finite() || !delta_s.is_finite() {
            return;
        }

        let measured = -acceleration;
        if self.gravity.is_zero() {
            self.gravity = measured;
        } else {
            let omega = Vec3::new(
                angular_velocity.x.to_radians(),
                angular_velocity.y.to_radians(),
                angular_velocity.z.to_radians(),
            );
            let reverse = Quat::from_axis_angle(-omega.normalize_or_zero(), omega.length() * delta_s);
            self.gravity = reverse.rotate(self.gravity);
            self.gravity += (measured - self.gravity).normalize_or_zero() * GRAVITY_NUDGE;
        }

        self.angles = device_angles(self.gravity);
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn device_angles(&self) -> DeviceAngles {
        self.angles
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Inclination of the device from a gravity vector.
pub fn device_angles(gravity: Vec3) -> DeviceAngles {
    let g = gravity;
    DeviceAngles {
        x: -(g.y.atan2(g.x.hypot(g.z))).to_degrees(),
        y: -(g.x.atan2(g.y.hypot(g.z))).to_degrees(),
    }
}

/// Player-space `(yaw, pitch)` in deg/s.
///
/// Yaw takes its direction from the gravity-relative yaw and its magnitude
/// from the combined local yaw and roll, capped at `relax` times the world
/// component.
pub fn player_space(gyro: Vec3, gravity: Vec3, relax: f32) -> (f32, f32) {
    let g = gravity.normalize_or_zero();
    let world_yaw = gyro.y * g.y + gyro.z * g.z;
    let magnitude = (world_yaw.abs() * relax).min(gyro.y.hypot(gyro.z));
    let yaw = if world_yaw < 0.0 { -magnitude } else { magnitude };
    (yaw, gyro.x)
}

/// World-space `(yaw, pitch)` in deg/s.
///
/// Yaw is the rotation about the gravity axis. Pitch is the rotation about
/// the local X axis projected onto the horizontal plane, faded out as the
/// device is turned on its side.
pub fn world_space(gyro: Vec3, gravity: Vec3, side_reduction: f32) -> (f32, f32) {
    let up = -gravity.normalize_or_zero();
    if up.is_zero() {
        return (0.0, 0.0);
    }
    let world_yaw = -up.dot(gyro);

    let pitch_axis = (Vec3::new(1.0, 0.0, 0.0) - up * up.x).normalize_or_zero();
    let reduction = if side_reduction <= 0.0 {
        1.0
    } else {
        ((1.0 - up.x.abs()) / side_reduction).clamp(0.0, 1.0)
    };
    (world_yaw, pitch_axis.dot(gyro) * reduction)
}

/// Roll or yaw, whichever the current grip makes horizontal, plus pitch.
pub fn auto_roll_yaw_swap(gravity: Vec3, gyro: Vec3) -> (f32, f32) {
    if gravity.is_zero() {
        return (0.0, 0.0);
    }
    let g = gravity.normalize_or_zero();
    (g.z * gyro.z + g.y * gyro.y, gyro.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_gravity() {
        let mut fusion = SensorFusion::new();
        fusion.update(Vec3::new(0.1, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.01);
        assert_eq!(fusion.gravity(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn zero_sensor_is_ignored() {
        let mut fusion = SensorFusion::new();
        fusion.update(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.01);
        assert!(fusion.gravity().is_zero());
        fusion.update(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 0.01);
        assert!(fusion.gravity().is_zero());
    }

    #[test]
    fn estimate_converges_on_accelerometer() {
        let mut fusion = SensorFusion::new();
        fusion.update(Vec3::new(0.01, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.01);
        for _ in 0..200 {
            fusion.update(Vec3::new(0.01, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.01);
        }
        let g = fusion.gravity().normalize_or_zero();
        assert!((g.x + 1.0).abs() < 0.05, "{g:?}");
    }

    #[test]
    fn device_angles_flat_and_tilted() {
        let flat = device_angles(Vec3::new(0.0, 0.0, -1.0));
        assert!(flat.x.abs() < 1e-4 && flat.y.abs() < 1e-4);

        let tilted = device_angles(Vec3::new(-1.0, 0.0, 0.0));
        assert!((tilted.y - 90.0).abs() < 1e-3, "{tilted:?}");
    }

    #[test]
    fn player_space_yaw_is_capped_by_local_rate() {
        let gravity = Vec3::new(0.0, -1.0, 0.0);
        let (yaw, pitch) = player_space(Vec3::new(5.0, -20.0, 0.0), gravity, YAW_RELAX_FACTOR);
        assert!((yaw - 20.0).abs() < 1e-4);
        assert!((pitch - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn world_space_pitch_fades_on_side() {
        let upright = world_space(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0), SIDE_REDUCTION_THRESHOLD);
        assert!((upright.1 - 10.0).abs() < 1e-4);

        let side = world_space(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), SIDE_REDUCTION_THRESHOLD);
        assert!(side.1.abs() < 1e-4);
    }

    #[test]
    fn auto_swap_zero_gravity_is_zero() {
        assert_eq!(auto_roll_yaw_swap(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)), (0.0, 0.0));
        let (x, y) = auto_roll_yaw_swap(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 2.0, 3.0));
        assert!((x - 3.0).abs() < 1e-5);
        assert!((y - 1.0).abs() < f32::EPSILON);
    }
}
