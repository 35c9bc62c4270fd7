//! Joystick camera projections.

use openhandheld_curves::SteeringCurve;

use crate::config::MotionInput;
use crate::fusion::{
    SIDE_REDUCTION_THRESHOLD, SensorFusion, YAW_RELAX_FACTOR, auto_roll_yaw_swap, player_space,
    world_space,
};
use crate::math::Vec3;

/// Horizontal and vertical motion for one tick, before gains.
///
/// Camera inputs are in deg/s; steering is already in stick units.
pub fn project(input: MotionInput, gyro: Vec3, fusion: &SensorFusion, steering: &SteeringCurve) -> (f32, f32) {
    match input {
        MotionInput::LocalSpace => (gyro.z - gyro.y, gyro.x),
        MotionInput::PlayerSpace => player_space(gyro, fusion.gravity(), YAW_RELAX_FACTOR),
        MotionInput::WorldSpace => world_space(gyro, fusion.gravity(), SIDE_REDUCTION_THRESHOLD),
        MotionInput::AutoRollYawSwap => auto_roll_yaw_swap(fusion.gravity(), gyro),
        MotionInput::JoystickSteering => (steering.evaluate(fusion.device_angles().y), 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_space_mixes_yaw_and_roll() {
        let fusion = SensorFusion::new();
        let (x, y) = project(
            MotionInput::LocalSpace,
            Vec3::new(3.0, 1.0, 4.0),
            &fusion,
            &SteeringCurve::default(),
        );
        assert!((x - 3.0).abs() < f32::EPSILON);
        assert!((y - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn steering_is_centered_with_no_tilt() {
        let fusion = SensorFusion::new();
        let (x, y) = project(
            MotionInput::JoystickSteering,
            Vec3::ZERO,
            &fusion,
            &SteeringCurve::default(),
        );
        assert!(x.abs() < f32::EPSILON);
        assert!(y.abs() < f32::EPSILON);
    }
}
