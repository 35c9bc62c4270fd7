//! Motion sensor snapshot.

use serde::{Deserialize, Serialize};

/// One motion sample: angular velocity in deg/s, acceleration in g and an
/// optional orientation quaternion `[x, y, z, w]` when the device fuses one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GyroState {
    pub angular_velocity: [f32; 3],
    pub acceleration: [f32; 3],
    pub quaternion: Option<[f32; 4]>,
}

impl GyroState {
    pub fn set_gyroscope(&mut self, x: f32, y: f32, z: f32) {
        self.angular_velocity = [x, y, z];
    }

    pub fn set_accelerometer(&mut self, x: f32, y: f32, z: f32) {
        self.acceleration = [x, y, z];
    }

    pub fn set_quaternion(&mut self, quaternion: Option<[f32; 4]>) {
        self.quaternion = quaternion;
    }

    /// True when no sensor has reported anything yet.
    pub fn is_idle(&self) -> bool {
        self.angular_velocity.iter().all(|v| v.abs() < f32::EPSILON)
            && self.acceleration.iter().all(|v| v.abs() < f32::EPSILON)
    }
}
