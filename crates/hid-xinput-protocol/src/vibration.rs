//! `XINPUT_VIBRATION` and rumble scaling.

/// Size of `XINPUT_VIBRATION` in bytes.
pub const VIBRATION_LEN: usize = 4;

/// Motor speeds, low-frequency (left) motor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XInputVibration {
    pub left_motor_speed: u16,
    pub right_motor_speed: u16,
}

impl XInputVibration {
    pub const STOP: Self = Self {
        left_motor_speed: 0,
        right_motor_speed: 0,
    };

    /// Scale rumble bytes to motor speeds: `byte / 255 × 65535 × strength`.
    ///
    /// `strength` is clamped to `0.0..=1.0`.
    pub fn from_motors(large_motor: u8, small_motor: u8, strength: f64) -> Self {
        Self {
            left_motor_speed: motor_speed(large_motor, strength),
            right_motor_speed: motor_speed(small_motor, strength),
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self == Self::STOP
    }

    pub fn to_bytes(&self) -> [u8; VIBRATION_LEN] {
        let [l0, l1] = self.left_motor_speed.to_le_bytes();
        let [r0, r1] = self.right_motor_speed.to_le_bytes();
        [l0, l1, r0, r1]
    }
}

fn motor_speed(motor: u8, strength: f64) -> u16 {
    let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
    let speed = f64::from(motor) / f64::from(u8::MAX) * f64::from(u16::MAX) * strength;
    speed as u16
}
