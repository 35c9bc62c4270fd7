//! Raw IMU words to physical units.
//!
//! Each device reports its gyroscope and accelerometer in its own axis order,
//! polarity and full-scale range. A [`SensorScale`] records those for one
//! device so that the canonical [`GyroState`](openhandheld_input::GyroState)
//! is always in deg/s and g with the same axis convention:
//!
//! | Axis | Gyroscope | Accelerometer |
//! |------|-----------|---------------|
//! | X    | pitch     | right         |
//! | Y    | roll      | forward       |
//! | Z    | yaw (negated) | up        |
//!
//! The presets hold each vendor's published ranges. The service
//! configuration can replace any of them per device.

use openhandheld_errors::ConfigError;
use serde::{Deserialize, Serialize};

use handheld_hid_legion_protocol as legion;
use handheld_hid_neptune_protocol as neptune;
use handheld_hid_dualsense_protocol as dualsense;

/// One of the three raw words of an IMU sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawAxis {
    X,
    Y,
    Z,
}

impl RawAxis {
    fn pick(self, raw: [i16; 3]) -> i16 {
        let [x, y, z] = raw;
        match self {
            Self::X => x,
            Self::Y => y,
            Self::Z => z,
        }
    }
}

/// Where one canonical axis is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisMap {
    pub from: RawAxis,
    #[serde(default)]
    pub invert: bool,
}

impl AxisMap {
    pub const fn new(from: RawAxis, invert: bool) -> Self {
        Self { from, invert }
    }

    fn signed(from: RawAxis, sign: f32) -> Self {
        Self::new(from, sign < 0.0)
    }
}

const IDENTITY: [AxisMap; 3] = [
    AxisMap::new(RawAxis::X, false),
    AxisMap::new(RawAxis::Y, false),
    AxisMap::new(RawAxis::Z, false),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorScale {
    /// Rate, in deg/s, that a raw word of `i16::MAX` stands for.
    pub gyro_range_dps: f32,
    /// Acceleration, in g, that a raw word of `i16::MAX` stands for.
    pub accel_range_g: f32,
    pub gyro: [AxisMap; 3],
    pub accel: [AxisMap; 3],
}

impl Default for SensorScale {
    fn default() -> Self {
        Self {
            gyro_range_dps: 2000.0,
            accel_range_g: 4.0,
            gyro: IDENTITY,
            accel: IDENTITY,
        }
    }
}

impl SensorScale {
    /// Steam Deck: gyro words arrive as `[pitch, yaw, roll]`.
    pub fn neptune() -> Self {
        Self {
            gyro_range_dps: neptune::GYRO_RANGE_DPS,
            accel_range_g: neptune::ACCEL_RANGE_G,
            gyro: [
                AxisMap::new(RawAxis::X, false),
                AxisMap::new(RawAxis::Z, false),
                AxisMap::new(RawAxis::Y, true),
            ],
            accel: [
                AxisMap::new(RawAxis::X, false),
                AxisMap::new(RawAxis::Z, false),
                AxisMap::new(RawAxis::Y, true),
            ],
        }
    }

    /// Legion Go joycon. The protocol crate has already reordered the words
    /// to `[x, y, z]`; the two sides differ only in polarity.
    pub fn legion(side: legion::ImuSide) -> Self {
        let (accel_sign, gyro_sign) = match side {
            legion::ImuSide::Left => (legion::LEFT_ACCEL_SIGN, legion::LEFT_GYRO_SIGN),
            legion::ImuSide::Right => (legion::RIGHT_ACCEL_SIGN, legion::RIGHT_GYRO_SIGN),
        };
        let [ax, ay, az] = accel_sign;
        let [gx, gy, gz] = gyro_sign;
        Self {
            gyro_range_dps: legion::GYRO_RANGE_DPS,
            accel_range_g: legion::ACCEL_RANGE_G,
            gyro: [
                AxisMap::signed(RawAxis::X, gx),
                AxisMap::signed(RawAxis::Y, gy),
                AxisMap::signed(RawAxis::Z, gz),
            ],
            accel: [
                AxisMap::signed(RawAxis::X, ax),
                AxisMap::signed(RawAxis::Y, ay),
                AxisMap::signed(RawAxis::Z, az),
            ],
        }
    }

    pub fn dualsense() -> Self {
        Self {
            gyro_range_dps: dualsense::GYRO_RANGE_DPS,
            accel_range_g: dualsense::ACCEL_RANGE_G,
            gyro: IDENTITY,
            accel: IDENTITY,
        }
    }

    /// Angular velocity in deg/s.
    pub fn gyro(&self, raw: [i16; 3]) -> [f32; 3] {
        convert(raw, self.gyro, self.gyro_range_dps)
    }

    /// Acceleration in g.
    pub fn accel(&self, raw: [i16; 3]) -> [f32; 3] {
        convert(raw, self.accel, self.accel_range_g)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive range or a mapping that
    /// reads the same raw word twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("sensor.gyro_range_dps", f64::from(self.gyro_range_dps), 1.0, 8000.0)?;
        ConfigError::check_range("sensor.accel_range_g", f64::from(self.accel_range_g), 0.5, 32.0)?;
        for (name, maps) in [("sensor.gyro", self.gyro), ("sensor.accel", self.accel)] {
            let [a, b, c] = maps;
            if a.from == b.from || a.from == c.from || b.from == c.from {
                return Err(ConfigError::invalid(name, "each raw axis must be used once"));
            }
        }
        Ok(())
    }
}

fn convert(raw: [i16; 3], maps: [AxisMap; 3], range: f32) -> [f32; 3] {
    maps.map(|map| {
        let value = f32::from(map.from.pick(raw)) * range / f32::from(i16::MAX);
        if map.invert { -value } else { value }
    })
}

/// Per-device replacements for the presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorOverrides {
    pub neptune: Option<SensorScale>,
    pub legion_left: Option<SensorScale>,
    pub legion_right: Option<SensorScale>,
    pub dualsense: Option<SensorScale>,
}

impl SensorOverrides {
    pub fn neptune(&self) -> SensorScale {
        self.neptune.unwrap_or_else(SensorScale::neptune)
    }

    pub fn legion(&self, side: legion::ImuSide) -> SensorScale {
        let custom = match side {
            legion::ImuSide::Left => self.legion_left,
            legion::ImuSide::Right => self.legion_right,
        };
        custom.unwrap_or_else(|| SensorScale::legion(side))
    }

    pub fn dualsense(&self) -> SensorScale {
        self.dualsense.unwrap_or_else(SensorScale::dualsense)
    }

    /// # Errors
    ///
    /// Returns the first invalid override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        [self.neptune, self.legion_left, self.legion_right, self.dualsense]
            .iter()
            .flatten()
            .try_for_each(SensorScale::validate)
    }
}
