//! DualShock 4 report builder.
//!
//! ## Report layout (63 bytes, the extended ViGEm DS4 report)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0..4 | 4 | LX, LY, RX, RY (byte-centered, Y grows downward) |
//! | 4 | 2 | Buttons (u16 LE): hat in bits 0..3, see [`Ds4Buttons`] |
//! | 6 | 1 | Special: PS 0x01, touchpad click 0x02 |
//! | 7 | 1 | L2 |
//! | 8 | 1 | R2 |
//! | 9 | 2 | Timestamp (u16 LE, 1/100000 s units, wrapping) |
//! | 11 | 1 | Battery level |
//! | 12 | 6 | Gyro X, Y, Z (i16 LE, ±2000 deg/s) |
//! | 18 | 6 | Accel X, Y, Z (i16 LE, ±4 g) |
//! | 29 | 1 | Battery special |
//! | 32 | 1 | Touch packet count (always 1) |
//! | 33 | 1 | Touch packet counter |
//! | 34 | 4 | Finger 1 |
//! | 38 | 4 | Finger 2 |
//!
//! Every other byte is zero.

use std::time::Duration;

use bitflags::bitflags;
use openhandheld_input::{AxisFlags, ButtonFlags, ButtonState, ControllerState};

use crate::touch::Ds4Touch;
use crate::xbox360::trigger_byte;

/// Length of a serialized DS4 report.
pub const DS4_REPORT_LEN: usize = 63;

/// Full gyro scale, deg/s.
pub const DS4_GYRO_RANGE: f32 = 2000.0;

/// Full accelerometer scale, g.
pub const DS4_ACCEL_RANGE: f32 = 4.0;

/// Microseconds per timestamp tick.
pub const DS4_TIMESTAMP_UNIT_US: u128 = 10;

/// Battery byte reported for a wired, charged pad.
pub const DS4_BATTERY_SPECIAL: u8 = 11;

const OFFSET_BUTTONS: usize = 4;
const OFFSET_SPECIAL: usize = 6;
const OFFSET_TRIGGERS: usize = 7;
const OFFSET_TIMESTAMP: usize = 9;
const OFFSET_GYRO: usize = 12;
const OFFSET_ACCEL: usize = 18;
const OFFSET_BATTERY_SPECIAL: usize = 29;
const OFFSET_TOUCH_PACKETS: usize = 32;
const OFFSET_TOUCH: usize = 33;

bitflags! {
    /// Upper 12 bits of the DS4 `wButtons` field.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Ds4Buttons: u16 {
        const SQUARE = 1 << 4;
        const CROSS = 1 << 5;
        const CIRCLE = 1 << 6;
        const TRIANGLE = 1 << 7;
        const SHOULDER_LEFT = 1 << 8;
        const SHOULDER_RIGHT = 1 << 9;
        const TRIGGER_LEFT = 1 << 10;
        const TRIGGER_RIGHT = 1 << 11;
        const SHARE = 1 << 12;
        const OPTIONS = 1 << 13;
        const THUMB_LEFT = 1 << 14;
        const THUMB_RIGHT = 1 << 15;
    }
}

bitflags! {
    /// DS4 special byte.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Ds4Special: u8 {
        const PS = 0x01;
        const TOUCHPAD = 0x02;
    }
}

/// Canonical button to DS4 button bit. The hat, PS and touchpad click are
/// handled separately.
pub const DS4_BUTTON_MAP: [(ButtonFlags, Ds4Buttons); 10] = [
    (ButtonFlags::B1, Ds4Buttons::CROSS),
    (ButtonFlags::B2, Ds4Buttons::CIRCLE),
    (ButtonFlags::B3, Ds4Buttons::SQUARE),
    (ButtonFlags::B4, Ds4Buttons::TRIANGLE),
    (ButtonFlags::Start, Ds4Buttons::OPTIONS),
    (ButtonFlags::Back, Ds4Buttons::SHARE),
    (ButtonFlags::RightStickClick, Ds4Buttons::THUMB_RIGHT),
    (ButtonFlags::LeftStickClick, Ds4Buttons::THUMB_LEFT),
    (ButtonFlags::L1, Ds4Buttons::SHOULDER_LEFT),
    (ButtonFlags::R1, Ds4Buttons::SHOULDER_RIGHT),
];

/// Hat switch value in the low nibble of `wButtons`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ds4Hat {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
    None = 8,
}

impl Ds4Hat {
    /// Diagonals win over single directions; up and down win over left and
    /// right when opposing directions are both held.
    pub fn from_buttons(buttons: &ButtonState) -> Self {
        let up = buttons.is_pressed(ButtonFlags::DPadUp);
        let down = buttons.is_pressed(ButtonFlags::DPadDown);
        let left = buttons.is_pressed(ButtonFlags::DPadLeft);
        let right = buttons.is_pressed(ButtonFlags::DPadRight);

        match (up, down, left, right) {
            (true, _, true, _) => Self::NorthWest,
            (true, _, _, true) => Self::NorthEast,
            (_, true, true, _) => Self::SouthWest,
            (_, true, _, true) => Self::SouthEast,
            (true, _, _, _) => Self::North,
            (_, true, _, _) => Self::South,
            (_, _, true, _) => Self::West,
            (_, _, _, true) => Self::East,
            _ => Self::None,
        }
    }
}

/// Map a signed stick axis onto the byte-centered DS4 range.
pub fn stick_byte(value: i16) -> u8 {
    let scaled = f32::from(value) / f32::from(u16::MAX) * 255.0 + 127.5;
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Linear map of `value` in `-range..=range` onto the `i16` range,
/// truncating toward zero.
fn scale_sensor(value: f32, range: f32) -> i16 {
    if !value.is_finite() {
        return 0;
    }
    let min = f32::from(i16::MIN);
    let span = f32::from(i16::MAX) - min;
    let mapped = min + span * ((value + range) / (2.0 * range));
    mapped.clamp(min, f32::from(i16::MAX)) as i16
}

/// Stateful DS4 report builder.
///
/// Only the touch tracker and the timestamp carry over between reports.
#[derive(Debug, Clone)]
pub struct Ds4ReportBuilder {
    touch: Ds4Touch,
    timestamp: u16,
    timestamp_step: u16,
}

impl Ds4ReportBuilder {
    /// `interval` is the time between two submitted reports.
    pub fn new(interval: Duration) -> Self {
        let step = interval.as_micros() / DS4_TIMESTAMP_UNIT_US;
        Self {
            touch: Ds4Touch::new(),
            timestamp: 0,
            timestamp_step: u16::try_from(step).unwrap_or(u16::MAX),
        }
    }

    pub fn touch(&self) -> &Ds4Touch {
        &self.touch
    }

    pub fn touch_mut(&mut self) -> &mut Ds4Touch {
        &mut self.touch
    }

    pub fn timestamp(&self) -> u16 {
        self.timestamp
    }

    pub fn build(&mut self, state: &ControllerState) -> [u8; DS4_REPORT_LEN] {
        self.touch.update(state);
        self.timestamp = self.timestamp.wrapping_add(self.timestamp_step);

        let mut report = [0u8; DS4_REPORT_LEN];
        let axes = &state.axes;
        let buttons = &state.buttons;

        let sticks = [
            stick_byte(axes.get(AxisFlags::LeftStickX)),
            u8::MAX - stick_byte(axes.get(AxisFlags::LeftStickY)),
            stick_byte(axes.get(AxisFlags::RightStickX)),
            u8::MAX - stick_byte(axes.get(AxisFlags::RightStickY)),
        ];
        write(&mut report, 0, &sticks);

        let l2 = trigger_byte(axes.get(AxisFlags::L2));
        let r2 = trigger_byte(axes.get(AxisFlags::R2));
        let mut ds4 = DS4_BUTTON_MAP
            .iter()
            .filter(|(flag, _)| buttons.is_pressed(*flag))
            .fold(Ds4Buttons::empty(), |acc, (_, bit)| acc | *bit);
        ds4.set(Ds4Buttons::TRIGGER_LEFT, l2 > 0);
        ds4.set(Ds4Buttons::TRIGGER_RIGHT, r2 > 0);
        let word = ds4.bits() | u16::from(Ds4Hat::from_buttons(buttons) as u8);
        write(&mut report, OFFSET_BUTTONS, &word.to_le_bytes());

        let mut special = Ds4Special::empty();
        special.set(Ds4Special::PS, buttons.is_pressed(ButtonFlags::Special));
        special.set(Ds4Special::TOUCHPAD, self.touch.click(state));
        write(&mut report, OFFSET_SPECIAL, &[special.bits()]);
        write(&mut report, OFFSET_TRIGGERS, &[l2, r2]);
        write(&mut report, OFFSET_TIMESTAMP, &self.timestamp.to_le_bytes());

        let [gx, gy, gz] = state.gyro.angular_velocity;
        let [ax, ay, az] = state.gyro.acceleration;
        for (i, value) in [gx, gy, gz].into_iter().enumerate() {
            let scaled = scale_sensor(value, DS4_GYRO_RANGE);
            write(&mut report, OFFSET_GYRO + i * 2, &scaled.to_le_bytes());
        }
        for (i, value) in [ax, ay, az].into_iter().enumerate() {
            let scaled = scale_sensor(value, DS4_ACCEL_RANGE);
            write(&mut report, OFFSET_ACCEL + i * 2, &scaled.to_le_bytes());
        }

        write(&mut report, OFFSET_BATTERY_SPECIAL, &[DS4_BATTERY_SPECIAL]);
        write(&mut report, OFFSET_TOUCH_PACKETS, &[1]);
        write(&mut report, OFFSET_TOUCH, &self.touch.packet());

        report
    }
}

fn write(report: &mut [u8], offset: usize, bytes: &[u8]) {
    if let Some(slot) = report.get_mut(offset..offset + bytes.len()) {
        slot.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> Ds4ReportBuilder {
        Ds4ReportBuilder::new(Duration::from_millis(10))
    }

    fn word(report: &[u8], at: usize) -> Option<[u8; 2]> {
        report.get(at..at + 2).and_then(|b| b.try_into().ok())
    }

    #[test]
    fn sticks_are_byte_centered_with_y_flipped() {
        assert_eq!(stick_byte(0), 128);
        assert_eq!(stick_byte(i16::MIN), 0);
        assert_eq!(stick_byte(i16::MAX), 255);

        let state = ControllerState::default().with_axis(AxisFlags::LeftStickY, i16::MAX);
        let report = builder().build(&state);
        assert_eq!(report.get(0..4), Some(&[128, 0, 128, 127][..]));
    }

    #[test]
    fn hat_prefers_diagonals() {
        let state = ControllerState::default()
            .with_button(ButtonFlags::DPadDown)
            .with_button(ButtonFlags::DPadRight);
        assert_eq!(Ds4Hat::from_buttons(&state.buttons), Ds4Hat::SouthEast);
        assert_eq!(Ds4Hat::from_buttons(&ButtonState::new()), Ds4Hat::None);

        let report = builder().build(&state);
        assert_eq!(report.get(4), Some(&3));
    }

    #[test]
    fn analog_triggers_set_digital_bits() {
        let state = ControllerState::default().with_axis(AxisFlags::R2, 1);
        let report = builder().build(&state);
        let buttons = word(&report, 4).map(u16::from_le_bytes);
        assert_eq!(buttons, Some(Ds4Buttons::TRIGGER_RIGHT.bits() | Ds4Hat::None as u16));
        assert_eq!(report.get(8), Some(&1));
    }

    #[test]
    fn timestamp_advances_per_report() {
        let mut builder = builder();
        builder.build(&ControllerState::default());
        builder.build(&ControllerState::default());
        assert_eq!(builder.timestamp(), 2000);
    }

    #[test]
    fn timestamp_wraps() {
        let mut builder = Ds4ReportBuilder::new(Duration::from_millis(300));
        for _ in 0..3 {
            builder.build(&ControllerState::default());
        }
        assert_eq!(builder.timestamp(), (90_000u32 % 65_536) as u16);
    }

    #[test]
    fn sensors_scale_to_full_range() {
        let mut state = ControllerState::default();
        state.gyro.set_gyroscope(2000.0, -2000.0, 0.0);
        state.gyro.set_accelerometer(0.0, 0.0, 1.0);
        let report = builder().build(&state);

        let read = |at: usize| word(&report, at).map(i16::from_le_bytes);
        assert_eq!(read(12), Some(i16::MAX));
        assert_eq!(read(14), Some(i16::MIN));
        assert_eq!(read(16), Some(0));
        assert_eq!(read(22), Some(8191));
    }

    #[test]
    fn touchpad_click_sets_special_bit() {
        let state = ControllerState::default()
            .with_button(ButtonFlags::RightPadClick)
            .with_button(ButtonFlags::Special);
        let report = builder().build(&state);
        assert_eq!(report.get(6), Some(&0x03));
    }

    #[test]
    fn fixed_bytes_are_set() {
        let report = builder().build(&ControllerState::default());
        assert_eq!(report.get(29), Some(&DS4_BATTERY_SPECIAL));
        assert_eq!(report.get(32), Some(&1));
        assert_eq!(report.get(34), Some(&0x81));
        assert_eq!(report.get(38), Some(&0x82));
    }
}
