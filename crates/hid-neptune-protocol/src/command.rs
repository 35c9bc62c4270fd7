//! Neptune feature report commands.
//!
//! Every command is sent as a 64-byte feature report on report ID 0. The
//! first payload byte is the command id and the second the argument length.
//!
//! # Haptic commands
//! | Command        | Id     | Payload                                          |
//! |----------------|--------|--------------------------------------------------|
//! | `SET_HAPTIC`   | `0x8F` | motor, amplitude u16, period u16, count u16      |
//! | `SET_HAPTIC2`  | `0xEA` | motor, style, 0, intensity i8, 4, 2 × timestamp  |

use std::time::Duration;

/// Feature report length, including the leading report ID.
pub const FEATURE_REPORT_LEN: usize = 65;

/// Report ID used for every feature command.
pub const FEATURE_REPORT_ID: u8 = 0x00;

/// Lizard mode re-asserts itself unless disabled this often.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Lowest `SET_HAPTIC2` intensity in dB.
pub const MIN_INTENSITY: i8 = -2;

/// Highest `SET_HAPTIC2` intensity in dB.
pub const MAX_INTENSITY: i8 = 10;

/// `SET_HAPTIC` amplitudes for short haptic ticks.
pub const HAPTIC_AMPLITUDE_LOW: u16 = 512;
pub const HAPTIC_AMPLITUDE_MEDIUM: u16 = 1024;
pub const HAPTIC_AMPLITUDE_HIGH: u16 = 2048;

pub mod ids {
    pub const CLEAR_MAPPINGS: u8 = 0x81;
    pub const GET_MAPPINGS: u8 = 0x82;
    pub const GET_ATTRIB: u8 = 0x83;
    pub const DEFAULT_MAPPINGS: u8 = 0x85;
    pub const FACTORY_RESET: u8 = 0x86;
    pub const WRITE_REGISTER: u8 = 0x87;
    pub const CLEAR_REGISTER: u8 = 0x88;
    pub const READ_REGISTER: u8 = 0x89;
    pub const SET_MODE: u8 = 0x8D;
    pub const DEFAULT_MOUSE: u8 = 0x8E;
    pub const SET_HAPTIC: u8 = 0x8F;
    pub const GET_SERIAL: u8 = 0xAE;
    pub const SET_HAPTIC2: u8 = 0xEA;
    pub const HAPTIC_RUMBLE: u8 = 0xEB;
}

/// Controller configuration registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    LeftPadMode = 0x07,
    RightPadMode = 0x08,
    RightPadMargin = 0x18,
    LedIntensity = 0x2D,
    IdleTimeout = 0x32,
    LeftPadClickPressure = 0x34,
    RightPadClickPressure = 0x35,
}

/// Pad mode register value that turns the lizard-mode cursor keys and mouse off.
pub const PAD_MODE_OFF: u16 = 0x07;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticMotor {
    Right = 0x00,
    Left = 0x01,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HapticStyle {
    Disabled = 0,
    #[default]
    Weak = 1,
    Strong = 2,
}

pub type FeatureReport = [u8; FEATURE_REPORT_LEN];

fn feature(payload: &[u8]) -> FeatureReport {
    let mut report = [0u8; FEATURE_REPORT_LEN];
    for (slot, byte) in report.iter_mut().skip(1).zip(payload) {
        *slot = *byte;
    }
    report
}

/// A command that takes no arguments.
pub fn single_command(command: u8) -> FeatureReport {
    feature(&[command, 0x00])
}

pub fn write_register(register: Register, value: u16) -> FeatureReport {
    let [lo, hi] = value.to_le_bytes();
    feature(&[ids::WRITE_REGISTER, 0x03, register as u8, lo, hi])
}

/// The commands that switch lizard mode on or off, in send order.
///
/// Turning it off clears the button mappings and disables both pad modes;
/// the controller falls back to lizard mode by itself unless this is
/// repeated every [`HEARTBEAT_INTERVAL`].
pub fn lizard_mode(enabled: bool) -> Vec<FeatureReport> {
    if enabled {
        vec![
            single_command(ids::DEFAULT_MAPPINGS),
            single_command(ids::DEFAULT_MOUSE),
        ]
    } else {
        vec![
            single_command(ids::CLEAR_MAPPINGS),
            write_register(Register::RightPadMode, PAD_MODE_OFF),
            write_register(Register::LeftPadMode, PAD_MODE_OFF),
        ]
    }
}

/// A haptic pulse train on one pad.
pub fn haptic_pulse(motor: HapticMotor, amplitude: u16, period: u16, count: u16) -> FeatureReport {
    let [a0, a1] = amplitude.to_le_bytes();
    let [p0, p1] = period.to_le_bytes();
    let [c0, c1] = count.to_le_bytes();
    feature(&[ids::SET_HAPTIC, 0x07, motor as u8, a0, a1, p0, p1, c0, c1])
}

/// A rumble step on one pad.
///
/// The two timestamps sit at payload offsets 8 and 12, after one byte of
/// alignment padding.
pub fn haptic_rumble(motor: HapticMotor, style: HapticStyle, intensity: i8, timestamp: u32) -> FeatureReport {
    let [level] = intensity.to_le_bytes();
    let [t0, t1, t2, t3] = timestamp.to_le_bytes();
    feature(&[
        ids::SET_HAPTIC2,
        0x0D,
        motor as u8,
        style as u8,
        0x00,
        level,
        0x04,
        0x00,
        t0,
        t1,
        t2,
        t3,
        t0,
        t1,
        t2,
        t3,
    ])
}

/// `SET_HAPTIC2` intensity for a rumble motor byte.
///
/// Maps `1..=255`, scaled by `strength`, linearly onto
/// [`MIN_INTENSITY`]..=[`MAX_INTENSITY`] dB and shifts it to the device
/// scale. A zero motor byte means no rumble step at all.
pub fn haptic_intensity(motor: u8, strength: f64) -> Option<i8> {
    if motor == 0 {
        return None;
    }
    let span = f64::from(MAX_INTENSITY) - f64::from(MIN_INTENSITY);
    let db = f64::from(MIN_INTENSITY) + span * f64::from(motor) * strength.clamp(0.0, 1.0) / 255.0;
    Some((db - 5.0).trunc() as i8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(report: &FeatureReport) -> &[u8] {
        report.get(1..).unwrap_or(&[])
    }

    #[test]
    fn commands_carry_report_id_zero() {
        let report = single_command(ids::CLEAR_MAPPINGS);
        assert_eq!(report.first(), Some(&FEATURE_REPORT_ID));
        assert_eq!(payload(&report).get(..2), Some(&[0x81, 0x00][..]));
        assert!(payload(&report).iter().skip(2).all(|b| *b == 0));
    }

    #[test]
    fn register_write_is_little_endian() {
        let report = write_register(Register::LeftPadClickPressure, 0xBEEF);
        assert_eq!(payload(&report).get(..5), Some(&[0x87, 0x03, 0x34, 0xEF, 0xBE][..]));
    }

    #[test]
    fn lizard_off_clears_mappings_then_pads() {
        let commands = lizard_mode(false);
        let heads: Vec<_> = commands.iter().map(|r| payload(r).get(..3).map(<[u8]>::to_vec)).collect();
        assert_eq!(
            heads,
            vec![
                Some(vec![0x81, 0x00, 0x00]),
                Some(vec![0x87, 0x03, 0x08]),
                Some(vec![0x87, 0x03, 0x07]),
            ]
        );
        assert_eq!(lizard_mode(true).len(), 2);
    }

    #[test]
    fn rumble_layout() {
        let report = haptic_rumble(HapticMotor::Left, HapticStyle::Weak, -3, 0x0102_0304);
        assert_eq!(
            payload(&report).get(..16),
            Some(&[0xEA, 0x0D, 0x01, 0x01, 0x00, 0xFD, 0x04, 0x00, 4, 3, 2, 1, 4, 3, 2, 1][..])
        );
    }

    #[test]
    fn pulse_layout() {
        let report = haptic_pulse(HapticMotor::Right, HAPTIC_AMPLITUDE_MEDIUM, 0, 1);
        assert_eq!(
            payload(&report).get(..9),
            Some(&[0x8F, 0x07, 0x00, 0x00, 0x04, 0x00, 0x00, 0x01, 0x00][..])
        );
    }

    #[test]
    fn intensity_range() {
        assert_eq!(haptic_intensity(0, 1.0), None);
        assert_eq!(haptic_intensity(255, 1.0), Some(5));
        assert_eq!(haptic_intensity(1, 1.0), Some(-6));
        assert_eq!(haptic_intensity(255, 0.0), Some(-7));
    }
}
