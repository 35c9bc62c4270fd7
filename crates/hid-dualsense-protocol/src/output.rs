//! DualSense USB output report (report ID 0x02).
//!
//! Only the compatible-vibration path is used: lightbar, player LEDs and
//! adaptive triggers keep whatever the console-less default is.

/// USB output report length, report ID included.
pub const OUTPUT_REPORT_LEN: usize = 48;

pub const OUTPUT_REPORT_ID: u8 = 0x02;

/// `valid_flag0` bits.
pub mod flags {
    /// Motor bytes carry rumble values.
    pub const COMPATIBLE_VIBRATION: u8 = 0x01;
    /// Route rumble to the haptic actuators instead of audio haptics.
    pub const HAPTICS_SELECT: u8 = 0x02;
}

pub mod offsets {
    pub const VALID_FLAG0: usize = 1;
    pub const VALID_FLAG1: usize = 2;
    pub const MOTOR_RIGHT: usize = 3;
    pub const MOTOR_LEFT: usize = 4;
}

pub type OutputReport = [u8; OUTPUT_REPORT_LEN];

/// Build a rumble report. `large` drives the left (low frequency) actuator
/// and `small` the right one.
pub fn rumble_report(large: u8, small: u8) -> OutputReport {
    let mut report = [0u8; OUTPUT_REPORT_LEN];
    let head = [
        OUTPUT_REPORT_ID,
        flags::COMPATIBLE_VIBRATION | flags::HAPTICS_SELECT,
        0x00,
        small,
        large,
    ];
    for (slot, byte) in report.iter_mut().zip(head) {
        *slot = byte;
    }
    report
}
