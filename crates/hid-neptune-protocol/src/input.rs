//! Neptune input report parsing (64-byte report, event type 0x09).
//!
//! # Report layout
//! | Offset | Size | Field              | Encoding                        |
//! |--------|------|--------------------|---------------------------------|
//! | 0      | u8   | packet type        | always `0x01`                   |
//! | 1      | u8   | reserved           | always `0x00`                   |
//! | 2      | u8   | event type         | `0x09` for deck input           |
//! | 3      | u8   | payload length     |                                 |
//! | 4–7    | u32  | sequence           | LE                              |
//! | 8–14   | bits | buttons            | see [`NeptuneButtons`]          |
//! | 16–19  | i16×2| left pad X/Y       | LE, valid while touched         |
//! | 20–23  | i16×2| right pad X/Y      | LE, valid while touched         |
//! | 24–29  | i16×3| accel X/Y/Z        | LE, ±2 g full scale             |
//! | 30–35  | i16×3| gyro pitch/yaw/roll| LE, ±2000 °/s full scale        |
//! | 36–43  | i16×4| orientation quat   | LE                              |
//! | 44–47  | i16×2| L2/R2              | LE, 0–32767                     |
//! | 48–55  | i16×4| LX/LY/RX/RY        | LE, Y up positive               |
//! | 56–59  | i16×2| pad pressure L/R   | LE                              |

use bitflags::bitflags;
use openhandheld_hid_common::ReportView;

/// Input report length in bytes.
pub const REPORT_LEN: usize = 64;

/// First byte of every controller report.
pub const PACKET_TYPE: u8 = 0x01;

/// Event type of deck input reports.
pub const EVENT_DECK_INPUT: u8 = 0x09;

/// Event type of the legacy Steam Controller input report.
pub const EVENT_INPUT: u8 = 0x01;

pub const EVENT_CONNECT: u8 = 0x03;

pub const EVENT_BATTERY: u8 = 0x04;

/// Bytes needed to classify a report.
pub const HEADER_LEN: usize = 3;

/// Pad coordinate beyond which a pad click counts as directional.
pub const PAD_INNER_THRESHOLD: i16 = 21844;

/// Accelerometer full-scale range in g.
pub const ACCEL_RANGE_G: f32 = 2.0;

/// Gyroscope full-scale range in deg/s.
pub const GYRO_RANGE_DPS: f32 = 2000.0;

/// Field offsets from the start of the report.
pub mod offsets {
    pub const SEQUENCE: usize = 4;
    pub const BUTTONS: usize = 8;
    pub const LEFT_PAD: usize = 16;
    pub const RIGHT_PAD: usize = 20;
    pub const ACCEL: usize = 24;
    pub const GYRO: usize = 30;
    pub const QUATERNION: usize = 36;
    pub const TRIGGERS: usize = 44;
    pub const LEFT_STICK: usize = 48;
    pub const RIGHT_STICK: usize = 52;
    pub const PAD_PRESSURE: usize = 56;
}

use offsets::*;

bitflags! {
    /// Button bits, read as one little-endian word from bytes 8–15.
    ///
    /// Bit `n` is bit `n % 8` of byte `8 + n / 8`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NeptuneButtons: u64 {
        const R2 = 1 << 0;
        const L2 = 1 << 1;
        const R1 = 1 << 2;
        const L1 = 1 << 3;
        const Y = 1 << 4;
        const B = 1 << 5;
        const X = 1 << 6;
        const A = 1 << 7;

        const DPAD_UP = 1 << 8;
        const DPAD_RIGHT = 1 << 9;
        const DPAD_LEFT = 1 << 10;
        const DPAD_DOWN = 1 << 11;
        const MENU = 1 << 12;
        const STEAM = 1 << 13;
        const OPTIONS = 1 << 14;
        const L5 = 1 << 15;

        const R5 = 1 << 16;
        const LEFT_PAD_PRESS = 1 << 17;
        const RIGHT_PAD_PRESS = 1 << 18;
        const LEFT_PAD_TOUCH = 1 << 19;
        const RIGHT_PAD_TOUCH = 1 << 20;
        const LEFT_STICK_PRESS = 1 << 22;

        const RIGHT_STICK_PRESS = 1 << 26;

        const L4 = 1 << 41;
        const R4 = 1 << 42;
        const LEFT_STICK_TOUCH = 1 << 46;
        const RIGHT_STICK_TOUCH = 1 << 47;

        const QUICK_ACCESS = 1 << 50;
    }
}

/// Decoded deck input report. Values are raw device units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeptuneInputReport {
    pub sequence: u32,
    pub buttons: NeptuneButtons,
    /// `[x, y]`.
    pub left_pad: [i16; 2],
    pub right_pad: [i16; 2],
    /// `[x, y, z]`.
    pub accel: [i16; 3],
    /// `[pitch, yaw, roll]` in wire order.
    pub gyro: [i16; 3],
    pub quaternion: [i16; 4],
    pub left_trigger: i16,
    pub right_trigger: i16,
    /// `[x, y]`.
    pub left_stick: [i16; 2],
    pub right_stick: [i16; 2],
    pub left_pad_pressure: i16,
    pub right_pad_pressure: i16,
}

impl NeptuneInputReport {
    pub fn is_pressed(&self, button: NeptuneButtons) -> bool {
        self.buttons.contains(button)
    }

    /// Left trigger scaled to a byte.
    pub fn left_trigger_byte(&self) -> u8 {
        trigger_to_byte(self.left_trigger)
    }

    pub fn right_trigger_byte(&self) -> u8 {
        trigger_to_byte(self.right_trigger)
    }
}

/// Errors returned by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer bytes than the report header.
    TooShort { got: usize, need: usize },
    /// Not a deck input report; connect and battery events land here.
    UnexpectedHeader { packet_type: u8, event: u8 },
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::TooShort { got, need } => {
                write!(f, "report too short: got {got} bytes, need {need}")
            }
            ParseError::UnexpectedHeader { packet_type, event } => {
                write!(
                    f,
                    "not a deck input report: packet type 0x{packet_type:02X}, event 0x{event:02X}"
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a raw deck input report.
///
/// The header must identify a deck input event. A report cut short after
/// the header still decodes; the missing fields read as zero.
pub fn parse(data: &[u8]) -> Result<NeptuneInputReport, ParseError> {
    if data.len() < HEADER_LEN {
        return Err(ParseError::TooShort {
            got: data.len(),
            need: HEADER_LEN,
        });
    }

    let view = ReportView::new(data);
    let packet_type = view.u8_at(0);
    let event = view.u8_at(2);
    if packet_type != PACKET_TYPE || view.u8_at(1) != 0 || event != EVENT_DECK_INPUT {
        return Err(ParseError::UnexpectedHeader { packet_type, event });
    }

    let buttons = (0..8).fold(0u64, |bits, i| {
        bits | u64::from(view.u8_at(BUTTONS + i)) << (8 * i)
    });
    let pair = |offset: usize| [view.i16_le_at(offset), view.i16_le_at(offset + 2)];
    let triple = |offset: usize| {
        [
            view.i16_le_at(offset),
            view.i16_le_at(offset + 2),
            view.i16_le_at(offset + 4),
        ]
    };

    Ok(NeptuneInputReport {
        sequence: view.u32_le_at(SEQUENCE),
        buttons: NeptuneButtons::from_bits_truncate(buttons),
        left_pad: pair(LEFT_PAD),
        right_pad: pair(RIGHT_PAD),
        accel: triple(ACCEL),
        gyro: triple(GYRO),
        quaternion: [
            view.i16_le_at(QUATERNION),
            view.i16_le_at(QUATERNION + 2),
            view.i16_le_at(QUATERNION + 4),
            view.i16_le_at(QUATERNION + 6),
        ],
        left_trigger: view.i16_le_at(TRIGGERS),
        right_trigger: view.i16_le_at(TRIGGERS + 2),
        left_stick: pair(LEFT_STICK),
        right_stick: pair(RIGHT_STICK),
        left_pad_pressure: view.i16_le_at(PAD_PRESSURE),
        right_pad_pressure: view.i16_le_at(PAD_PRESSURE + 2),
    })
}

/// Scale a 0–32767 trigger to 0–255. Negative readings clamp to zero.
pub fn trigger_to_byte(raw: i16) -> u8 {
    let scaled = i32::from(raw.max(0)) * i32::from(u8::MAX) / i32::from(i16::MAX);
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> [u8; REPORT_LEN] {
        let mut data = [0u8; REPORT_LEN];
        put(&mut data, 0, PACKET_TYPE);
        put(&mut data, 2, EVENT_DECK_INPUT);
        put(&mut data, 3, 0x3C);
        data
    }

    fn put(data: &mut [u8], offset: usize, value: u8) {
        if let Some(slot) = data.get_mut(offset) {
            *slot = value;
        }
    }

    fn put_i16(data: &mut [u8], offset: usize, value: i16) {
        if let Some(slot) = data.get_mut(offset..offset + 2) {
            slot.copy_from_slice(&value.to_le_bytes());
        }
    }

    #[test]
    fn rejects_short_header() {
        assert_eq!(parse(&[1, 0]), Err(ParseError::TooShort { got: 2, need: 3 }));
    }

    #[test]
    fn rejects_other_events() {
        let mut data = report();
        put(&mut data, 2, EVENT_BATTERY);
        assert_eq!(
            parse(&data),
            Err(ParseError::UnexpectedHeader {
                packet_type: 1,
                event: EVENT_BATTERY
            })
        );

        let mut data = report();
        put(&mut data, 1, 1);
        assert!(parse(&data).is_err());
    }

    #[test]
    fn neutral_report_is_default() -> Result<(), ParseError> {
        assert_eq!(parse(&report())?, NeptuneInputReport::default());
        Ok(())
    }

    #[test]
    fn decodes_buttons_across_bytes() -> Result<(), ParseError> {
        let mut data = report();
        put(&mut data, 8, 0x80);
        put(&mut data, 9, 0x20);
        put(&mut data, 11, 0x04);
        put(&mut data, 13, 0x06);
        put(&mut data, 14, 0x04);
        let parsed = parse(&data)?;
        assert_eq!(
            parsed.buttons,
            NeptuneButtons::A
                | NeptuneButtons::STEAM
                | NeptuneButtons::RIGHT_STICK_PRESS
                | NeptuneButtons::L4
                | NeptuneButtons::R4
                | NeptuneButtons::QUICK_ACCESS
        );
        Ok(())
    }

    #[test]
    fn decodes_axes() -> Result<(), ParseError> {
        let mut data = report();
        put_i16(&mut data, LEFT_PAD, -100);
        put_i16(&mut data, RIGHT_PAD + 2, 200);
        put_i16(&mut data, ACCEL + 4, 16384);
        put_i16(&mut data, GYRO + 2, -32767);
        put_i16(&mut data, TRIGGERS, i16::MAX);
        put_i16(&mut data, LEFT_STICK + 2, 12345);
        put_i16(&mut data, RIGHT_STICK, -1);
        put_i16(&mut data, PAD_PRESSURE + 2, 700);
        let parsed = parse(&data)?;
        assert_eq!(parsed.left_pad, [-100, 0]);
        assert_eq!(parsed.right_pad, [0, 200]);
        assert_eq!(parsed.accel, [0, 0, 16384]);
        assert_eq!(parsed.gyro, [0, -32767, 0]);
        assert_eq!(parsed.left_trigger_byte(), 255);
        assert_eq!(parsed.left_stick, [0, 12345]);
        assert_eq!(parsed.right_stick, [-1, 0]);
        assert_eq!(parsed.right_pad_pressure, 700);
        Ok(())
    }

    #[test]
    fn truncated_report_reads_zero() -> Result<(), ParseError> {
        let mut data = report();
        put_i16(&mut data, LEFT_STICK, 5000);
        let parsed = parse(data.get(..49).unwrap_or(&[]))?;
        assert_eq!(parsed.left_stick, [0x88, 0]);
        Ok(())
    }

    #[test]
    fn trigger_scaling() {
        assert_eq!(trigger_to_byte(0), 0);
        assert_eq!(trigger_to_byte(-500), 0);
        assert_eq!(trigger_to_byte(16384), 127);
        assert_eq!(trigger_to_byte(i16::MAX), 255);
    }
}
