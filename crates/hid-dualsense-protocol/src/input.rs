//! DualSense USB input report parsing (64 bytes, report ID 0x01).
//!
//! # Report layout
//! | Offset | Size  | Field            | Encoding                           |
//! |--------|-------|------------------|------------------------------------|
//! | 0      | u8    | report ID        | `0x01`                             |
//! | 1–4    | u8×4  | LX, LY, RX, RY   | 0–255, 128 centre, Y down positive |
//! | 5–6    | u8×2  | L2, R2           | 0–255                              |
//! | 7      | u8    | sequence         |                                    |
//! | 8      | bits  | hat + face       | hat in low nibble, see [`Hat`]     |
//! | 9–10   | bits  | buttons          | see [`DualSenseButtons`]           |
//! | 16–21  | i16×3 | gyro X/Y/Z       | LE, ±2000 °/s full scale           |
//! | 22–27  | i16×3 | accel X/Y/Z      | LE, ±4 g full scale                |
//! | 28–31  | u32   | sensor timestamp | LE, 0.33 µs units                  |
//! | 33–36  | 4     | touch point 0    | see [`TouchContact`]               |
//! | 37–40  | 4     | touch point 1    | see [`TouchContact`]               |
//! | 53     | u8    | battery          | low nibble, 0–10                   |

use bitflags::bitflags;
use openhandheld_hid_common::ReportView;

pub const REPORT_LEN: usize = 64;

pub const REPORT_ID: u8 = 0x01;

/// Touchpad resolution.
pub const TOUCHPAD_WIDTH: u16 = 1920;
pub const TOUCHPAD_HEIGHT: u16 = 1080;

/// Gyroscope full-scale range in deg/s.
pub const GYRO_RANGE_DPS: f32 = 2000.0;

/// Accelerometer full-scale range in g.
pub const ACCEL_RANGE_G: f32 = 4.0;

/// Field offsets from the report ID byte.
pub mod offsets {
    pub const LEFT_STICK: usize = 1;
    pub const RIGHT_STICK: usize = 3;
    pub const TRIGGERS: usize = 5;
    pub const SEQUENCE: usize = 7;
    pub const BUTTONS: usize = 8;
    pub const GYRO: usize = 16;
    pub const ACCEL: usize = 22;
    pub const SENSOR_TIMESTAMP: usize = 28;
    pub const TOUCH: [usize; 2] = [33, 37];
    pub const BATTERY: usize = 53;
}

use offsets::*;

bitflags! {
    /// Buttons from bytes 8–10 as one little-endian word, hat nibble excluded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DualSenseButtons: u32 {
        const SQUARE = 1 << 4;
        const CROSS = 1 << 5;
        const CIRCLE = 1 << 6;
        const TRIANGLE = 1 << 7;
        const L1 = 1 << 8;
        const R1 = 1 << 9;
        const L2 = 1 << 10;
        const R2 = 1 << 11;
        const CREATE = 1 << 12;
        const OPTIONS = 1 << 13;
        const L3 = 1 << 14;
        const R3 = 1 << 15;
        const PS = 1 << 16;
        const TOUCHPAD = 1 << 17;
        const MUTE = 1 << 18;
    }
}

/// D-pad hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hat {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Neutral,
}

impl Hat {
    pub fn from_nibble(value: u8) -> Self {
        match value & 0x0F {
            0 => Self::Up,
            1 => Self::UpRight,
            2 => Self::Right,
            3 => Self::DownRight,
            4 => Self::Down,
            5 => Self::DownLeft,
            6 => Self::Left,
            7 => Self::UpLeft,
            _ => Self::Neutral,
        }
    }

    pub fn up(self) -> bool {
        matches!(self, Self::Up | Self::UpRight | Self::UpLeft)
    }

    pub fn down(self) -> bool {
        matches!(self, Self::Down | Self::DownRight | Self::DownLeft)
    }

    pub fn left(self) -> bool {
        matches!(self, Self::Left | Self::UpLeft | Self::DownLeft)
    }

    pub fn right(self) -> bool {
        matches!(self, Self::Right | Self::UpRight | Self::DownRight)
    }
}

/// One touchpad contact.
///
/// Wire form: `[contact, x lo, x hi | y lo << 4, y hi]`, where bit 7 of
/// `contact` is set while the finger is lifted and the low seven bits count
/// touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchContact {
    pub active: bool,
    pub id: u8,
    pub x: u16,
    pub y: u16,
}

impl TouchContact {
    pub fn unpack(bytes: [u8; 4]) -> Self {
        let [contact, b1, b2, b3] = bytes;
        Self {
            active: contact & 0x80 == 0,
            id: contact & 0x7F,
            x: u16::from(b1) | (u16::from(b2 & 0x0F) << 8),
            y: u16::from(b2 >> 4) | (u16::from(b3) << 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DualSenseInputReport {
    /// `[x, y]`, raw bytes.
    pub left_stick: [u8; 2],
    pub right_stick: [u8; 2],
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub sequence: u8,
    pub hat: Hat,
    pub buttons: DualSenseButtons,
    /// `[x, y, z]`.
    pub gyro: [i16; 3],
    pub accel: [i16; 3],
    pub sensor_timestamp: u32,
    pub touch: [TouchContact; 2],
    /// Charge level, 0–10.
    pub battery: u8,
}

impl DualSenseInputReport {
    pub fn is_pressed(&self, button: DualSenseButtons) -> bool {
        self.buttons.contains(button)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { got: usize, need: usize },
    WrongReportId { got: u8 },
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::TooShort { got, need } => {
                write!(f, "report too short: got {got} bytes, need {need}")
            }
            ParseError::WrongReportId { got } => {
                write!(f, "unexpected report id 0x{got:02X}, expected 0x{REPORT_ID:02X}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a USB input report, report ID included.
///
/// Fields past the end of a short report read as neutral: sticks centred,
/// hat released, everything else zero.
pub fn parse(data: &[u8]) -> Result<DualSenseInputReport, ParseError> {
    let Some(&report_id) = data.first() else {
        return Err(ParseError::TooShort { got: 0, need: 1 });
    };
    if report_id != REPORT_ID {
        return Err(ParseError::WrongReportId { got: report_id });
    }

    let view = ReportView::new(data);
    let stick = |offset: usize| -> u8 {
        if view.has(offset, 1) {
            view.u8_at(offset)
        } else {
            0x80
        }
    };
    let hat = if view.has(BUTTONS, 1) {
        Hat::from_nibble(view.u8_at(BUTTONS))
    } else {
        Hat::Neutral
    };
    let buttons = u32::from(view.u8_at(BUTTONS) & 0xF0)
        | u32::from(view.u8_at(BUTTONS + 1)) << 8
        | u32::from(view.u8_at(BUTTONS + 2)) << 16;
    let triple = |offset: usize| {
        [
            view.i16_le_at(offset),
            view.i16_le_at(offset + 2),
            view.i16_le_at(offset + 4),
        ]
    };
    let touch = TOUCH.map(|offset| {
        TouchContact::unpack([
            view.u8_at(offset),
            view.u8_at(offset + 1),
            view.u8_at(offset + 2),
            view.u8_at(offset + 3),
        ])
    });

    Ok(DualSenseInputReport {
        left_stick: [stick(LEFT_STICK), stick(LEFT_STICK + 1)],
        right_stick: [stick(RIGHT_STICK), stick(RIGHT_STICK + 1)],
        left_trigger: view.u8_at(TRIGGERS),
        right_trigger: view.u8_at(TRIGGERS + 1),
        sequence: view.u8_at(SEQUENCE),
        hat,
        buttons: DualSenseButtons::from_bits_truncate(buttons),
        gyro: triple(GYRO),
        accel: triple(ACCEL),
        sensor_timestamp: view.u32_le_at(SENSOR_TIMESTAMP),
        touch,
        battery: (view.u8_at(BATTERY) & 0x0F).min(10),
    })
}

/// Map a byte-centred stick axis onto the full `i16` range.
pub fn axis_from_byte(value: u8) -> i16 {
    let wide = i32::from(value) * 257 - 32768;
    i16::try_from(wide).unwrap_or(i16::MAX)
}

/// As [`axis_from_byte`], mirrored, for Y axes that grow downward.
///
/// The mirror is `-1 - x`, so the byte centre 0x80 lands at -129 where the
/// plain mapping gives +128.
pub fn inverted_axis_from_byte(value: u8) -> i16 {
    !axis_from_byte(value)
}
