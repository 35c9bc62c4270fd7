//! Legion Go vendor input report parsing.
//!
//! Offsets are into the report with its leading report ID removed; see
//! [`strip_report_id`]. Multi-byte fields are big-endian.
//!
//! # Report layout
//! | Offset | Size  | Field                    | Encoding                       |
//! |--------|-------|--------------------------|--------------------------------|
//! | 1      | u8    | status                   | `25` or `60` when ready        |
//! | 11     | u8    | left controller link     | 2 wired, 3 wireless            |
//! | 12     | u8    | right controller link    | 2 wired, 3 wireless            |
//! | 17     | bits  | front buttons            | see [`LegionFront`]            |
//! | 19     | bits  | back buttons             | see [`LegionBack`]             |
//! | 20     | u8    | scroll click             | `128` while pressed            |
//! | 24     | u8    | scroll wheel             | `129` up, `255` down           |
//! | 25–28  | u16×2 | touchpad X/Y             | BE, 0–1000, 0/0 = untouched    |
//! | 34–45  | i16×6 | left IMU accel, gyro     | BE, X Z Y order each           |
//! | 47–58  | i16×6 | right IMU accel, gyro    | BE, Z X Y order each           |

use bitflags::bitflags;
use openhandheld_hid_common::ReportView;

/// Vendor report length in bytes, report ID removed.
pub const REPORT_LEN: usize = 64;

/// Status bytes reported once the controllers are attached and streaming.
pub const READY_STATES: [u8; 2] = [25, 60];

/// Touchpad coordinate range, both axes.
pub const TOUCHPAD_MAX: u16 = 1000;

pub const SCROLL_CLICK_PRESSED: u8 = 128;
pub const SCROLL_UP: u8 = 129;
pub const SCROLL_DOWN: u8 = 255;

/// Accelerometer full-scale range in g.
pub const ACCEL_RANGE_G: f32 = 4.0;

/// Gyroscope full-scale range in deg/s.
pub const GYRO_RANGE_DPS: f32 = 2000.0;

/// Per-axis signs that bring each joycon's IMU into the common frame,
/// `[x, y, z]`.
pub const LEFT_ACCEL_SIGN: [f32; 3] = [-1.0, -1.0, -1.0];
pub const LEFT_GYRO_SIGN: [f32; 3] = [-1.0, -1.0, -1.0];
pub const RIGHT_ACCEL_SIGN: [f32; 3] = [-1.0, -1.0, 1.0];
pub const RIGHT_GYRO_SIGN: [f32; 3] = [-1.0, -1.0, 1.0];

/// Bytes needed before anything can be decoded.
pub const MIN_LEN: usize = 2;

/// Field offsets, report ID removed.
pub mod offsets {
    pub const STATUS: usize = 1;
    pub const LEFT_LINK: usize = 11;
    pub const RIGHT_LINK: usize = 12;
    pub const FRONT: usize = 17;
    pub const BACK: usize = 19;
    pub const SCROLL_CLICK: usize = 20;
    pub const SCROLL_WHEEL: usize = 24;
    pub const TOUCH_X: usize = 25;
    pub const TOUCH_Y: usize = 27;

    pub const LEFT_ACCEL_X: usize = 34;
    pub const LEFT_ACCEL_Z: usize = 36;
    pub const LEFT_ACCEL_Y: usize = 38;
    pub const LEFT_GYRO_X: usize = 40;
    pub const LEFT_GYRO_Z: usize = 42;
    pub const LEFT_GYRO_Y: usize = 44;

    pub const RIGHT_ACCEL_Z: usize = 47;
    pub const RIGHT_ACCEL_X: usize = 49;
    pub const RIGHT_ACCEL_Y: usize = 51;
    pub const RIGHT_GYRO_Z: usize = 53;
    pub const RIGHT_GYRO_X: usize = 55;
    pub const RIGHT_GYRO_Y: usize = 57;
}

use offsets::*;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LegionFront: u8 {
        /// Legion button on the right controller.
        const LEGION_R = 0x40;
        /// Legion button on the left controller.
        const LEGION_L = 0x80;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LegionBack: u8 {
        const M3 = 0x04;
        const M2 = 0x08;
        const Y3 = 0x20;
        const Y2 = 0x40;
        const Y1 = 0x80;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerLink {
    #[default]
    Detached,
    Wired,
    Wireless,
    Unknown(u8),
}

impl From<u8> for ControllerLink {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Detached,
            2 => Self::Wired,
            3 => Self::Wireless,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollWheel {
    #[default]
    Idle,
    Up,
    Down,
}

/// Which joycon's IMU to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImuSide {
    Left,
    #[default]
    Right,
}

/// Raw IMU words, reordered to `[x, y, z]`. Signs are as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImuSample {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegionInputReport {
    pub status: u8,
    pub left_link: ControllerLink,
    pub right_link: ControllerLink,
    pub front: LegionFront,
    pub back: LegionBack,
    pub scroll_click: bool,
    pub scroll: ScrollWheel,
    /// `[x, y]` in `0..=1000`; both zero while untouched.
    pub touch: [u16; 2],
    pub left_imu: ImuSample,
    pub right_imu: ImuSample,
}

impl LegionInputReport {
    pub fn is_ready(&self) -> bool {
        READY_STATES.contains(&self.status)
    }

    pub fn is_wireless(&self) -> bool {
        self.left_link == ControllerLink::Wireless || self.right_link == ControllerLink::Wireless
    }

    pub fn is_touched(&self) -> bool {
        self.touch != [0, 0]
    }

    pub fn imu(&self, side: ImuSide) -> &ImuSample {
        match side {
            ImuSide::Left => &self.left_imu,
            ImuSide::Right => &self.right_imu,
        }
    }
}

/// Errors returned by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { got: usize, need: usize },
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::TooShort { got, need } => {
                write!(f, "report too short: got {got} bytes, need {need}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Drop the leading report ID byte as read from the device.
pub fn strip_report_id(data: &[u8]) -> &[u8] {
    data.get(1..).unwrap_or(&[])
}

/// Parse a vendor report with its report ID already removed.
///
/// Fields past the end of a short report read as zero.
pub fn parse(data: &[u8]) -> Result<LegionInputReport, ParseError> {
    if data.len() < MIN_LEN {
        return Err(ParseError::TooShort {
            got: data.len(),
            need: MIN_LEN,
        });
    }

    let view = ReportView::new(data);
    let scroll = match view.u8_at(SCROLL_WHEEL) {
        SCROLL_UP => ScrollWheel::Up,
        SCROLL_DOWN => ScrollWheel::Down,
        _ => ScrollWheel::Idle,
    };

    Ok(LegionInputReport {
        status: view.u8_at(STATUS),
        left_link: ControllerLink::from(view.u8_at(LEFT_LINK)),
        right_link: ControllerLink::from(view.u8_at(RIGHT_LINK)),
        front: LegionFront::from_bits_truncate(view.u8_at(FRONT)),
        back: LegionBack::from_bits_truncate(view.u8_at(BACK)),
        scroll_click: view.u8_at(SCROLL_CLICK) == SCROLL_CLICK_PRESSED,
        scroll,
        touch: [view.u16_be_at(TOUCH_X), view.u16_be_at(TOUCH_Y)],
        left_imu: ImuSample {
            accel: [
                view.i16_be_at(LEFT_ACCEL_X),
                view.i16_be_at(LEFT_ACCEL_Y),
                view.i16_be_at(LEFT_ACCEL_Z),
            ],
            gyro: [
                view.i16_be_at(LEFT_GYRO_X),
                view.i16_be_at(LEFT_GYRO_Y),
                view.i16_be_at(LEFT_GYRO_Z),
            ],
        },
        right_imu: ImuSample {
            accel: [
                view.i16_be_at(RIGHT_ACCEL_X),
                view.i16_be_at(RIGHT_ACCEL_Y),
                view.i16_be_at(RIGHT_ACCEL_Z),
            ],
            gyro: [
                view.i16_be_at(RIGHT_GYRO_X),
                view.i16_be_at(RIGHT_GYRO_Y),
                view.i16_be_at(RIGHT_GYRO_Z),
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
        for (slot, byte) in data.iter_mut().skip(offset).zip(bytes) {
            *slot = *byte;
        }
    }

    #[test]
    fn too_short() {
        assert_eq!(parse(&[0]), Err(ParseError::TooShort { got: 1, need: 2 }));
        assert_eq!(strip_report_id(&[]), &[] as &[u8]);
    }

    #[test]
    fn readiness_follows_status() -> Result<(), ParseError> {
        let mut data = [0u8; REPORT_LEN];
        assert!(!parse(&data)?.is_ready());
        for status in READY_STATES {
            put(&mut data, STATUS, &[status]);
            assert!(parse(&data)?.is_ready());
        }
        Ok(())
    }

    #[test]
    fn buttons_and_scroll() -> Result<(), ParseError> {
        let mut data = [0u8; REPORT_LEN];
        put(&mut data, FRONT, &[0xC0]);
        put(&mut data, BACK, &[0x84]);
        put(&mut data, SCROLL_CLICK, &[128]);
        put(&mut data, SCROLL_WHEEL, &[255]);
        let report = parse(&data)?;
        assert_eq!(report.front, LegionFront::all());
        assert_eq!(report.back, LegionBack::Y1 | LegionBack::M3);
        assert!(report.scroll_click);
        assert_eq!(report.scroll, ScrollWheel::Down);

        put(&mut data, SCROLL_WHEEL, &[129]);
        put(&mut data, SCROLL_CLICK, &[127]);
        let report = parse(&data)?;
        assert_eq!(report.scroll, ScrollWheel::Up);
        assert!(!report.scroll_click);
        Ok(())
    }

    #[test]
    fn touch_is_big_endian() -> Result<(), ParseError> {
        let mut data = [0u8; REPORT_LEN];
        assert!(!parse(&data)?.is_touched());
        put(&mut data, TOUCH_X, &[0x03, 0xE8, 0x00, 0x01]);
        let report = parse(&data)?;
        assert_eq!(report.touch, [1000, 1]);
        assert!(report.is_touched());
        Ok(())
    }

    #[test]
    fn imu_words_are_reordered() -> Result<(), ParseError> {
        let mut data = [0u8; REPORT_LEN];
        put(&mut data, LEFT_ACCEL_X, &[0, 1, 0, 3, 0, 2, 0, 4, 0, 6, 0, 5]);
        put(&mut data, RIGHT_ACCEL_Z, &[0, 9, 0, 7, 0, 8, 0, 12, 0, 10, 0, 11]);
        let report = parse(&data)?;
        assert_eq!(report.imu(ImuSide::Left).accel, [1, 2, 3]);
        assert_eq!(report.imu(ImuSide::Left).gyro, [4, 5, 6]);
        assert_eq!(report.imu(ImuSide::Right).accel, [7, 8, 9]);
        assert_eq!(report.imu(ImuSide::Right).gyro, [10, 11, 12]);
        Ok(())
    }

    #[test]
    fn link_state() -> Result<(), ParseError> {
        let mut data = [0u8; REPORT_LEN];
        put(&mut data, LEFT_LINK, &[2, 3]);
        let report = parse(&data)?;
        assert_eq!(report.left_link, ControllerLink::Wired);
        assert_eq!(report.right_link, ControllerLink::Wireless);
        assert!(report.is_wireless());
        assert_eq!(ControllerLink::from(9), ControllerLink::Unknown(9));
        Ok(())
    }
}
