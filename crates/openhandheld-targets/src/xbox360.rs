//! Xbox 360 report builder.
//!
//! ## Report layout (12 bytes)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | Buttons (u16 LE, see [`X360Buttons`]) |
//! | 2 | 1 | Left trigger (0..255) |
//! | 3 | 1 | Right trigger (0..255) |
//! | 4 | 2 | Left stick X (i16 LE) |
//! | 6 | 2 | Left stick Y (i16 LE) |
//! | 8 | 2 | Right stick X (i16 LE) |
//! | 10 | 2 | Right stick Y (i16 LE) |
//!
//! Sticks pass through unchanged; the canonical axes already use the XInput
//! range and orientation.

use bitflags::bitflags;
use openhandheld_input::{AxisFlags, ButtonFlags, ControllerState};

/// Length of a serialized [`Xbox360Report`].
pub const X360_REPORT_LEN: usize = 12;

bitflags! {
    /// `wButtons` of an XInput gamepad report.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct X360Buttons: u16 {
        const DPAD_UP = 0x0001;
        const DPAD_DOWN = 0x0002;
        const DPAD_LEFT = 0x0004;
        const DPAD_RIGHT = 0x0008;
        const START = 0x0010;
        const BACK = 0x0020;
        const LEFT_THUMB = 0x0040;
        const RIGHT_THUMB = 0x0080;
        const LEFT_SHOULDER = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const GUIDE = 0x0400;
        const A = 0x1000;
        const B = 0x2000;
        const X = 0x4000;
        const Y = 0x8000;
    }
}

/// Canonical button to report bit. Buttons not listed have no Xbox 360 bit.
pub const X360_BUTTON_MAP: [(ButtonFlags, X360Buttons); 15] = [
    (ButtonFlags::B1, X360Buttons::A),
    (ButtonFlags::B2, X360Buttons::B),
    (ButtonFlags::B3, X360Buttons::X),
    (ButtonFlags::B4, X360Buttons::Y),
    (ButtonFlags::DPadUp, X360Buttons::DPAD_UP),
    (ButtonFlags::DPadDown, X360Buttons::DPAD_DOWN),
    (ButtonFlags::DPadLeft, X360Buttons::DPAD_LEFT),
    (ButtonFlags::DPadRight, X360Buttons::DPAD_RIGHT),
    (ButtonFlags::Back, X360Buttons::BACK),
    (ButtonFlags::Start, X360Buttons::START),
    (ButtonFlags::L1, X360Buttons::LEFT_SHOULDER),
    (ButtonFlags::R1, X360Buttons::RIGHT_SHOULDER),
    (ButtonFlags::LeftStickClick, X360Buttons::LEFT_THUMB),
    (ButtonFlags::RightStickClick, X360Buttons::RIGHT_THUMB),
    (ButtonFlags::Special, X360Buttons::GUIDE),
];

/// Decoded form of one Xbox 360 report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xbox360Report {
    pub buttons: X360Buttons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl Xbox360Report {
    pub fn from_state(state: &ControllerState) -> Self {
        let buttons = X360_BUTTON_MAP
            .iter()
            .filter(|(flag, _)| state.buttons.is_pressed(*flag))
            .fold(X360Buttons::empty(), |acc, (_, bit)| acc | *bit);

        let axes = &state.axes;
        Self {
            buttons,
            left_trigger: trigger_byte(axes.get(AxisFlags::L2)),
            right_trigger: trigger_byte(axes.get(AxisFlags::R2)),
            thumb_lx: axes.get(AxisFlags::LeftStickX),
            thumb_ly: axes.get(AxisFlags::LeftStickY),
            thumb_rx: axes.get(AxisFlags::RightStickX),
            thumb_ry: axes.get(AxisFlags::RightStickY),
        }
    }

    pub fn to_bytes(&self) -> [u8; X360_REPORT_LEN] {
        let [b0, b1] = self.buttons.bits().to_le_bytes();
        let [lx0, lx1] = self.thumb_lx.to_le_bytes();
        let [ly0, ly1] = self.thumb_ly.to_le_bytes();
        let [rx0, rx1] = self.thumb_rx.to_le_bytes();
        let [ry0, ry1] = self.thumb_ry.to_le_bytes();
        [
            b0,
            b1,
            self.left_trigger,
            self.right_trigger,
            lx0,
            lx1,
            ly0,
            ly1,
            rx0,
            rx1,
            ry0,
            ry1,
        ]
    }

    pub fn from_bytes(data: &[u8; X360_REPORT_LEN]) -> Self {
        let [b0, b1, lt, rt, lx0, lx1, ly0, ly1, rx0, rx1, ry0, ry1] = *data;
        Self {
            buttons: X360Buttons::from_bits_retain(u16::from_le_bytes([b0, b1])),
            left_trigger: lt,
            right_trigger: rt,
            thumb_lx: i16::from_le_bytes([lx0, lx1]),
            thumb_ly: i16::from_le_bytes([ly0, ly1]),
            thumb_rx: i16::from_le_bytes([rx0, rx1]),
            thumb_ry: i16::from_le_bytes([ry0, ry1]),
        }
    }
}

/// Trigger axes are already stored in the 8-bit range.
pub(crate) fn trigger_byte(value: i16) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}
