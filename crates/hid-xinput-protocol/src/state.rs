//! `XINPUT_STATE` layout.
//!
//! # Layout
//! | Offset | Size | Field            | Encoding                     |
//! |--------|------|------------------|------------------------------|
//! | 0–3    | u32  | packet number    | LE, changes on every update  |
//! | 4–5    | u16  | buttons          | LE, see [`XInputButtons`]    |
//! | 6      | u8   | left trigger     | 0–255                        |
//! | 7      | u8   | right trigger    | 0–255                        |
//! | 8–15   | i16×4| LX, LY, RX, RY   | LE, Y up positive            |
//!
//! The guide button is only reported by the undocumented state call; the
//! public one leaves bit `0x0400` clear.

use bitflags::bitflags;
use openhandheld_hid_common::ReportView;

/// Size of `XINPUT_STATE` in bytes.
pub const STATE_LEN: usize = 16;

/// Number of XInput user slots.
pub const MAX_USERS: u8 = 4;

/// `XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE`.
pub const LEFT_THUMB_DEADZONE: i16 = 7849;

/// `XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE`.
pub const RIGHT_THUMB_DEADZONE: i16 = 8689;

/// `XINPUT_GAMEPAD_TRIGGER_THRESHOLD`.
pub const TRIGGER_THRESHOLD: u8 = 30;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct XInputButtons: u16 {
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

/// `XINPUT_GAMEPAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XInputGamepad {
    pub buttons: XInputButtons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl XInputGamepad {
    pub fn is_pressed(&self, button: XInputButtons) -> bool {
        self.buttons.contains(button)
    }

    /// Left trigger past [`TRIGGER_THRESHOLD`].
    pub fn left_trigger_pressed(&self) -> bool {
        self.left_trigger > TRIGGER_THRESHOLD
    }

    pub fn right_trigger_pressed(&self) -> bool {
        self.right_trigger > TRIGGER_THRESHOLD
    }
}

/// `XINPUT_STATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XInputState {
    pub packet_number: u32,
    pub gamepad: XInputGamepad,
}

impl XInputState {
    /// Decode a state structure. Missing trailing bytes read as zero.
    pub fn from_bytes(data: &[u8]) -> Self {
        let view = ReportView::new(data);
        Self {
            packet_number: view.u32_le_at(0),
            gamepad: XInputGamepad {
                buttons: XInputButtons::from_bits_truncate(view.u16_le_at(4)),
                left_trigger: view.u8_at(6),
                right_trigger: view.u8_at(7),
                thumb_lx: view.i16_le_at(8),
                thumb_ly: view.i16_le_at(10),
                thumb_rx: view.i16_le_at(12),
                thumb_ry: view.i16_le_at(14),
            },
        }
    }

    pub fn to_bytes(&self) -> [u8; STATE_LEN] {
        let pad = &self.gamepad;
        let mut out = [0u8; STATE_LEN];
        let fields = [
            self.packet_number.to_le_bytes().to_vec(),
            pad.buttons.bits().to_le_bytes().to_vec(),
            vec![pad.left_trigger, pad.right_trigger],
            pad.thumb_lx.to_le_bytes().to_vec(),
            pad.thumb_ly.to_le_bytes().to_vec(),
            pad.thumb_rx.to_le_bytes().to_vec(),
            pad.thumb_ry.to_le_bytes().to_vec(),
        ];
        for (slot, byte) in out.iter_mut().zip(fields.concat()) {
            *slot = byte;
        }
        out
    }
}

/// Directions in which a stick is pushed past `deadzone`, as
/// `(left, right, down, up)`.
pub fn stick_directions(x: i16, y: i16, deadzone: i16) -> (bool, bool, bool, bool) {
    (x < -deadzone, x > deadzone, y < -deadzone, y > deadzone)
}
