//! DualShock 4 touchpad emulation.
//!
//! Each finger is a 4-byte entry in the report:
//!
//! | Byte | Content |
//! |------|---------|
//! | 0 | Tracking number (bit 7 set = finger up) |
//! | 1 | X bits 0..7 |
//! | 2 | X bits 8..11 (low nibble), Y bits 0..3 (high nibble) |
//! | 3 | Y bits 4..11 |
//!
//! The two handheld pads become fingers 1 and 2 on the single DS4 pad.
//! Both start lifted. The packet counter advances on every touch-down so the
//! host sees each new contact as a new packet.

use openhandheld_input::{AxisFlags, ButtonFlags, ControllerState};

/// Horizontal resolution of the DS4 touchpad.
pub const TOUCHPAD_WIDTH: i32 = 1920;

/// Vertical resolution of the DS4 touchpad.
pub const TOUCHPAD_HEIGHT: i32 = 943;

/// Tracking-number bit marking a lifted finger.
pub const TOUCH_UP: u8 = 0x80;

const LEFT_FINGER_ID: u8 = 1;
const RIGHT_FINGER_ID: u8 = 2;

/// Which emulated finger a contact drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchFinger {
    Left,
    Right,
}

/// One finger entry, 12-bit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub tracking: u8,
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    /// A lifted finger at the origin.
    pub const fn lifted(id: u8) -> Self {
        Self {
            tracking: id | TOUCH_UP,
            x: 0,
            y: 0,
        }
    }

    pub const fn id(&self) -> u8 {
        self.tracking & !TOUCH_UP
    }

    pub const fn is_down(&self) -> bool {
        self.tracking & TOUCH_UP == 0
    }

    pub fn pack(&self) -> [u8; 4] {
        let x = self.x & 0x0FFF;
        let y = self.y & 0x0FFF;
        [
            self.tracking,
            (x & 0xFF) as u8,
            (((x >> 8) & 0x0F) | ((y << 4) & 0xF0)) as u8,
            (y >> 4) as u8,
        ]
    }

    pub fn unpack(bytes: [u8; 4]) -> Self {
        let [tracking, b1, b2, b3] = bytes;
        Self {
            tracking,
            x: u16::from(b1) | (u16::from(b2 & 0x0F) << 8),
            y: u16::from(b2 >> 4) | (u16::from(b3) << 4),
        }
    }

    fn press(&mut self) {
        self.tracking &= !TOUCH_UP;
    }

    fn lift(&mut self) {
        self.tracking |= TOUCH_UP;
    }

    fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }
}

/// Touch state carried between DS4 reports.
#[derive(Debug, Clone)]
pub struct Ds4Touch {
    left: TouchPoint,
    right: TouchPoint,
    packet_counter: u8,
    prev_left_touch: bool,
    prev_right_touch: bool,
    cursor_click: bool,
}

impl Default for Ds4Touch {
    fn default() -> Self {
        Self {
            left: TouchPoint::lifted(LEFT_FINGER_ID),
            right: TouchPoint::lifted(RIGHT_FINGER_ID),
            packet_counter: 0,
            prev_left_touch: false,
            prev_right_touch: false,
            cursor_click: false,
        }
    }
}

impl Ds4Touch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finger(&self, finger: TouchFinger) -> &TouchPoint {
        match finger {
            TouchFinger::Left => &self.left,
            TouchFinger::Right => &self.right,
        }
    }

    pub fn packet_counter(&self) -> u8 {
        self.packet_counter
    }

    /// True when the touchpad click bit should be reported.
    pub fn click(&self, state: &ControllerState) -> bool {
        self.cursor_click
            || state.buttons.is_pressed(ButtonFlags::LeftPadClick)
            || state.buttons.is_pressed(ButtonFlags::RightPadClick)
    }

    /// Follow the pad touch buttons and pad axes of one tick.
    pub fn update(&mut self, state: &ControllerState) {
        let buttons = &state.buttons;
        let axes = &state.axes;

        let left = buttons.is_pressed(ButtonFlags::LeftPadTouch);
        if left != self.prev_left_touch {
            self.set_contact(TouchFinger::Left, left);
            self.prev_left_touch = left;
        }
        if left {
            let (x, y) = pad_to_touch(axes.get(AxisFlags::LeftPadX), axes.get(AxisFlags::LeftPadY));
            self.left.move_to(x, y);
        }

        let right = buttons.is_pressed(ButtonFlags::RightPadTouch);
        if right != self.prev_right_touch {
            self.set_contact(TouchFinger::Right, right);
            self.prev_right_touch = right;
        }
        if right {
            let (x, y) = pad_to_touch(axes.get(AxisFlags::RightPadX), axes.get(AxisFlags::RightPadY));
            self.right.move_to(x, y);
        }
    }

    /// Cursor contact from the desktop overlay, coordinates in `0.0..=1.0`.
    ///
    /// `double_tap` also holds the touchpad click until the contact lifts.
    pub fn cursor_down(&mut self, finger: TouchFinger, x: f64, y: f64, double_tap: bool) {
        let (tx, ty) = cursor_to_touch(x, y);
        let point = self.finger_mut(finger);
        point.move_to(tx, ty);
        point.press();
        if double_tap {
            self.cursor_click = true;
        }
        self.packet_counter = self.packet_counter.wrapping_add(1);
    }

    pub fn cursor_move(&mut self, finger: TouchFinger, x: f64, y: f64) {
        let (tx, ty) = cursor_to_touch(x, y);
        self.finger_mut(finger).move_to(tx, ty);
    }

    pub fn cursor_up(&mut self, finger: TouchFinger, x: f64, y: f64) {
        let (tx, ty) = cursor_to_touch(x, y);
        let point = self.finger_mut(finger);
        point.move_to(tx, ty);
        point.lift();
        self.cursor_click = false;
    }

    /// `[packet counter, finger 1 (4 bytes), finger 2 (4 bytes)]`.
    pub fn packet(&self) -> [u8; 9] {
        let [l0, l1, l2, l3] = self.left.pack();
        let [r0, r1, r2, r3] = self.right.pack();
        [self.packet_counter, l0, l1, l2, l3, r0, r1, r2, r3]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_contact(&mut self, finger: TouchFinger, down: bool) {
        if down {
            self.packet_counter = self.packet_counter.wrapping_add(1);
            self.finger_mut(finger).press();
        } else {
            self.finger_mut(finger).lift();
        }
    }

    fn finger_mut(&mut self, finger: TouchFinger) -> &mut TouchPoint {
        match finger {
            TouchFinger::Left => &mut self.left,
            TouchFinger::Right => &mut self.right,
        }
    }
}

/// Map pad axes onto touchpad pixels. Pad Y grows upward, touch Y downward.
pub fn pad_to_touch(x: i16, y: i16) -> (u16, u16) {
    let tx = (i32::from(x) + i32::from(i16::MAX)) * TOUCHPAD_WIDTH / i32::from(u16::MAX);
    let ty = (-i32::from(y) + i32::from(i16::MAX)) * TOUCHPAD_HEIGHT / i32::from(u16::MAX);
    (clamp_coord(tx, TOUCHPAD_WIDTH), clamp_coord(ty, TOUCHPAD_HEIGHT))
}

fn cursor_to_touch(x: f64, y: f64) -> (u16, u16) {
    let scale = |v: f64, extent: i32| {
        if v.is_finite() {
            clamp_coord((v * f64::from(extent)) as i32, extent)
        } else {
            0
        }
    };
    (scale(x, TOUCHPAD_WIDTH), scale(y, TOUCHPAD_HEIGHT))
}

fn clamp_coord(value: i32, extent: i32) -> u16 {
    u16::try_from(value.clamp(0, extent)).unwrap_or(0)
}
