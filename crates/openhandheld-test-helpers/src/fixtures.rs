//! Synthetic device report builders.
//!
//! Each builder starts from a neutral, well-formed report and writes fields
//! at the offsets the protocol crates decode from.

use handheld_hid_dualsense_protocol as dualsense;
use handheld_hid_legion_protocol as legion;
use handheld_hid_neptune_protocol as neptune;

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    for (slot, byte) in buf.iter_mut().skip(offset).zip(bytes) {
        *slot = *byte;
    }
}

/// Steam Deck input report.
#[derive(Debug, Clone)]
pub struct NeptuneReport {
    data: [u8; neptune::REPORT_LEN],
}

impl Default for NeptuneReport {
    fn default() -> Self {
        Self::new()
    }
}

impl NeptuneReport {
    pub fn new() -> Self {
        let mut data = [0u8; neptune::REPORT_LEN];
        put(&mut data, 0, &[neptune::PACKET_TYPE, 0x00, neptune::EVENT_DECK_INPUT, 0x3C]);
        Self { data }
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        put(&mut self.data, neptune::offsets::SEQUENCE, &sequence.to_le_bytes());
        self
    }

    pub fn buttons(mut self, buttons: neptune::NeptuneButtons) -> Self {
        put(&mut self.data, neptune::offsets::BUTTONS, &buttons.bits().to_le_bytes());
        self
    }

    fn pair(mut self, offset: usize, x: i16, y: i16) -> Self {
        put(&mut self.data, offset, &x.to_le_bytes());
        put(&mut self.data, offset + 2, &y.to_le_bytes());
        self
    }

    fn triple(mut self, offset: usize, values: [i16; 3]) -> Self {
        for (i, value) in values.iter().enumerate() {
            put(&mut self.data, offset + 2 * i, &value.to_le_bytes());
        }
        self
    }

    pub fn left_stick(self, x: i16, y: i16) -> Self {
        self.pair(neptune::offsets::LEFT_STICK, x, y)
    }

    pub fn right_stick(self, x: i16, y: i16) -> Self {
        self.pair(neptune::offsets::RIGHT_STICK, x, y)
    }

    pub fn left_pad(self, x: i16, y: i16) -> Self {
        self.pair(neptune::offsets::LEFT_PAD, x, y)
    }

    pub fn right_pad(self, x: i16, y: i16) -> Self {
        self.pair(neptune::offsets::RIGHT_PAD, x, y)
    }

    /// Raw trigger words, `0..=32767`.
    pub fn triggers(self, left: i16, right: i16) -> Self {
        self.pair(neptune::offsets::TRIGGERS, left, right)
    }

    pub fn accel(self, values: [i16; 3]) -> Self {
        self.triple(neptune::offsets::ACCEL, values)
    }

    /// `[pitch, yaw, roll]`.
    pub fn gyro(self, values: [i16; 3]) -> Self {
        self.triple(neptune::offsets::GYRO, values)
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

/// Legion Go vendor report, report ID byte included.
#[derive(Debug, Clone)]
pub struct LegionReport {
    data: [u8; legion::REPORT_LEN + 1],
}

impl Default for LegionReport {
    fn default() -> Self {
        Self::new()
    }
}

impl LegionReport {
    /// Report ID of the vendor collection's input report.
    pub const REPORT_ID: u8 = 0x04;

    /// A ready, wired report with nothing pressed.
    pub fn new() -> Self {
        let mut data = [0u8; legion::REPORT_LEN + 1];
        put(&mut data, 0, &[Self::REPORT_ID]);
        let mut report = Self { data };
        report.set(legion::offsets::STATUS, &[25]);
        report.set(legion::offsets::LEFT_LINK, &[2, 2]);
        report
    }

    fn set(&mut self, offset: usize, bytes: &[u8]) {
        put(&mut self.data, offset + 1, bytes);
    }

    pub fn status(mut self, status: u8) -> Self {
        self.set(legion::offsets::STATUS, &[status]);
        self
    }

    pub fn front(mut self, front: legion::LegionFront) -> Self {
        self.set(legion::offsets::FRONT, &[front.bits()]);
        self
    }

    pub fn back(mut self, back: legion::LegionBack) -> Self {
        self.set(legion::offsets::BACK, &[back.bits()]);
        self
    }

    pub fn scroll_click(mut self) -> Self {
        self.set(legion::offsets::SCROLL_CLICK, &[legion::input::SCROLL_CLICK_PRESSED]);
        self
    }

    pub fn scroll(mut self, wheel: legion::ScrollWheel) -> Self {
        let value = match wheel {
            legion::ScrollWheel::Idle => 0,
            legion::ScrollWheel::Up => legion::input::SCROLL_UP,
            legion::ScrollWheel::Down => legion::input::SCROLL_DOWN,
        };
        self.set(legion::offsets::SCROLL_WHEEL, &[value]);
        self
    }

    /// Touch position in `0..=1000`; `(0, 0)` is untouched.
    pub fn touch(mut self, x: u16, y: u16) -> Self {
        self.set(legion::offsets::TOUCH_X, &x.to_be_bytes());
        self.set(legion::offsets::TOUCH_Y, &y.to_be_bytes());
        self
    }

    /// Raw left joycon words, `[x, y, z]`.
    pub fn left_imu(mut self, accel: [i16; 3], gyro: [i16; 3]) -> Self {
        use legion::offsets::*;
        self.imu(
            [LEFT_ACCEL_X, LEFT_ACCEL_Y, LEFT_ACCEL_Z],
            [LEFT_GYRO_X, LEFT_GYRO_Y, LEFT_GYRO_Z],
            accel,
            gyro,
        );
        self
    }

    /// Raw right joycon words, `[x, y, z]`.
    pub fn right_imu(mut self, accel: [i16; 3], gyro: [i16; 3]) -> Self {
        use legion::offsets::*;
        self.imu(
            [RIGHT_ACCEL_X, RIGHT_ACCEL_Y, RIGHT_ACCEL_Z],
            [RIGHT_GYRO_X, RIGHT_GYRO_Y, RIGHT_GYRO_Z],
            accel,
            gyro,
        );
        self
    }

    fn imu(&mut self, accel_at: [usize; 3], gyro_at: [usize; 3], accel: [i16; 3], gyro: [i16; 3]) {
        for (offset, value) in accel_at.into_iter().zip(accel) {
            self.set(offset, &value.to_be_bytes());
        }
        for (offset, value) in gyro_at.into_iter().zip(gyro) {
            self.set(offset, &value.to_be_bytes());
        }
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

/// DualSense USB input report.
#[derive(Debug, Clone)]
pub struct DualSenseReport {
    data: [u8; dualsense::REPORT_LEN],
    buttons: dualsense::DualSenseButtons,
    hat: u8,
}

impl Default for DualSenseReport {
    fn default() -> Self {
        Self::new()
    }
}

impl DualSenseReport {
    /// Sticks centred, hat released, both fingers lifted.
    pub fn new() -> Self {
        let mut data = [0u8; dualsense::REPORT_LEN];
        put(&mut data, 0, &[dualsense::REPORT_ID, 0x80, 0x80, 0x80, 0x80]);
        for offset in dualsense::offsets::TOUCH {
            put(&mut data, offset, &[0x80]);
        }
        Self {
            data,
            buttons: dualsense::DualSenseButtons::empty(),
            hat: 8,
        }
    }

    pub fn buttons(mut self, buttons: dualsense::DualSenseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Hat nibble: `0` up, clockwise to `7` up-left, `8` released.
    pub fn hat(mut self, hat: u8) -> Self {
        self.hat = hat & 0x0F;
        self
    }

    pub fn left_stick(mut self, x: u8, y: u8) -> Self {
        put(&mut self.data, dualsense::offsets::LEFT_STICK, &[x, y]);
        self
    }

    pub fn right_stick(mut self, x: u8, y: u8) -> Self {
        put(&mut self.data, dualsense::offsets::RIGHT_STICK, &[x, y]);
        self
    }

    pub fn triggers(mut self, left: u8, right: u8) -> Self {
        put(&mut self.data, dualsense::offsets::TRIGGERS, &[left, right]);
        self
    }

    pub fn gyro(mut self, values: [i16; 3]) -> Self {
        for (i, value) in values.iter().enumerate() {
            put(&mut self.data, dualsense::offsets::GYRO + 2 * i, &value.to_le_bytes());
        }
        self
    }

    pub fn accel(mut self, values: [i16; 3]) -> Self {
        for (i, value) in values.iter().enumerate() {
            put(&mut self.data, dualsense::offsets::ACCEL + 2 * i, &value.to_le_bytes());
        }
        self
    }

    /// Put finger `index` (0 or 1) down at `(x, y)` with tracking `id`.
    pub fn touch(mut self, index: usize, id: u8, x: u16, y: u16) -> Self {
        if let Some(offset) = dualsense::offsets::TOUCH.get(index).copied() {
            let [x_lo, x_hi] = x.to_le_bytes();
            let [y_lo, y_hi] = (y << 4).to_le_bytes();
            put(
                &mut self.data,
                offset,
                &[id & 0x7F, x_lo, (x_hi & 0x0F) | (y_lo & 0xF0), y_hi],
            );
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = self.data;
        let bits = self.buttons.bits().to_le_bytes();
        let [b0, b1, b2, _] = bits;
        put(&mut data, dualsense::offsets::BUTTONS, &[(b0 & 0xF0) | self.hat, b1, b2]);
        data.to_vec()
    }
}
