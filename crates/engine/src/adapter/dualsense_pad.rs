//! Sony DualSense over USB.
//!
//! # Device
//! - VID `0x054C`, PIDs `0x0CE6` (DualSense) and `0x0DF2` (Edge)
//!
//! # Protocol
//! 64-byte input report `0x01`. The touchpad's two contacts become the left
//! and right pads in contact order. Rumble is output report `0x02` in
//! compatible-vibration mode.

use handheld_hid_dualsense_protocol::{
    self as dualsense, DualSenseButtons, DualSenseInputReport, TOUCHPAD_HEIGHT, TOUCHPAD_WIDTH,
    TouchContact, axis_from_byte, inverted_axis_from_byte,
};
use handheld_hid_xinput_protocol::{LEFT_THUMB_DEADZONE, RIGHT_THUMB_DEADZONE, stick_directions};
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_input::{
    AxisFlags, AxisLayoutSet, ButtonFlags, ButtonState, ControllerState, SharedControllerState,
};
use openhandheld_ipc::ControllerCapabilities;
use tracing::{debug, info, trace};

use super::reader::HidLink;
use super::scale::SensorScale;
use super::{
    AdapterCore, AdapterKind, AdapterOptions, AdapterStatus, ControllerAdapter, FULL_PULL,
    SOFT_PULL,
};

const BUTTON_MAP: [(DualSenseButtons, ButtonFlags); 12] = [
    (DualSenseButtons::CROSS, ButtonFlags::B1),
    (DualSenseButtons::CIRCLE, ButtonFlags::B2),
    (DualSenseButtons::SQUARE, ButtonFlags::B3),
    (DualSenseButtons::TRIANGLE, ButtonFlags::B4),
    (DualSenseButtons::L1, ButtonFlags::L1),
    (DualSenseButtons::R1, ButtonFlags::R1),
    (DualSenseButtons::CREATE, ButtonFlags::Back),
    (DualSenseButtons::OPTIONS, ButtonFlags::Start),
    (DualSenseButtons::L3, ButtonFlags::LeftStickClick),
    (DualSenseButtons::R3, ButtonFlags::RightStickClick),
    (DualSenseButtons::PS, ButtonFlags::Special),
    (DualSenseButtons::MUTE, ButtonFlags::OEM1),
];

fn pad_axis(value: u16, max: u16, inverted: bool) -> i16 {
    let max = i32::from(max.saturating_sub(1).max(1));
    let scaled = i32::from(value).min(max) * 65535 / max;
    let wide = if inverted { 32767 - scaled } else { scaled - 32768 };
    i16::try_from(wide).unwrap_or(if inverted { i16::MIN } else { i16::MAX })
}

fn map_contact(
    contact: TouchContact,
    clicked: bool,
    (x_axis, y_axis): (AxisFlags, AxisFlags),
    (touch, click): (ButtonFlags, ButtonFlags),
    state: &mut ControllerState,
) {
    state.buttons.set(touch, contact.active);
    state.buttons.set(click, clicked && contact.active);
    if contact.active {
        state.axes.set(x_axis, pad_axis(contact.x, TOUCHPAD_WIDTH, false));
        state.axes.set(y_axis, pad_axis(contact.y, TOUCHPAD_HEIGHT, true));
    } else {
        state.axes.set(x_axis, 0);
        state.axes.set(y_axis, 0);
    }
}

/// Decode one DualSense report into `state`.
pub fn map_report(report: &DualSenseInputReport, scale: &SensorScale, state: &mut ControllerState) {
    for (bit, flag) in BUTTON_MAP {
        state.buttons.set(flag, report.is_pressed(bit));
    }

    state.buttons.set(ButtonFlags::DPadUp, report.hat.up());
    state.buttons.set(ButtonFlags::DPadDown, report.hat.down());
    state.buttons.set(ButtonFlags::DPadLeft, report.hat.left());
    state.buttons.set(ButtonFlags::DPadRight, report.hat.right());

    state.buttons.set(ButtonFlags::L2Soft, report.left_trigger > SOFT_PULL);
    state.buttons.set(ButtonFlags::R2Soft, report.right_trigger > SOFT_PULL);
    state.buttons.set(ButtonFlags::L2Full, report.left_trigger > FULL_PULL);
    state.buttons.set(ButtonFlags::R2Full, report.right_trigger > FULL_PULL);
    state.axes.set(AxisFlags::L2, i16::from(report.left_trigger));
    state.axes.set(AxisFlags::R2, i16::from(report.right_trigger));

    let [lx, ly] = report.left_stick;
    let [rx, ry] = report.right_stick;
    let (lx, ly) = (axis_from_byte(lx), inverted_axis_from_byte(ly));
    let (rx, ry) = (axis_from_byte(rx), inverted_axis_from_byte(ry));
    state.axes.set(AxisFlags::LeftStickX, lx);
    state.axes.set(AxisFlags::LeftStickY, ly);
    state.axes.set(AxisFlags::RightStickX, rx);
    state.axes.set(AxisFlags::RightStickY, ry);

    let (left, right, down, up) = stick_directions(lx, ly, LEFT_THUMB_DEADZONE);
    state.buttons.set(ButtonFlags::LeftStickLeft, left);
    state.buttons.set(ButtonFlags::LeftStickRight, right);
    state.buttons.set(ButtonFlags::LeftStickDown, down);
    state.buttons.set(ButtonFlags::LeftStickUp, up);
    let (left, right, down, up) = stick_directions(rx, ry, RIGHT_THUMB_DEADZONE);
    state.buttons.set(ButtonFlags::RightStickLeft, left);
    state.buttons.set(ButtonFlags::RightStickRight, right);
    state.buttons.set(ButtonFlags::RightStickDown, down);
    state.buttons.set(ButtonFlags::RightStickUp, up);

    let clicked = report.is_pressed(DualSenseButtons::TOUCHPAD);
    let [first, second] = report.touch;
    map_contact(
        first,
        clicked,
        (AxisFlags::LeftPadX, AxisFlags::LeftPadY),
        (ButtonFlags::LeftPadTouch, ButtonFlags::LeftPadClick),
        state,
    );
    map_contact(
        second,
        clicked,
        (AxisFlags::RightPadX, AxisFlags::RightPadY),
        (ButtonFlags::RightPadTouch, ButtonFlags::RightPadClick),
        state,
    );

    let [gx, gy, gz] = scale.gyro(report.gyro);
    let [ax, ay, az] = scale.accel(report.accel);
    state.gyro.set_gyroscope(gx, gy, gz);
    state.gyro.set_accelerometer(ax, ay, az);
}

fn scale_motor(motor: u8, strength: f64) -> u8 {
    let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
    (f64::from(motor) * strength).round() as u8
}

/// DualSense adapter.
#[derive(Debug)]
pub struct DualSenseAdapter {
    core: AdapterCore,
    link: HidLink,
    scale: SensorScale,
    strength: f64,
}

impl DualSenseAdapter {
    pub fn new(options: &AdapterOptions) -> Self {
        let core = AdapterCore::new(AdapterKind::DualSense.name());
        let link = HidLink::new(core.status_cell().clone(), options.read_timeout_ms);
        Self {
            core,
            link,
            scale: options.sensors.dualsense(),
            strength: options.vibration_strength,
        }
    }

    pub fn link(&self) -> &HidLink {
        &self.link
    }
}

impl ControllerAdapter for DualSenseAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::DualSense
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn status(&self) -> AdapterStatus {
        self.core.status()
    }

    fn attach(&mut self, port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError> {
        self.link.open(port, info)?;
        if let Some(name) = dualsense::product_name(info.product_id) {
            self.core.set_name(name);
        }
        info!("DualSense ready on {}", info.path);
        if self.core.is_plugged() {
            self.plug();
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.link.close();
        self.core.reset();
    }

    fn plug(&mut self) {
        self.core.set_plugged(true);
    }

    fn unplug(&mut self) {
        self.core.set_plugged(false);
        self.set_vibration(0, 0);
    }

    fn is_plugged(&self) -> bool {
        self.core.is_plugged()
    }

    fn tick(&mut self, ticks: u64, _delta_ms: f32, commit: bool) {
        if self.core.status() != AdapterStatus::Connected {
            return;
        }
        let Some(raw) = self.link.latest() else {
            return;
        };
        let report = match dualsense::parse(&raw) {
            Ok(report) => report,
            Err(e) => {
                trace!("Skipping DualSense report: {}", e);
                return;
            }
        };

        map_report(&report, &self.scale, self.core.begin(ticks));
        if commit {
            self.core.commit();
        }
    }

    fn state(&self) -> SharedControllerState {
        self.core.state()
    }

    fn source_buttons(&self) -> ButtonState {
        let mut buttons = ButtonFlags::common();
        for flag in [
            ButtonFlags::OEM1,
            ButtonFlags::LeftPadTouch,
            ButtonFlags::LeftPadClick,
            ButtonFlags::RightPadTouch,
            ButtonFlags::RightPadClick,
        ] {
            buttons.press(flag);
        }
        buttons
    }

    fn source_axes(&self) -> AxisLayoutSet {
        AxisLayoutSet::COMMON
            | AxisLayoutSet::LEFT_PAD
            | AxisLayoutSet::RIGHT_PAD
            | AxisLayoutSet::GYROSCOPE
    }

    fn capabilities(&self) -> ControllerCapabilities {
        ControllerCapabilities::all()
    }

    fn set_vibration(&mut self, large_motor: u8, small_motor: u8) {
        if !self.link.is_open() {
            return;
        }
        let report = dualsense::rumble_report(
            scale_motor(large_motor, self.strength),
            scale_motor(small_motor, self.strength),
        );
        if let Err(e) = self.link.write_report(&report) {
            debug!("DualSense rumble failed: {}", e);
        }
    }

    fn inject_button(&mut self, flag: ButtonFlags, pressed: bool) {
        self.core.inject(flag, pressed);
    }
}
