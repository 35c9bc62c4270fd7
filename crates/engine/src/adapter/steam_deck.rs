//! Steam Deck built-in controller.
//!
//! # Device
//! - VID `0x28DE`, PID `0x1205`, HID interface 2
//!
//! # Protocol
//! Input arrives as 64-byte reports with header `01 00 09`; everything else
//! on the interface (connect and battery events) is ignored. While plugged
//! the controller is kept out of lizard mode by re-sending the disable
//! sequence every [`HEARTBEAT_INTERVAL`]. Rumble is a stream of
//! `SET_HAPTIC2` steps, one per pad, sent every [`RUMBLE_INTERVAL_MS`] while
//! a motor is running.

use handheld_hid_neptune_protocol::{
    self as neptune, HAPTIC_AMPLITUDE_HIGH, HAPTIC_AMPLITUDE_LOW, HAPTIC_AMPLITUDE_MEDIUM,
    HEARTBEAT_INTERVAL, HapticMotor, HapticStyle, NeptuneButtons, NeptuneInputReport,
    PAD_INNER_THRESHOLD,
};
use handheld_hid_xinput_protocol::{LEFT_THUMB_DEADZONE, RIGHT_THUMB_DEADZONE, stick_directions};
use openhandheld_actions::HapticStrength;
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

/// Spacing of rumble steps while a motor runs.
pub const RUMBLE_INTERVAL_MS: f32 = 10.0;

const BUTTON_MAP: [(NeptuneButtons, ButtonFlags); 24] = [
    (NeptuneButtons::A, ButtonFlags::B1),
    (NeptuneButtons::B, ButtonFlags::B2),
    (NeptuneButtons::X, ButtonFlags::B3),
    (NeptuneButtons::Y, ButtonFlags::B4),
    (NeptuneButtons::DPAD_UP, ButtonFlags::DPadUp),
    (NeptuneButtons::DPAD_DOWN, ButtonFlags::DPadDown),
    (NeptuneButtons::DPAD_LEFT, ButtonFlags::DPadLeft),
    (NeptuneButtons::DPAD_RIGHT, ButtonFlags::DPadRight),
    (NeptuneButtons::OPTIONS, ButtonFlags::Start),
    (NeptuneButtons::MENU, ButtonFlags::Back),
    (NeptuneButtons::STEAM, ButtonFlags::Special),
    (NeptuneButtons::QUICK_ACCESS, ButtonFlags::OEM1),
    (NeptuneButtons::L1, ButtonFlags::L1),
    (NeptuneButtons::R1, ButtonFlags::R1),
    (NeptuneButtons::L4, ButtonFlags::L4),
    (NeptuneButtons::R4, ButtonFlags::R4),
    (NeptuneButtons::L5, ButtonFlags::L5),
    (NeptuneButtons::R5, ButtonFlags::R5),
    (NeptuneButtons::LEFT_STICK_PRESS, ButtonFlags::LeftStickClick),
    (NeptuneButtons::RIGHT_STICK_PRESS, ButtonFlags::RightStickClick),
    (NeptuneButtons::LEFT_STICK_TOUCH, ButtonFlags::LeftStickTouch),
    (NeptuneButtons::RIGHT_STICK_TOUCH, ButtonFlags::RightStickTouch),
    (NeptuneButtons::LEFT_PAD_TOUCH, ButtonFlags::LeftPadTouch),
    (NeptuneButtons::RIGHT_PAD_TOUCH, ButtonFlags::RightPadTouch),
];

struct PadFlags {
    touch: NeptuneButtons,
    press: NeptuneButtons,
    x: AxisFlags,
    y: AxisFlags,
    click: ButtonFlags,
    up: ButtonFlags,
    down: ButtonFlags,
    left: ButtonFlags,
    right: ButtonFlags,
}

const LEFT_PAD: PadFlags = PadFlags {
    touch: NeptuneButtons::LEFT_PAD_TOUCH,
    press: NeptuneButtons::LEFT_PAD_PRESS,
    x: AxisFlags::LeftPadX,
    y: AxisFlags::LeftPadY,
    click: ButtonFlags::LeftPadClick,
    up: ButtonFlags::LeftPadClickUp,
    down: ButtonFlags::LeftPadClickDown,
    left: ButtonFlags::LeftPadClickLeft,
    right: ButtonFlags::LeftPadClickRight,
};

const RIGHT_PAD: PadFlags = PadFlags {
    touch: NeptuneButtons::RIGHT_PAD_TOUCH,
    press: NeptuneButtons::RIGHT_PAD_PRESS,
    x: AxisFlags::RightPadX,
    y: AxisFlags::RightPadY,
    click: ButtonFlags::RightPadClick,
    up: ButtonFlags::RightPadClickUp,
    down: ButtonFlags::RightPadClickDown,
    left: ButtonFlags::RightPadClickLeft,
    right: ButtonFlags::RightPadClickRight,
};

fn map_pad(report: &NeptuneInputReport, position: [i16; 2], pad: &PadFlags, state: &mut ControllerState) {
    let [x, y] = position;
    let touched = report.is_pressed(pad.touch);
    let clicked = report.is_pressed(pad.press);

    let buttons = &mut state.buttons;
    buttons.set(pad.click, clicked);
    buttons.set(pad.up, clicked && y > PAD_INNER_THRESHOLD);
    buttons.set(pad.down, clicked && y < -PAD_INNER_THRESHOLD);
    buttons.set(pad.left, clicked && x < -PAD_INNER_THRESHOLD);
    buttons.set(pad.right, clicked && x > PAD_INNER_THRESHOLD);

    let (x, y) = if touched { (x, y) } else { (0, 0) };
    state.axes.set(pad.x, x);
    state.axes.set(pad.y, y);
}

/// Decode one deck report into `state`.
pub fn map_report(report: &NeptuneInputReport, scale: &SensorScale, state: &mut ControllerState) {
    for (bit, flag) in BUTTON_MAP {
        state.buttons.set(flag, report.is_pressed(bit));
    }

    let left_trigger = report.left_trigger_byte();
    let right_trigger = report.right_trigger_byte();
    state.buttons.set(ButtonFlags::L2Soft, left_trigger > SOFT_PULL);
    state.buttons.set(ButtonFlags::R2Soft, right_trigger > SOFT_PULL);
    state.buttons.set(ButtonFlags::L2Full, left_trigger > FULL_PULL);
    state.buttons.set(ButtonFlags::R2Full, right_trigger > FULL_PULL);
    state.axes.set(AxisFlags::L2, i16::from(left_trigger));
    state.axes.set(AxisFlags::R2, i16::from(right_trigger));

    let [lx, ly] = report.left_stick;
    let [rx, ry] = report.right_stick;
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

    map_pad(report, report.left_pad, &LEFT_PAD, state);
    map_pad(report, report.right_pad, &RIGHT_PAD, state);

    let [gx, gy, gz] = scale.gyro(report.gyro);
    let [ax, ay, az] = scale.accel(report.accel);
    state.gyro.set_gyroscope(gx, gy, gz);
    state.gyro.set_accelerometer(ax, ay, az);
}

fn amplitude(strength: HapticStrength) -> u16 {
    match strength {
        HapticStrength::Low => HAPTIC_AMPLITUDE_LOW,
        HapticStrength::Medium => HAPTIC_AMPLITUDE_MEDIUM,
        HapticStrength::High => HAPTIC_AMPLITUDE_HIGH,
    }
}

/// Steam Deck adapter.
#[derive(Debug)]
pub struct NeptuneAdapter {
    core: AdapterCore,
    link: HidLink,
    scale: SensorScale,
    strength: f64,
    heartbeat_ms: f32,
    rumble: (u8, u8),
    rumble_ms: f32,
    clock_ms: f64,
}

impl NeptuneAdapter {
    pub fn new(options: &AdapterOptions) -> Self {
        let core = AdapterCore::new(AdapterKind::Neptune.name());
        let link = HidLink::new(core.status_cell().clone(), options.read_timeout_ms);
        Self {
            core,
            link,
            scale: options.sensors.neptune(),
            strength: options.vibration_strength,
            heartbeat_ms: 0.0,
            rumble: (0, 0),
            rumble_ms: 0.0,
            clock_ms: 0.0,
        }
    }

    pub fn link(&self) -> &HidLink {
        &self.link
    }

    fn send_features(&self, reports: &[neptune::FeatureReport], what: &str) {
        for report in reports {
            if let Err(e) = self.link.send_feature_report(report) {
                debug!("Steam Deck {} failed: {}", what, e);
                return;
            }
        }
    }

    fn set_lizard_mode(&self, enabled: bool) {
        if self.link.is_open() {
            self.send_features(&neptune::lizard_mode(enabled), "lizard mode");
        }
    }

    fn heartbeat(&mut self, delta_ms: f32) {
        if !self.core.is_plugged() {
            return;
        }
        self.heartbeat_ms += delta_ms;
        if self.heartbeat_ms >= HEARTBEAT_INTERVAL.as_secs_f32() * 1000.0 {
            self.heartbeat_ms = 0.0;
            trace!("Steam Deck heartbeat");
            self.set_lizard_mode(false);
        }
    }

    fn rumble_step(&mut self, delta_ms: f32) {
        let (large, small) = self.rumble;
        if large == 0 && small == 0 {
            return;
        }
        self.rumble_ms += delta_ms;
        if self.rumble_ms < RUMBLE_INTERVAL_MS {
            return;
        }
        self.rumble_ms = 0.0;

        let timestamp = self.clock_ms as u32;
        let mut steps = Vec::with_capacity(2);
        if let Some(level) = neptune::haptic_intensity(large, self.strength) {
            steps.push(neptune::haptic_rumble(HapticMotor::Left, HapticStyle::Weak, level, timestamp));
        }
        if let Some(level) = neptune::haptic_intensity(small, self.strength) {
            steps.push(neptune::haptic_rumble(HapticMotor::Right, HapticStyle::Weak, level, timestamp));
        }
        self.send_features(&steps, "rumble");
    }
}

impl ControllerAdapter for NeptuneAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Neptune
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn status(&self) -> AdapterStatus {
        self.core.status()
    }

    fn attach(&mut self, port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError> {
        self.link.open(port, info)?;
        if let Some(name) = neptune::product_name(info.product_id) {
            self.core.set_name(name);
        }
        info!("Steam Deck controller ready on {}", info.path);
        if self.core.is_plugged() {
            self.plug();
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.link.close();
        self.rumble = (0, 0);
        self.core.reset();
    }

    fn plug(&mut self) {
        self.core.set_plugged(true);
        self.heartbeat_ms = 0.0;
        self.set_lizard_mode(false);
    }

    fn unplug(&mut self) {
        self.core.set_plugged(false);
        self.rumble = (0, 0);
        self.set_lizard_mode(true);
    }

    fn is_plugged(&self) -> bool {
        self.core.is_plugged()
    }

    fn tick(&mut self, ticks: u64, delta_ms: f32, commit: bool) {
        if self.core.status() != AdapterStatus::Connected {
            return;
        }
        self.clock_ms += f64::from(delta_ms);
        self.heartbeat(delta_ms);
        self.rumble_step(delta_ms);

        let Some(raw) = self.link.latest() else {
            return;
        };
        let report = match neptune::parse(&raw) {
            Ok(report) => report,
            Err(e) => {
                trace!("Skipping Steam Deck report: {}", e);
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
            ButtonFlags::L4,
            ButtonFlags::R4,
            ButtonFlags::L5,
            ButtonFlags::R5,
            ButtonFlags::LeftStickTouch,
            ButtonFlags::RightStickTouch,
            ButtonFlags::LeftPadTouch,
            ButtonFlags::LeftPadClick,
            ButtonFlags::LeftPadClickUp,
            ButtonFlags::LeftPadClickDown,
            ButtonFlags::LeftPadClickLeft,
            ButtonFlags::LeftPadClickRight,
            ButtonFlags::RightPadTouch,
            ButtonFlags::RightPadClick,
            ButtonFlags::RightPadClickUp,
            ButtonFlags::RightPadClickDown,
            ButtonFlags::RightPadClickLeft,
            ButtonFlags::RightPadClickRight,
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
        if self.rumble == (0, 0) {
            // first step goes out on the next tick
            self.rumble_ms = RUMBLE_INTERVAL_MS;
        }
        self.rumble = (large_motor, small_motor);
    }

    fn inject_button(&mut self, flag: ButtonFlags, pressed: bool) {
        self.core.inject(flag, pressed);
    }

    fn pulse(&mut self, strength: HapticStrength) {
        if !self.link.is_open() {
            return;
        }
        let amplitude = amplitude(strength);
        let pulses = [
            neptune::haptic_pulse(HapticMotor::Left, amplitude, 0, 1),
            neptune::haptic_pulse(HapticMotor::Right, amplitude, 0, 1),
        ];
        self.send_features(&pulses, "haptic pulse");
    }
}

impl Drop for NeptuneAdapter {
    fn drop(&mut self) {
        if self.core.is_plugged() {
            self.set_lizard_mode(true);
        }
    }
}
