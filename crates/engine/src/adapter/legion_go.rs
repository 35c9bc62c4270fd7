//! Lenovo Legion Go detachable controllers.
//!
//! # Device
//! - VID `0x17EF`, PIDs `0x6182..=0x6185`, vendor usage page `0xFFA0`
//!
//! # Protocol
//! The pad shows up twice: as an XInput pad for sticks, triggers and face
//! buttons, and as a vendor HID collection carrying the Legion buttons, the
//! back paddles, the scroll wheel, the right touchpad and both joycon IMUs.
//! This adapter ticks an [`XInputAdapter`] for the first half without
//! committing it and layers the HID half on top. The HID half is skipped
//! until the status byte reads ready.

use std::sync::Arc;

use handheld_hid_legion_protocol::{
    self as legion, ImuSide, LegionBack, LegionFront, LegionInputReport, ScrollWheel, TOUCHPAD_MAX,
};
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_input::{
    AxisFlags, AxisLayoutSet, ButtonFlags, ButtonState, ControllerState, SharedControllerState,
};
use openhandheld_ipc::ControllerCapabilities;
use tracing::{debug, info, trace, warn};

use super::reader::HidLink;
use super::scale::SensorScale;
use super::xinput::{XInputAdapter, XInputSource};
use super::{AdapterCore, AdapterKind, AdapterOptions, AdapterStatus, ControllerAdapter};

/// Farthest apart, in touchpad units, the two taps of a double tap may be.
pub const DOUBLE_TAP_MAX_DISTANCE: f32 = 100.0;
/// Longest gap between the first release and the second touch of a double tap.
pub const DOUBLE_TAP_MAX_MS: f64 = 300.0;
/// Hold time after which a still finger is a long tap.
pub const LONG_TAP_MS: f64 = 500.0;
/// Movement that disqualifies a touch as a tap.
pub const LONG_TAP_MAX_MOVEMENT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapGesture {
    Short,
    Double,
    Long,
}

fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let [ax, ay] = a;
    let [bx, by] = b;
    (ax - bx).hypot(ay - by)
}

/// Tap recognition on the Legion touchpad.
///
/// A short tap clicks the pad for the release tick only. A double tap holds
/// the click from the second touch until release. A long tap holds both the
/// click and the lower click zone until release.
#[derive(Debug, Clone, Default)]
pub struct TouchGestures {
    clock_ms: f64,
    touched: bool,
    start_ms: f64,
    start: [f32; 2],
    last: [f32; 2],
    pending_tap: Option<(f64, [f32; 2])>,
    long_triggered: bool,
    valid_tap: bool,
    held: Option<TapGesture>,
}

impl TouchGestures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick. `touch` is the finger position, `None` when
    /// lifted. Writes the pad buttons into `buttons` and returns the gesture
    /// recognised on this tick.
    pub fn update(
        &mut self,
        delta_ms: f32,
        touch: Option<[u16; 2]>,
        buttons: &mut ButtonState,
    ) -> Option<TapGesture> {
        self.clock_ms += f64::from(delta_ms);
        match touch {
            Some([x, y]) => self.touching([f32::from(x), f32::from(y)], buttons),
            None => self.released(buttons),
        }
    }

    fn touching(&mut self, position: [f32; 2], buttons: &mut ButtonState) -> Option<TapGesture> {
        buttons.press(ButtonFlags::RightPadTouch);
        let mut recognised = None;

        if !self.touched {
            self.touched = true;
            self.start_ms = self.clock_ms;
            self.start = position;
            self.long_triggered = false;
            self.valid_tap = true;

            if let Some((at, spot)) = self.pending_tap.take() {
                if self.clock_ms - at <= DOUBLE_TAP_MAX_MS && distance(spot, position) <= DOUBLE_TAP_MAX_DISTANCE {
                    self.held = Some(TapGesture::Double);
                    recognised = self.held;
                }
            }
        } else if !self.long_triggered
            && self.held.is_none()
            && self.clock_ms - self.start_ms >= LONG_TAP_MS
            && distance(self.start, position) <= LONG_TAP_MAX_MOVEMENT
        {
            self.held = Some(TapGesture::Long);
            self.long_triggered = true;
            recognised = self.held;
        } else if distance(self.start, position) > LONG_TAP_MAX_MOVEMENT {
            self.valid_tap = false;
        }
        self.last = position;

        match self.held {
            Some(TapGesture::Double) => buttons.press(ButtonFlags::RightPadClick),
            Some(TapGesture::Long) => {
                buttons.press(ButtonFlags::RightPadClick);
                buttons.press(ButtonFlags::RightPadClickDown);
            }
            Some(TapGesture::Short) | None => {}
        }
        recognised
    }

    fn released(&mut self, buttons: &mut ButtonState) -> Option<TapGesture> {
        buttons.release(ButtonFlags::RightPadClick);
        buttons.release(ButtonFlags::RightPadClickDown);
        if !self.touched {
            return None;
        }
        self.touched = false;

        let held = self.held.take();
        let short = held.is_none()
            && !self.long_triggered
            && self.valid_tap
            && self.clock_ms - self.start_ms < LONG_TAP_MS
            && distance(self.start, self.last) <= DOUBLE_TAP_MAX_DISTANCE;
        if !short {
            return None;
        }

        buttons.press(ButtonFlags::RightPadTouch);
        buttons.press(ButtonFlags::RightPadClick);
        self.pending_tap = Some((self.clock_ms, self.last));
        Some(TapGesture::Short)
    }
}

/// Touchpad units to a full-range axis.
fn touch_axis(value: u16) -> i16 {
    let value = i32::from(value.min(TOUCHPAD_MAX));
    let span = i32::from(i16::MAX) - i32::from(i16::MIN);
    let mapped = i32::from(i16::MIN) + value * span / i32::from(TOUCHPAD_MAX);
    i16::try_from(mapped).unwrap_or(i16::MAX)
}

const BACK_MAP: [(LegionBack, ButtonFlags); 5] = [
    (LegionBack::M3, ButtonFlags::R4),
    (LegionBack::Y3, ButtonFlags::R5),
    (LegionBack::Y1, ButtonFlags::L4),
    (LegionBack::Y2, ButtonFlags::L5),
    (LegionBack::M2, ButtonFlags::B5),
];

/// Legion Go adapter.
#[derive(Debug)]
pub struct LegionAdapter {
    base: XInputAdapter,
    core: AdapterCore,
    link: HidLink,
    side: ImuSide,
    scale: SensorScale,
    gestures: TouchGestures,
}

impl LegionAdapter {
    pub fn new(xinput: Arc<dyn XInputSource>, options: &AdapterOptions) -> Self {
        let core = AdapterCore::new(AdapterKind::Legion.name());
        let link = HidLink::new(core.status_cell().clone(), options.read_timeout_ms);
        let side = ImuSide::from(options.legion_gyro_source);
        Self {
            base: XInputAdapter::new(xinput, options),
            core,
            link,
            side,
            scale: options.sensors.legion(side),
            gestures: TouchGestures::new(),
        }
    }

    pub fn link(&self) -> &HidLink {
        &self.link
    }

    pub fn xinput(&self) -> &XInputAdapter {
        &self.base
    }

    fn map_report(&mut self, report: &LegionInputReport, delta_ms: f32) {
        let scale = self.scale;
        let side = self.side;
        let state = self.core.working_mut();

        state.buttons.set(ButtonFlags::OEM1, report.front.contains(LegionFront::LEGION_R));
        state.buttons.set(ButtonFlags::OEM2, report.front.contains(LegionFront::LEGION_L));
        for (bit, flag) in BACK_MAP {
            state.buttons.set(flag, report.back.contains(bit));
        }
        state.buttons.set(ButtonFlags::B6, report.scroll_click);
        state.buttons.set(ButtonFlags::B7, report.scroll == ScrollWheel::Up);
        state.buttons.set(ButtonFlags::B8, report.scroll == ScrollWheel::Down);

        let touch = report.is_touched().then_some(report.touch);
        match touch {
            Some([x, y]) => {
                state.axes.set(AxisFlags::RightPadX, touch_axis(x));
                state.axes.set(AxisFlags::RightPadY, touch_axis(TOUCHPAD_MAX.saturating_sub(y)));
            }
            None => {
                state.axes.set(AxisFlags::RightPadX, 0);
                state.axes.set(AxisFlags::RightPadY, 0);
            }
        }
        if let Some(gesture) = self.gestures.update(delta_ms, touch, &mut state.buttons) {
            trace!("Legion touchpad {:?}", gesture);
        }

        apply_imu(state, report, side, &scale);
    }
}

fn apply_imu(state: &mut ControllerState, report: &LegionInputReport, side: ImuSide, scale: &SensorScale) {
    let sample = report.imu(side);
    let [gx, gy, gz] = scale.gyro(sample.gyro);
    let [ax, ay, az] = scale.accel(sample.accel);
    state.gyro.set_gyroscope(gx, gy, gz);
    state.gyro.set_accelerometer(ax, ay, az);
}

impl ControllerAdapter for LegionAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Legion
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn status(&self) -> AdapterStatus {
        self.core.status()
    }

    fn attach(&mut self, port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError> {
        self.link.open(port, info)?;
        if let Some(name) = legion::product_name(info.product_id) {
            self.core.set_name(name);
        }
        if self.base.attach_user(None).is_err() {
            warn!("Legion Go XInput half not found, sticks and triggers unavailable");
        }
        info!("Legion Go controller ready on {}", info.path);
        if self.core.is_plugged() {
            self.plug();
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.link.close();
        self.base.detach();
        self.gestures = TouchGestures::new();
        self.core.reset();
    }

    fn plug(&mut self) {
        self.core.set_plugged(true);
        self.base.plug();
    }

    fn unplug(&mut self) {
        self.core.set_plugged(false);
        self.base.unplug();
    }

    fn is_plugged(&self) -> bool {
        self.core.is_plugged()
    }

    fn tick(&mut self, ticks: u64, delta_ms: f32, commit: bool) {
        if self.core.status() != AdapterStatus::Connected {
            return;
        }

        self.base.tick(ticks, delta_ms, false);
        let base_connected = self.base.is_connected();
        let (buttons, axes) = (self.base.working().buttons, self.base.working().axes);
        let state = self.core.begin(ticks);
        if base_connected {
            state.buttons = buttons;
            state.axes = axes;
        }
        // the guide button is not wired on this pad
        state.buttons.release(ButtonFlags::Special);

        if let Some(raw) = self.link.latest() {
            match legion::parse(legion::strip_report_id(&raw)) {
                Ok(report) if report.is_ready() => self.map_report(&report, delta_ms),
                Ok(report) => trace!("Legion Go not ready, status {}", report.status),
                Err(e) => debug!("Skipping Legion Go report: {}", e),
            }
        }

        if commit {
            self.core.commit();
        }
    }

    fn state(&self) -> SharedControllerState {
        self.core.state()
    }

    fn source_buttons(&self) -> ButtonState {
        let mut buttons = ButtonFlags::common();
        buttons.release(ButtonFlags::Special);
        for flag in [
            ButtonFlags::OEM1,
            ButtonFlags::OEM2,
            ButtonFlags::RightPadTouch,
            ButtonFlags::RightPadClick,
            ButtonFlags::RightPadClickDown,
            ButtonFlags::R4,
            ButtonFlags::R5,
            ButtonFlags::L4,
            ButtonFlags::L5,
            ButtonFlags::B5,
            ButtonFlags::B6,
            ButtonFlags::B7,
            ButtonFlags::B8,
        ] {
            buttons.press(flag);
        }
        buttons
    }

    fn source_axes(&self) -> AxisLayoutSet {
        AxisLayoutSet::COMMON | AxisLayoutSet::RIGHT_PAD | AxisLayoutSet::GYROSCOPE
    }

    fn capabilities(&self) -> ControllerCapabilities {
        ControllerCapabilities::all()
    }

    fn set_vibration(&mut self, large_motor: u8, small_motor: u8) {
        self.base.set_vibration(large_motor, small_motor);
    }

    fn inject_button(&mut self, flag: ButtonFlags, pressed: bool) {
        self.core.inject(flag, pressed);
    }
}
