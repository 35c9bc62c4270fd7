use std::sync::Arc;

use handheld_hid_legion_protocol::{self as legion, LegionBack, LegionFront, ScrollWheel};
use handheld_hid_xinput_protocol::{XInputButtons, XInputGamepad, XInputState};
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::mock::{MockHidDevice, MockHidPort};
use openhandheld_hid_common::{HidDevice, HidDeviceInfo};
use openhandheld_input::{AxisFlags, ButtonFlags, ButtonState};
use openhandheld_test_helpers::prelude::*;

use super::legion_go::{LegionAdapter, TapGesture, TouchGestures};
use super::xinput::MemoryXInput;
use super::{AdapterOptions, AdapterStatus, ControllerAdapter, GyroSource};

const PATH: &str = "/dev/hidraw-legion";

struct Rig {
    port: MockHidPort,
    device: MockHidDevice,
    info: HidDeviceInfo,
    xinput: MemoryXInput,
    adapter: LegionAdapter,
}

impl Rig {
    fn with_options(options: &AdapterOptions) -> Result<Self, DeviceError> {
        let device = MockHidDevice::from_info(
            HidDeviceInfo::new(legion::LENOVO_VENDOR_ID, legion::ids::LEGION_GO_DUAL_DINPUT, PATH)
                .with_usage_page(legion::ids::VENDOR_USAGE_PAGE),
        );
        let info = device.get_device_info().clone();
        let mut port = MockHidPort::new();
        port.add_device(device.clone());

        let xinput = MemoryXInput::new();
        xinput.set_state(0, XInputState::default());
        let mut adapter = LegionAdapter::new(Arc::new(xinput.clone()), options);
        adapter.attach(&port, &info)?;
        Ok(Self {
            port,
            device,
            info,
            xinput,
            adapter,
        })
    }

    fn attached() -> Result<Self, DeviceError> {
        Self::with_options(&AdapterOptions::default())
    }

    fn feed(&mut self, report: &LegionReport, tick: u64) -> bool {
        let before = self.adapter.link().slot().received();
        self.device.queue_read(report.build());
        let arrived = wait_until(WAIT_TIMEOUT, || self.adapter.link().slot().received() > before);
        self.adapter.tick(tick, 10.0, true);
        arrived
    }
}

#[test]
fn test_hid_buttons_layer_over_xinput() -> TestResult {
    let mut rig = Rig::attached()?;
    assert_eq!(rig.adapter.name(), "Legion Go Controller (Dual DInput)");
    rig.xinput.set_state(
        0,
        XInputState {
            packet_number: 3,
            gamepad: XInputGamepad {
                buttons: XInputButtons::A | XInputButtons::GUIDE,
                left_trigger: 200,
                thumb_lx: 15000,
                ..XInputGamepad::default()
            },
        },
    );
    let report = LegionReport::new()
        .front(LegionFront::LEGION_L)
        .back(LegionBack::M3 | LegionBack::Y1 | LegionBack::M2)
        .scroll_click()
        .scroll(ScrollWheel::Down);
    assert!(rig.feed(&report, 4));

    let state = rig.adapter.state();
    assert_eq!(state.tick, 4);
    for flag in [
        ButtonFlags::B1,
        ButtonFlags::OEM2,
        ButtonFlags::R4,
        ButtonFlags::L4,
        ButtonFlags::B5,
        ButtonFlags::B6,
        ButtonFlags::B8,
        ButtonFlags::L2Soft,
        ButtonFlags::LeftStickRight,
    ] {
        assert!(state.buttons.is_pressed(flag), "{flag} should be held");
    }
    assert!(!state.buttons.is_pressed(ButtonFlags::Special));
    assert!(!state.buttons.is_pressed(ButtonFlags::OEM1));
    assert!(!state.buttons.is_pressed(ButtonFlags::B7));
    assert_eq!(state.axes.get(AxisFlags::L2), 200);
    assert_eq!(state.axes.get(AxisFlags::LeftStickX), 15000);
    Ok(())
}

#[test]
fn test_not_ready_report_keeps_xinput_half() -> TestResult {
    let mut rig = Rig::attached()?;
    rig.xinput.set_state(
        0,
        XInputState {
            packet_number: 1,
            gamepad: XInputGamepad {
                buttons: XInputButtons::Y,
                ..XInputGamepad::default()
            },
        },
    );
    assert!(rig.feed(&LegionReport::new().status(0).back(LegionBack::Y3), 1));

    let state = rig.adapter.state();
    assert!(state.buttons.is_pressed(ButtonFlags::B4));
    assert!(!state.buttons.is_pressed(ButtonFlags::R5));
    Ok(())
}

#[test]
fn test_touch_maps_to_right_pad_with_y_flipped() -> TestResult {
    let mut rig = Rig::attached()?;
    assert!(rig.feed(&LegionReport::new().touch(500, 250), 1));

    let state = rig.adapter.state();
    assert!(state.buttons.is_pressed(ButtonFlags::RightPadTouch));
    assert_eq!(state.axes.get(AxisFlags::RightPadX), -1);
    assert_eq!(state.axes.get(AxisFlags::RightPadY), 16383);

    // Lifting a quick touch reports the short tap for one tick.
    assert!(rig.feed(&LegionReport::new(), 2));
    let state = rig.adapter.state();
    assert!(state.buttons.is_pressed(ButtonFlags::RightPadTouch));
    assert!(state.buttons.is_pressed(ButtonFlags::RightPadClick));
    assert_eq!(state.axes.get(AxisFlags::RightPadX), 0);
    assert_eq!(state.axes.get(AxisFlags::RightPadY), 0);

    assert!(rig.feed(&LegionReport::new(), 3));
    let state = rig.adapter.state();
    assert!(!state.buttons.is_pressed(ButtonFlags::RightPadTouch));
    assert!(!state.buttons.is_pressed(ButtonFlags::RightPadClick));
    Ok(())
}

#[test]
fn test_imu_side_follows_options() -> TestResult {
    let report = LegionReport::new()
        .left_imu([0, 0, 0], [0, 0, i16::MAX])
        .right_imu([0, 0, 0], [0, 0, i16::MAX]);

    let mut right = Rig::attached()?;
    assert!(right.feed(&report, 1));
    let [_, _, yaw] = right.adapter.state().gyro.angular_velocity;
    assert!((yaw - 2000.0).abs() < 0.01);

    let options = AdapterOptions {
        legion_gyro_source: GyroSource::Left,
        ..AdapterOptions::default()
    };
    let mut left = Rig::with_options(&options)?;
    assert!(left.feed(&report, 1));
    let [_, _, yaw] = left.adapter.state().gyro.angular_velocity;
    assert!((yaw + 2000.0).abs() < 0.01);
    Ok(())
}

#[test]
fn test_works_without_xinput_half() -> TestResult {
    let mut rig = Rig::attached()?;
    rig.xinput.unplug(0);
    rig.adapter.detach();
    rig.adapter.attach(&rig.port, &rig.info)?;
    assert!(rig.adapter.is_connected());
    assert!(!rig.adapter.xinput().is_connected());

    assert!(rig.feed(&LegionReport::new().front(LegionFront::LEGION_R), 1));
    assert!(rig.adapter.state().buttons.is_pressed(ButtonFlags::OEM1));
    Ok(())
}

#[test]
fn test_vibration_goes_to_xinput_slot() -> TestResult {
    let mut rig = Rig::attached()?;
    rig.adapter.set_vibration(0, 255);
    let sent = rig.xinput.vibrations();
    let (user, vibration) = must_some(sent.first().copied(), "vibration");
    assert_eq!(user, 0);
    assert_eq!(vibration.right_motor_speed, u16::MAX);
    Ok(())
}

#[test]
fn test_detach_leaves_adapter_disconnected() -> TestResult {
    let mut rig = Rig::attached()?;
    rig.adapter.detach();
    assert_eq!(rig.adapter.status(), AdapterStatus::Disconnected);
    rig.adapter.tick(1, 10.0, true);
    assert_eq!(rig.adapter.state().tick, 0);
    Ok(())
}

fn step(gestures: &mut TouchGestures, touch: Option<[u16; 2]>) -> (Option<TapGesture>, ButtonState) {
    let mut buttons = ButtonState::new();
    let gesture = gestures.update(10.0, touch, &mut buttons);
    (gesture, buttons)
}

#[test]
fn test_short_tap_clicks_on_release_tick_only() {
    let mut gestures = TouchGestures::new();
    let (gesture, buttons) = step(&mut gestures, Some([500, 500]));
    assert_eq!(gesture, None);
    assert!(buttons.is_pressed(ButtonFlags::RightPadTouch));
    assert!(!buttons.is_pressed(ButtonFlags::RightPadClick));

    let (gesture, buttons) = step(&mut gestures, None);
    assert_eq!(gesture, Some(TapGesture::Short));
    assert!(buttons.is_pressed(ButtonFlags::RightPadClick));

    let (gesture, buttons) = step(&mut gestures, None);
    assert_eq!(gesture, None);
    assert!(buttons.is_empty());
}

#[test]
fn test_double_tap_holds_click_until_release() {
    let mut gestures = TouchGestures::new();
    step(&mut gestures, Some([500, 500]));
    step(&mut gestures, None);

    let (gesture, buttons) = step(&mut gestures, Some([520, 480]));
    assert_eq!(gesture, Some(TapGesture::Double));
    assert!(buttons.is_pressed(ButtonFlags::RightPadClick));

    let (gesture, buttons) = step(&mut gestures, Some([520, 480]));
    assert_eq!(gesture, None);
    assert!(buttons.is_pressed(ButtonFlags::RightPadClick));

    let (gesture, buttons) = step(&mut gestures, None);
    assert_eq!(gesture, None);
    assert!(!buttons.is_pressed(ButtonFlags::RightPadClick));
}

#[test]
fn test_late_second_tap_is_not_double() {
    let mut gestures = TouchGestures::new();
    step(&mut gestures, Some([500, 500]));
    step(&mut gestures, None);
    for _ in 0..31 {
        step(&mut gestures, None);
    }
    let (gesture, buttons) = step(&mut gestures, Some([500, 500]));
    assert_eq!(gesture, None);
    assert!(!buttons.is_pressed(ButtonFlags::RightPadClick));
}

#[test]
fn test_long_tap_holds_click_down() {
    let mut gestures = TouchGestures::new();
    for _ in 0..50 {
        let (gesture, _) = step(&mut gestures, Some([300, 300]));
        assert_eq!(gesture, None);
    }
    let (gesture, buttons) = step(&mut gestures, Some([310, 300]));
    assert_eq!(gesture, Some(TapGesture::Long));
    assert!(buttons.is_pressed(ButtonFlags::RightPadClick));
    assert!(buttons.is_pressed(ButtonFlags::RightPadClickDown));

    let (gesture, buttons) = step(&mut gestures, None);
    assert_eq!(gesture, None);
    assert!(!buttons.is_pressed(ButtonFlags::RightPadClickDown));
}

#[test]
fn test_moving_finger_is_not_a_tap() {
    let mut gestures = TouchGestures::new();
    step(&mut gestures, Some([100, 100]));
    step(&mut gestures, Some([300, 100]));
    step(&mut gestures, Some([100, 100]));
    let (gesture, buttons) = step(&mut gestures, None);
    assert_eq!(gesture, None);
    assert!(buttons.is_empty());
}
