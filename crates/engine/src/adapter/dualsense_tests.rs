use handheld_hid_dualsense_protocol::{self as dualsense, DualSenseButtons};
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::mock::{MockHidDevice, MockHidPort};
use openhandheld_hid_common::{HidDevice, HidDeviceInfo};
use openhandheld_input::{AxisFlags, ButtonFlags};
use openhandheld_test_helpers::prelude::*;

use super::dualsense_pad::DualSenseAdapter;
use super::{AdapterOptions, AdapterStatus, ControllerAdapter};

const PATH: &str = "/dev/hidraw-dualsense";

struct Rig {
    device: MockHidDevice,
    adapter: DualSenseAdapter,
}

impl Rig {
    fn attached(options: &AdapterOptions) -> Result<Self, DeviceError> {
        let device = MockHidDevice::new(dualsense::SONY_VENDOR_ID, dualsense::DUALSENSE_PRODUCT_ID, PATH);
        let info: HidDeviceInfo = device.get_device_info().clone();
        let mut port = MockHidPort::new();
        port.add_device(device.clone());
        let mut adapter = DualSenseAdapter::new(options);
        adapter.attach(&port, &info)?;
        Ok(Self { device, adapter })
    }

    fn feed(&mut self, report: &DualSenseReport) -> bool {
        let before = self.adapter.link().slot().received();
        self.device.queue_read(report.build());
        let arrived = wait_until(WAIT_TIMEOUT, || self.adapter.link().slot().received() > before);
        self.adapter.tick(1, 10.0, true);
        arrived
    }
}

#[test]
fn test_attach_uses_product_name() -> TestResult {
    let rig = Rig::attached(&AdapterOptions::default())?;
    assert_eq!(rig.adapter.status(), AdapterStatus::Connected);
    assert_eq!(rig.adapter.name(), "DualSense Wireless Controller");
    Ok(())
}

#[test]
fn test_buttons_and_hat() -> TestResult {
    let mut rig = Rig::attached(&AdapterOptions::default())?;
    let report = DualSenseReport::new()
        .buttons(DualSenseButtons::CROSS | DualSenseButtons::CREATE | DualSenseButtons::PS | DualSenseButtons::MUTE)
        .hat(5);
    assert!(rig.feed(&report));

    let state = rig.adapter.state();
    for flag in [
        ButtonFlags::B1,
        ButtonFlags::Back,
        ButtonFlags::Special,
        ButtonFlags::OEM1,
        ButtonFlags::DPadDown,
        ButtonFlags::DPadLeft,
    ] {
        assert!(state.buttons.is_pressed(flag), "{flag} should be held");
    }
    assert!(!state.buttons.is_pressed(ButtonFlags::DPadUp));
    assert!(!state.buttons.is_pressed(ButtonFlags::B2));
    Ok(())
}

#[test]
fn test_sticks_center_and_flip_y() -> TestResult {
    let mut rig = Rig::attached(&AdapterOptions::default())?;
    assert!(rig.feed(&DualSenseReport::new().left_stick(255, 0).right_stick(0, 255).triggers(40, 250)));

    let state = rig.adapter.state();
    assert_eq!(state.axes.get(AxisFlags::LeftStickX), i16::MAX);
    assert_eq!(state.axes.get(AxisFlags::LeftStickY), i16::MAX);
    assert_eq!(state.axes.get(AxisFlags::RightStickX), i16::MIN);
    assert_eq!(state.axes.get(AxisFlags::RightStickY), i16::MIN);
    assert!(state.buttons.is_pressed(ButtonFlags::LeftStickUp));
    assert!(state.buttons.is_pressed(ButtonFlags::RightStickDown));

    assert_eq!(state.axes.get(AxisFlags::L2), 40);
    assert!(state.buttons.is_pressed(ButtonFlags::L2Soft));
    assert!(!state.buttons.is_pressed(ButtonFlags::L2Full));
    assert!(state.buttons.is_pressed(ButtonFlags::R2Full));
    Ok(())
}

#[test]
fn test_neutral_report_is_neutral() -> TestResult {
    let mut rig = Rig::attached(&AdapterOptions::default())?;
    assert!(rig.feed(&DualSenseReport::new()));
    let state = rig.adapter.state();
    assert!(state.buttons.is_empty());
    // A byte-centred stick rests within one byte step of zero.
    assert_eq!(state.axes.get(AxisFlags::LeftStickX), 128);
    assert_eq!(state.axes.get(AxisFlags::LeftStickY), -129);
    assert!(!state.buttons.is_pressed(ButtonFlags::LeftStickDown));
    Ok(())
}

#[test]
fn test_second_finger_drives_right_pad() -> TestResult {
    let mut rig = Rig::attached(&AdapterOptions::default())?;
    let report = DualSenseReport::new()
        .buttons(DualSenseButtons::TOUCHPAD)
        .touch(1, 3, 1919, 1079);
    assert!(rig.feed(&report));

    let state = rig.adapter.state();
    assert!(state.buttons.is_pressed(ButtonFlags::RightPadTouch));
    assert!(state.buttons.is_pressed(ButtonFlags::RightPadClick));
    assert!(!state.buttons.is_pressed(ButtonFlags::LeftPadTouch));
    assert!(!state.buttons.is_pressed(ButtonFlags::LeftPadClick));
    assert_eq!(state.axes.get(AxisFlags::RightPadX), i16::MAX);
    assert_eq!(state.axes.get(AxisFlags::RightPadY), i16::MIN);
    assert_eq!(state.axes.get(AxisFlags::LeftPadX), 0);
    Ok(())
}

#[test]
fn test_rumble_writes_output_report() -> TestResult {
    let options = AdapterOptions {
        vibration_strength: 0.5,
        ..AdapterOptions::default()
    };
    let mut rig = Rig::attached(&options)?;
    rig.adapter.set_vibration(200, 100);

    let writes = rig.device.get_write_history();
    let report = must_some(writes.first(), "rumble report");
    assert_eq!(report.len(), dualsense::OUTPUT_REPORT_LEN);
    assert_eq!(report.get(..5), Some(&[0x02, 0x03, 0x00, 50, 100][..]));
    Ok(())
}

#[test]
fn test_unplug_stops_rumble() -> TestResult {
    let mut rig = Rig::attached(&AdapterOptions::default())?;
    rig.adapter.plug();
    rig.adapter.set_vibration(255, 255);
    rig.adapter.unplug();

    let writes = rig.device.get_write_history();
    let last = must_some(writes.last(), "stop report");
    assert_eq!(last.get(3..5), Some(&[0, 0][..]));
    Ok(())
}
