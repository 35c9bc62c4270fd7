//! Snapshot tests for the virtual target wire formats.
//!
//! These lock in the byte layout games and drivers depend on.

use std::time::Duration;

use openhandheld_input::{AxisFlags, ButtonFlags, ControllerState};
use openhandheld_targets::{Ds4ReportBuilder, Feedback, Xbox360Report};

fn hex(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|row| {
            row.iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_snapshot_x360_report() {
    let state = ControllerState::default()
        .with_button(ButtonFlags::B1)
        .with_button(ButtonFlags::DPadUp)
        .with_axis(AxisFlags::L2, 255)
        .with_axis(AxisFlags::LeftStickX, i16::MIN)
        .with_axis(AxisFlags::RightStickY, i16::MAX);
    let bytes = Xbox360Report::from_state(&state).to_bytes();
    insta::assert_snapshot!(hex(&bytes), @"01 10 ff 00 00 80 00 00 00 00 ff 7f");
}

#[test]
fn test_snapshot_ds4_report_with_touch() {
    let mut state = ControllerState::default()
        .with_button(ButtonFlags::B1)
        .with_button(ButtonFlags::LeftPadTouch)
        .with_axis(AxisFlags::LeftPadX, 0)
        .with_axis(AxisFlags::LeftPadY, 0);
    state.gyro.set_accelerometer(0.0, 0.0, 1.0);

    let mut builder = Ds4ReportBuilder::new(Duration::from_millis(10));
    let report = builder.build(&state);
    insta::assert_snapshot!(hex(&report), @r"
    80 7f 80 7f 28 00 00 00 00 e8 03 00 00 00 00 00
    00 00 00 00 00 00 ff 1f 00 00 00 00 00 0b 00 00
    01 01 01 bf 73 1d 82 00 00 00 00 00 00 00 00 00
    00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
    ");
}

#[test]
fn test_snapshot_feedback_json() -> Result<(), serde_json::Error> {
    let json = serde_json::to_string(&Feedback {
        large_motor: 200,
        small_motor: 40,
    })?;
    insta::assert_snapshot!(json, @r#"{"large_motor":200,"small_motor":40}"#);
    Ok(())
}
