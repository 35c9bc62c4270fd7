//! Snapshot tests for DualSense output reports.

use handheld_hid_dualsense_protocol::rumble_report;

fn head(report: &[u8]) -> String {
    report
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_snapshot_rumble_report() {
    insta::assert_snapshot!(head(&rumble_report(0xFF, 0x40)), @"02 03 00 40 ff 00 00 00");
}

#[test]
fn test_snapshot_rumble_stop() {
    insta::assert_snapshot!(head(&rumble_report(0, 0)), @"02 03 00 00 00 00 00 00");
}
