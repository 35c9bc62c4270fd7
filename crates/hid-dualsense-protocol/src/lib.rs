//! Sony DualSense HID protocol.
//!
//! Decodes the 64-byte USB input report (report ID `0x01`) and builds the
//! 48-byte rumble output report (report ID `0x02`). Bluetooth reports use a
//! different layout with a CRC trailer and are not handled here.
//!
//! # Example
//!
//! ```
//! use handheld_hid_dualsense_protocol::{DualSenseButtons, Hat, parse};
//!
//! let mut report = [0u8; 64];
//! report[0] = 0x01;
//! report[8] = 0x20 | 0x06;
//! let input = parse(&report)?;
//! assert!(input.is_pressed(DualSenseButtons::CROSS));
//! assert_eq!(input.hat, Hat::Left);
//! # Ok::<(), handheld_hid_dualsense_protocol::ParseError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod input;
pub mod output;

pub use ids::{
    DUALSENSE_EDGE_PRODUCT_ID, DUALSENSE_PRODUCT_ID, SONY_VENDOR_ID, is_dualsense, product_name,
};
pub use input::{
    ACCEL_RANGE_G, DualSenseButtons, DualSenseInputReport, GYRO_RANGE_DPS, Hat, ParseError,
    REPORT_ID, REPORT_LEN, TOUCHPAD_HEIGHT, TOUCHPAD_WIDTH, TouchContact, axis_from_byte,
    inverted_axis_from_byte, offsets, parse,
};
pub use output::{OUTPUT_REPORT_ID, OUTPUT_REPORT_LEN, OutputReport, rumble_report};
