//! Lenovo Legion Go controller HID protocol.
//!
//! The Legion Go's detachable controllers present an XInput pad for the
//! common buttons and sticks, plus a vendor HID collection carrying
//! everything XInput cannot: the Legion buttons, the back paddles, the
//! scroll wheel, the right-hand touchpad and both joycon IMUs. This crate
//! decodes that vendor report; the XInput half is read through the XInput
//! protocol crate.
//!
//! # Example
//!
//! ```
//! use handheld_hid_legion_protocol::{LegionBack, parse, strip_report_id};
//!
//! let mut raw = [0u8; 65];
//! raw[2] = 25;
//! raw[20] = 0x80;
//! let report = parse(strip_report_id(&raw))?;
//! assert!(report.is_ready());
//! assert!(report.back.contains(LegionBack::Y1));
//! # Ok::<(), handheld_hid_legion_protocol::ParseError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod input;

pub use ids::{LEGION_GO_PRODUCT_IDS, LENOVO_VENDOR_ID, is_legion_go, product_name};
pub use input::{
    ACCEL_RANGE_G, ControllerLink, GYRO_RANGE_DPS, ImuSample, ImuSide, LEFT_ACCEL_SIGN,
    LEFT_GYRO_SIGN, LegionBack, LegionFront, LegionInputReport, ParseError, READY_STATES,
    REPORT_LEN, RIGHT_ACCEL_SIGN, RIGHT_GYRO_SIGN, ScrollWheel, TOUCHPAD_MAX, offsets, parse,
    strip_report_id,
};
