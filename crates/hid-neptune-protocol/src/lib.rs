//! Steam Deck (Neptune) controller HID protocol.
//!
//! The Steam Deck's built-in controller enumerates under Valve's VID
//! `0x28DE` with PID `0x1205`. Out of the box it runs in "lizard mode",
//! where the pads and buttons also drive a keyboard and mouse. A companion
//! turns lizard mode off with feature commands and must repeat them every
//! second, otherwise the firmware turns it back on.
//!
//! This crate is I/O-free: [`parse`] decodes the 64-byte input report and
//! the [`command`] functions build the feature reports to send.
//!
//! # Example
//!
//! ```
//! use handheld_hid_neptune_protocol::{EVENT_DECK_INPUT, NeptuneButtons, PACKET_TYPE, parse};
//!
//! let mut report = [0u8; 64];
//! report[0] = PACKET_TYPE;
//! report[2] = EVENT_DECK_INPUT;
//! report[8] = 0x80;
//! let input = parse(&report)?;
//! assert!(input.is_pressed(NeptuneButtons::A));
//! # Ok::<(), handheld_hid_neptune_protocol::ParseError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod command;
pub mod ids;
pub mod input;

pub use command::{
    FEATURE_REPORT_LEN, FeatureReport, HAPTIC_AMPLITUDE_HIGH, HAPTIC_AMPLITUDE_LOW, HAPTIC_AMPLITUDE_MEDIUM,
    HEARTBEAT_INTERVAL, HapticMotor, HapticStyle, Register,
    haptic_intensity, haptic_pulse, haptic_rumble, lizard_mode, write_register,
};
pub use ids::{NEPTUNE_INTERFACE, STEAM_DECK_PRODUCT_ID, VALVE_VENDOR_ID, is_neptune, product_name};
pub use input::{
    ACCEL_RANGE_G, EVENT_DECK_INPUT, GYRO_RANGE_DPS, NeptuneButtons, NeptuneInputReport,
    PACKET_TYPE, PAD_INNER_THRESHOLD, ParseError, REPORT_LEN, offsets, parse, trigger_to_byte,
};
