//! Virtual gamepad targets for OpenHandheld
//!
//! Serializes the final [`ControllerState`](openhandheld_input::ControllerState)
//! of each tick into the report of an emulated pad and submits it on a
//! [`VirtualBus`]:
//!
//! - [`Xbox360Report`]: 12-byte XInput-style report, sticks pass through
//! - [`Ds4ReportBuilder`]: 63-byte DualShock 4 report with touchpad, motion
//!   and timestamp
//! - [`VirtualTarget`]: one pad of a fixed kind, collecting rumble feedback
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use openhandheld_input::{ButtonFlags, ControllerState};
//! use openhandheld_targets::{TargetKind, VirtualTarget, mock::MockBus};
//!
//! let bus = MockBus::new();
//! let mut target = VirtualTarget::new(
//!     TargetKind::Xbox360,
//!     Box::new(bus.clone()),
//!     Duration::from_millis(10),
//! );
//! target.connect()?;
//! target.submit(&ControllerState::default().with_button(ButtonFlags::B1))?;
//!
//! let report = bus.last_report().unwrap_or_default();
//! assert_eq!(report.get(0..2), Some(&[0x00, 0x10][..]));
//! # Ok::<(), openhandheld_errors::TargetError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod bus;
pub mod dualshock4;
pub mod ids;
pub mod prelude;
pub mod target;
pub mod touch;
pub mod xbox360;

pub use bus::{Feedback, NullBus, TargetKind, VirtualBus, mock};
pub use dualshock4::{DS4_BUTTON_MAP, DS4_REPORT_LEN, Ds4Buttons, Ds4Hat, Ds4ReportBuilder, Ds4Special, stick_byte};
pub use target::{TargetPort, VirtualTarget};
pub use touch::{Ds4Touch, TOUCH_UP, TouchFinger, TouchPoint, pad_to_touch};
pub use xbox360::{X360_BUTTON_MAP, X360_REPORT_LEN, X360Buttons, Xbox360Report};
