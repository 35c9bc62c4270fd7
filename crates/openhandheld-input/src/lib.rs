//! Canonical input state for OpenHandheld.
//!
//! Every controller adapter decodes its device reports into the types in this
//! crate, and every downstream stage (motion, actions, virtual targets) reads
//! them. The types are plain data: the only behavior is merging and
//! overwriting.
//!
//! # Example
//!
//! ```
//! use openhandheld_input::prelude::*;
//!
//! let mut physical = ButtonState::from(ButtonFlags::B1);
//! let injected = ButtonState::from(ButtonFlags::Start);
//! physical.merge(&injected);
//!
//! let state = ControllerState::new(1)
//!     .with_axis(AxisFlags::LeftStickX, 12_000);
//! assert!(physical.is_pressed(ButtonFlags::Start));
//! assert_eq!(state.axes.get(AxisFlags::LeftStickX), 12_000);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod axes;
pub mod buttons;
pub mod gyro;
pub mod prelude;
pub mod state;

pub use axes::{
    AXIS_MAX, AXIS_MIN, AxisFlags, AxisLayoutFlags, AxisLayoutSet, AxisState, TRIGGER_MAX,
    saturate_i16,
};
pub use buttons::{ButtonFlags, ButtonState};
pub use gyro::GyroState;
pub use state::{ControllerState, SharedControllerState};
