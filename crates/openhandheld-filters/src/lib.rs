//! Stick and Trigger Shaping for OpenHandheld
//!
//! Pure functions over stick vectors and trigger scalars, plus the stateful
//! smoothing filters used by the motion pipeline.
//!
//! # Overview
//!
//! - **Deadzone**: scaled radial inner/outer deadzone for sticks and the
//!   scalar version for triggers
//! - **Anti-deadzone**: lifts the smallest non-zero output past a game's own
//!   deadzone
//! - **Shape**: circularity correction, rotation, inversion and range mapping
//! - **Smoothing**: one-euro and exponential low-pass filters
//!
//! Stick values are `f32` in signed 16-bit units (`±32767`); percentages are
//! `0..=100`.
//!
//! # Example
//!
//! ```
//! use openhandheld_filters::prelude::*;
//!
//! let (x, y) = radial_inner_outer_deadzone(3000.0, 0.0, 10.0, 0.0);
//! assert_eq!((x, y), (0.0, 0.0));
//!
//! let (x, _) = anti_deadzone(1000.0, 0.0, 20.0);
//! assert!(x > 1000.0);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_debug_implementations)]

pub mod anti_deadzone;
pub mod deadzone;
pub mod prelude;
pub mod shape;
pub mod smoothing;

pub use anti_deadzone::{anti_deadzone, anti_deadzone_scalar};
pub use deadzone::{inner_outer_deadzone, radial_inner_outer_deadzone, trigger_inner_outer_deadzone};
pub use shape::{
    improve_circularity, invert, map_range, map_short_to_unit, normalize_xbox_input, rotate,
};
pub use smoothing::{LowPassState, OneEuroFilter, OneEuroPair};

/// Full-scale stick magnitude in signed 16-bit units.
pub const STICK_MAX: f32 = i16::MAX as f32;

/// Full-scale trigger value.
pub const TRIGGER_MAX: f32 = u8::MAX as f32;
