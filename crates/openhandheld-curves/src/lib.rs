//! Response curves for OpenHandheld
//!
//! - [`SensitivityCurve`]: the user-drawn gyro/stick sensitivity curve
//! - [`SteeringCurve`]: deadzone and power curve for tilt steering
//! - [`CurveLut`]: 256-entry table for allocation-free evaluation in the tick
//!
//! # Example
//!
//! ```
//! use openhandheld_curves::{SensitivityCurve, SteeringCurve};
//!
//! let lut = SensitivityCurve::flat().to_lut();
//! let multiplier = lut.lookup(0.5);
//! assert!(multiplier > 0.9 && multiplier < 1.0);
//!
//! let steering = SteeringCurve { max_angle: 30.0, power: 1.0, deadzone: 0.0 };
//! assert!(steering.position(15.0) > 0.49);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod lut;
pub mod sensitivity;
pub mod steering;

pub use error::CurveError;
pub use lut::CurveLut;
pub use sensitivity::{CurveNode, SensitivityCurve};
pub use steering::{SteeringCurve, angle_to_joystick_pos, direction_respecting_power};
