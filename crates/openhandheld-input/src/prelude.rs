//! Convenience re-exports.

pub use crate::axes::{AxisFlags, AxisLayoutFlags, AxisLayoutSet, AxisState, saturate_i16};
pub use crate::buttons::{ButtonFlags, ButtonState};
pub use crate::gyro::GyroState;
pub use crate::state::{ControllerState, SharedControllerState};
