//! Prelude for the motion crate.

pub use crate::config::{FlickStickConfig, GyroConfig, MotionInput, MotionMode, MotionOutput};
pub use crate::flick_stick::FlickStick;
pub use crate::fusion::SensorFusion;
pub use crate::processor::{GyroProcessor, MotionFrame};
