//! Motion processing for OpenHandheld
//!
//! Turns raw gyro and accelerometer samples into stick motion:
//!
//! - [`SensorFusion`]: gravity estimate and device tilt
//! - [`FlickStick`]: stick flicks to instant camera turns plus sweep
//! - joystick camera in local, player or world space, or tilt steering
//! - [`GyroProcessor`]: activation, gains and summing onto a stick
//!
//! # Example
//!
//! ```
//! use openhandheld_input::{AxisFlags, AxisState, ButtonState, GyroState};
//! use openhandheld_motion::{GyroConfig, GyroProcessor};
//!
//! let mut processor = GyroProcessor::new(GyroConfig::default());
//! let mut axes = AxisState::new();
//! let sample = GyroState {
//!     angular_velocity: [0.0, 0.0, 8.0],
//!     acceleration: [0.0, 0.0, 1.0],
//!     quaternion: None,
//! };
//!
//! let frame = processor.process(&ButtonState::new(), &sample, &mut axes, 10.0);
//! assert!(frame.active);
//! assert!(axes.get(AxisFlags::RightStickX) > 0);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod activation;
pub mod camera;
pub mod config;
pub mod flick_stick;
pub mod fusion;
pub mod math;
pub mod prelude;
pub mod processor;

pub use activation::MotionActivation;
pub use camera::project;
pub use config::{FlickStickConfig, GyroConfig, MotionInput, MotionMode, MotionOutput};
pub use flick_stick::FlickStick;
pub use fusion::{DeviceAngles, SensorFusion, auto_roll_yaw_swap, device_angles, player_space, world_space};
pub use math::{Quat, Vec3};
pub use processor::{GYRO_MAX_INPUT, GyroProcessor, MotionFrame, RESET_CHORD, SENSITIVITY_SCALE};
