//! XInput gamepad protocol.
//!
//! The state, button bits, deadzones and vibration scaling of the XInput
//! API, independent of any Windows SDK. Adapters obtain raw `XINPUT_STATE`
//! bytes from whatever source is available and decode them here.
//!
//! # Example
//!
//! ```
//! use handheld_hid_xinput_protocol::{XInputButtons, XInputState, XInputVibration};
//!
//! let state = XInputState::from_bytes(&[1, 0, 0, 0, 0x00, 0x10, 0, 0]);
//! assert!(state.gamepad.is_pressed(XInputButtons::A));
//!
//! let rumble = XInputVibration::from_motors(255, 0, 0.5);
//! assert_eq!(rumble.left_motor_speed, 32767);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod state;
pub mod vibration;

pub use state::{
    LEFT_THUMB_DEADZONE, MAX_USERS, RIGHT_THUMB_DEADZONE, STATE_LEN, TRIGGER_THRESHOLD,
    XInputButtons, XInputGamepad, XInputState, stick_directions,
};
pub use vibration::{VIBRATION_LEN, XInputVibration};
