//! Action bindings for OpenHandheld
//!
//! A binding turns one logical input into an output action. Boolean inputs
//! go through a [`PressMachine`] (press timing, toggle, turbo) and only the
//! edges of its output reach the downstream action. Axis inputs skip the
//! machine and are shaped instead.
//!
//! # Example
//!
//! ```
//! use openhandheld_actions::prelude::*;
//! use openhandheld_input::{AxisState, ButtonState};
//!
//! let config = ActionConfig::keyboard(vec![KeyCode(0x41)]);
//! let mut action = Action::from_config(&config);
//!
//! let mut buttons = ButtonState::new();
//! let mut axes = AxisState::new();
//! let mut events = Vec::new();
//! let mut frame = ActionFrame::new(&mut buttons, &mut axes, &mut events);
//!
//! action.execute_button(true, 10.0, &mut frame);
//! action.execute_button(true, 10.0, &mut frame);
//! action.execute_button(false, 10.0, &mut frame);
//!
//! assert_eq!(events, vec![
//!     OutputEvent::KeyDown(KeyCode(0x41)),
//!     OutputEvent::KeyUp(KeyCode(0x41)),
//! ]);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod action;
pub mod axis;
pub mod button;
pub mod config;
pub mod keyboard;
pub mod mouse;
pub mod output;
pub mod prelude;
pub mod press;
pub mod special;

pub use action::{Action, ActionFrame};
pub use axis::{JoystickAction, TriggerAction, shape_stick, shape_trigger};
pub use button::ButtonAction;
pub use config::{
    ActionConfig, ActionKind, AxisShaping, HapticConfig, HapticMode, HapticStrength,
    MouseActionType, Orientation, PressConfig, PressType, TriggerShaping,
};
pub use keyboard::KeyboardAction;
pub use mouse::MouseAction;
pub use output::{KeyCode, MouseButton, NullSink, OutputEvent, OutputSink, SpecialCommand};
pub use press::{Edge, PressMachine, PressOutput, PressState};
pub use special::SpecialAction;
