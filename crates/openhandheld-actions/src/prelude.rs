//! Prelude for the actions crate.

pub use crate::action::{Action, ActionFrame};
pub use crate::config::{
    ActionConfig, ActionKind, AxisShaping, HapticConfig, HapticMode, HapticStrength,
    MouseActionType, Orientation, PressConfig, PressType, TriggerShaping,
};
pub use crate::output::{KeyCode, MouseButton, OutputEvent, OutputSink, SpecialCommand};
pub use crate::press::{Edge, PressMachine, PressOutput, PressState};
