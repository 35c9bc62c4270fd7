//! Side effects produced by actions.
//!
//! Keyboard, mouse and companion commands leave the process through an
//! [`OutputSink`]; the OS injection layer implements it. Virtual gamepad
//! output does not go through the sink, it is written into the tick's
//! output state directly.

use serde::{Deserialize, Serialize};

use crate::config::HapticStrength;

/// Platform virtual key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Commands handled by the companion itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCommand {
    OverlayGamepad,
    OverlayQuickTools,
    ToggleDesktopLayout,
    Screenshot,
    ShowKeyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    /// Relative cursor motion in pixels.
    MouseMove { dx: i32, dy: i32 },
    /// Wheel motion in clicks; positive is up/right.
    Scroll { dx: i32, dy: i32 },
    Special(SpecialCommand),
    Haptic(HapticStrength),
}

pub trait OutputSink {
    fn emit(&mut self, event: OutputEvent);
}

impl OutputSink for Vec<OutputEvent> {
    fn emit(&mut self, event: OutputEvent) {
        self.push(event);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _event: OutputEvent) {}
}
