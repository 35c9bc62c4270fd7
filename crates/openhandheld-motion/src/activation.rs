//! Motion on/off gating by a trigger button set.

use openhandheld_input::ButtonState;

use crate::config::MotionMode;

/// Toggle latch and debounce for [`MotionMode::Toggle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionActivation {
    toggled: bool,
    held: bool,
}

impl MotionActivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether motion is active this tick.
    ///
    /// The trigger counts as held when any of its buttons is pressed. In
    /// toggle mode the latch flips once per press of the trigger.
    pub fn update(&mut self, mode: MotionMode, trigger: &ButtonState, buttons: &ButtonState) -> bool {
        let held = buttons.intersects(trigger);

        if mode == MotionMode::Toggle && held && !self.held {
            self.toggled = !self.toggled;
        }
        self.held = held;

        match mode {
            MotionMode::Off => held,
            MotionMode::On => !held,
            MotionMode::Toggle => self.toggled,
        }
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
