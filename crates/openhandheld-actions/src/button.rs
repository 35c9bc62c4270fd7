//! Virtual gamepad button output.

use openhandheld_input::{ButtonFlags, ButtonState};

#[derive(Debug, Clone)]
pub struct ButtonAction {
    pub target: ButtonFlags,
}

impl ButtonAction {
    /// OR the target into the tick's output while `value` holds.
    pub fn execute(&self, value: bool, buttons: &mut ButtonState) {
        buttons.or(self.target, value);
    }
}
