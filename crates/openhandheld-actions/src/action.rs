//! Runtime binding built from an [`ActionConfig`].

use openhandheld_input::{AxisLayoutFlags, AxisState, ButtonState};

use crate::axis::{JoystickAction, TriggerAction, add_to_layout};
use crate::button::ButtonAction;
use crate::config::{ActionConfig, ActionKind, HapticConfig, HapticMode, Orientation};
use crate::keyboard::KeyboardAction;
use crate::mouse::MouseAction;
use crate::output::{OutputEvent, OutputSink};
use crate::press::{PressMachine, PressOutput};
use crate::special::SpecialAction;

/// Deflection past which an axis drives a button-like action.
const AXIS_PRESS_THRESHOLD: f32 = i16::MAX as f32 / 2.0;

/// Everything an action may write to during one tick.
pub struct ActionFrame<'a> {
    pub buttons: &'a mut ButtonState,
    pub axes: &'a mut AxisState,
    pub sink: &'a mut dyn OutputSink,
    pub orientation: Orientation,
}

impl<'a> ActionFrame<'a> {
    pub fn new(
        buttons: &'a mut ButtonState,
        axes: &'a mut AxisState,
        sink: &'a mut dyn OutputSink,
    ) -> Self {
        Self {
            buttons,
            axes,
            sink,
            orientation: Orientation::Landscape,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

impl std::fmt::Debug for ActionFrame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionFrame")
            .field("buttons", &self.buttons)
            .field("axes", &self.axes)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
enum Output {
    Button(ButtonAction),
    Keyboard(KeyboardAction),
    Mouse(MouseAction),
    Special(SpecialAction),
    Joystick(JoystickAction),
    Trigger(TriggerAction),
}

/// One live binding: configuration plus the runtime state it owns.
#[derive(Debug, Clone)]
pub struct Action {
    output: Output,
    press: PressMachine,
    haptic: HapticConfig,
}

impl Action {
    pub fn from_config(config: &ActionConfig) -> Self {
        let output = match &config.kind {
            ActionKind::Button { target } => Output::Button(ButtonAction { target: *target }),
            ActionKind::Keyboard { keys } => Output::Keyboard(KeyboardAction::new(keys.clone())),
            ActionKind::Mouse {
                action,
                sensitivity,
                scroll_clicks,
                invert,
            } => Output::Mouse(MouseAction::new(*action, *sensitivity, *scroll_clicks, *invert)),
            ActionKind::Special { command } => {
                Output::Special(SpecialAction { command: *command })
            }
            ActionKind::Joystick { target, shaping } => Output::Joystick(JoystickAction {
                target: *target,
                shaping: *shaping,
            }),
            ActionKind::Trigger { target, shaping } => Output::Trigger(TriggerAction {
                target: *target,
                shaping: *shaping,
            }),
        };

        Self {
            output,
            press: PressMachine::new(config.press),
            haptic: config.haptic,
        }
    }

    pub fn press_machine(&self) -> &PressMachine {
        &self.press
    }

    /// Feed a boolean input for this tick.
    pub fn execute_button(&mut self, pressed: bool, delta_ms: f32, frame: &mut ActionFrame<'_>) {
        let output = self.press.update(pressed, delta_ms);
        self.emit_haptic(output, frame.sink);

        match &mut self.output {
            Output::Button(action) => action.execute(output.value, frame.buttons),
            Output::Keyboard(action) => action.execute(output, frame.sink),
            Output::Mouse(action) => action.execute_button(output, frame.sink),
            Output::Special(action) => action.execute(output, frame.sink),
            Output::Trigger(action) => {
                if output.value {
                    add_to_layout(frame.axes, action.target, openhandheld_input::TRIGGER_MAX, 0);
                }
            }
            // A stick has no meaningful boolean source.
            Output::Joystick(_) => {}
        }
    }

    /// Feed an axis sample read from `source` for this tick.
    ///
    /// Axis outputs are shaped directly. Button-like outputs treat a
    /// deflection past half scale as a press.
    pub fn execute_axis(
        &mut self,
        source: AxisLayoutFlags,
        x: i16,
        y: i16,
        delta_ms: f32,
        frame: &mut ActionFrame<'_>,
    ) {
        match &mut self.output {
            Output::Joystick(action) => action.execute(x, y, frame.orientation, frame.axes),
            Output::Trigger(action) => action.execute(x, frame.axes),
            Output::Mouse(action) if action.action.is_axis() => {
                action.execute_axis(source, x, y, frame.sink);
            }
            _ => {
                let magnitude = if source.is_trigger() {
                    f32::from(x) / f32::from(openhandheld_input::TRIGGER_MAX) * f32::from(i16::MAX)
                } else {
                    f32::from(x).hypot(f32::from(y))
                };
                self.execute_button(magnitude > AXIS_PRESS_THRESHOLD, delta_ms, frame);
            }
        }
    }

    /// Release anything held downstream and clear runtime state.
    pub fn reset(&mut self, sink: &mut dyn OutputSink) {
        match &mut self.output {
            Output::Keyboard(action) => action.release(sink),
            Output::Mouse(action) => action.release(sink),
            _ => {}
        }
        self.press.reset();
    }

    fn emit_haptic(&self, output: PressOutput, sink: &mut dyn OutputSink) {
        let fire = match self.haptic.mode {
            HapticMode::Off => false,
            HapticMode::Down => output.rising(),
            HapticMode::Up => output.falling(),
            HapticMode::Both => output.edge.is_some(),
        };
        if fire {
            sink.emit(OutputEvent::Haptic(self.haptic.strength));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HapticStrength, PressConfig, PressType};
    use crate::output::{KeyCode, SpecialCommand};
    use openhandheld_input::{AxisFlags, ButtonFlags};

    struct Harness {
        buttons: ButtonState,
        axes: AxisState,
        events: Vec<OutputEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                buttons: ButtonState::new(),
                axes: AxisState::new(),
                events: Vec::new(),
            }
        }

        fn press(&mut self, action: &mut Action, pressed: bool) {
            self.buttons.clear();
            let mut frame = ActionFrame::new(&mut self.buttons, &mut self.axes, &mut self.events);
            action.execute_button(pressed, 10.0, &mut frame);
        }
    }

    #[test]
    fn test_button_action_holds_target() {
        let mut action = Action::from_config(&ActionConfig::button(ButtonFlags::B2));
        let mut h = Harness::new();
        h.press(&mut action, true);
        assert!(h.buttons.is_pressed(ButtonFlags::B2));
        h.press(&mut action, false);
        assert!(h.buttons.is_empty());
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_keyboard_chord_order() {
        let config = ActionConfig::keyboard(vec![KeyCode(0x11), KeyCode(0x43)]);
        let mut action = Action::from_config(&config);
        let mut h = Harness::new();
        for pressed in [true, true, false, false] {
            h.press(&mut action, pressed);
        }
        assert_eq!(h.events, vec![
            OutputEvent::KeyDown(KeyCode(0x11)),
            OutputEvent::KeyDown(KeyCode(0x43)),
            OutputEvent::KeyUp(KeyCode(0x43)),
            OutputEvent::KeyUp(KeyCode(0x11)),
        ]);
    }

    #[test]
    fn test_haptic_on_configured_edge() {
        let config = ActionConfig::special(SpecialCommand::OverlayQuickTools)
            .with_haptic(HapticMode::Up, HapticStrength::High);
        let mut action = Action::from_config(&config);
        let mut h = Harness::new();
        h.press(&mut action, true);
        h.press(&mut action, false);
        assert_eq!(h.events, vec![
            OutputEvent::Special(SpecialCommand::OverlayQuickTools),
            OutputEvent::Haptic(HapticStrength::High),
        ]);
    }

    #[test]
    fn test_long_press_keyboard() {
        let config = ActionConfig::keyboard(vec![KeyCode(0x20)]).with_press(PressConfig {
            press_type: PressType::Long,
            long_press_ms: 30.0,
            ..PressConfig::default()
        });
        let mut action = Action::from_config(&config);
        let mut h = Harness::new();
        h.press(&mut action, true);
        h.press(&mut action, true);
        assert!(h.events.is_empty());
        h.press(&mut action, true);
        assert_eq!(h.events, vec![OutputEvent::KeyDown(KeyCode(0x20))]);
        h.press(&mut action, false);
        assert_eq!(h.events.len(), 2);
    }

    #[test]
    fn test_axis_drives_button_past_half_scale() {
        let mut action = Action::from_config(&ActionConfig::button(ButtonFlags::DPadUp));
        let mut h = Harness::new();
        let mut frame = ActionFrame::new(&mut h.buttons, &mut h.axes, &mut h.events);
        action.execute_axis(AxisLayoutFlags::LeftStick, 0, 20000, 10.0, &mut frame);
        assert!(h.buttons.is_pressed(ButtonFlags::DPadUp));
    }

    #[test]
    fn test_trigger_from_button_is_full_scale() {
        let mut action = Action::from_config(&ActionConfig::trigger(AxisLayoutFlags::R2));
        let mut h = Harness::new();
        h.press(&mut action, true);
        assert_eq!(h.axes.get(AxisFlags::R2), 255);
    }

    #[test]
    fn test_reset_releases_held_keys() {
        let mut action = Action::from_config(&ActionConfig::keyboard(vec![KeyCode(1)]));
        let mut h = Harness::new();
        h.press(&mut action, true);
        action.reset(&mut h.events);
        assert_eq!(h.events.last(), Some(&OutputEvent::KeyUp(KeyCode(1))));
    }
}
