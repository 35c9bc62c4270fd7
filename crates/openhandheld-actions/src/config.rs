//! Binding configuration
//!
//! Everything here is plain serde data loaded from a layout document. The
//! runtime state that goes with a binding lives in [`crate::PressMachine`]
//! and the action structs.

use openhandheld_errors::ConfigError;
use openhandheld_input::{AxisLayoutFlags, ButtonFlags};
use serde::{Deserialize, Serialize};

use crate::output::{KeyCode, SpecialCommand};

/// Which press duration a binding reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressType {
    /// Released before the threshold.
    #[default]
    Short,
    /// Held until the threshold.
    Long,
}

/// Press timing, toggle and turbo for a boolean binding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    pub press_type: PressType,
    /// Press-duration threshold in milliseconds; 0 disables timing.
    pub long_press_ms: f32,
    pub toggle: bool,
    pub turbo: bool,
    /// Turbo half-period in ticks.
    pub turbo_delay: u32,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            press_type: PressType::Short,
            long_press_ms: 0.0,
            toggle: false,
            turbo: false,
            turbo_delay: 9,
        }
    }
}

impl PressConfig {
    pub fn is_timed(&self) -> bool {
        self.long_press_ms > 0.0
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for a negative threshold or a zero turbo delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("long_press_ms", f64::from(self.long_press_ms), 0.0, 60_000.0)?;
        if self.turbo && self.turbo_delay == 0 {
            return Err(ConfigError::invalid("turbo_delay", "must be at least one tick"));
        }
        Ok(())
    }
}

/// Edge on which a binding pulses the controller's haptics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticMode {
    #[default]
    Off,
    Down,
    Up,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticStrength {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    pub mode: HapticMode,
    pub strength: HapticStrength,
}

/// Screen orientation used by auto-rotating stick bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    LandscapeFlipped,
    PortraitFlipped,
}

impl Orientation {
    pub fn degrees(self) -> f32 {
        match self {
            Self::Landscape => 0.0,
            Self::Portrait => 90.0,
            Self::LandscapeFlipped => 180.0,
            Self::PortraitFlipped => 270.0,
        }
    }
}

/// Shaping applied to a stick or pad binding, in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisShaping {
    /// Inner radial deadzone, percent.
    pub inner_deadzone: f32,
    /// Outer radial deadzone, percent.
    pub outer_deadzone: f32,
    /// Anti-deadzone, percent.
    pub anti_deadzone: f32,
    pub improve_circularity: bool,
    /// Fixed rotation in degrees.
    pub rotation: f32,
    /// Add the current screen orientation to `rotation`.
    pub auto_rotate: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl AxisShaping {
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for a percentage outside `0..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("inner_deadzone", f64::from(self.inner_deadzone), 0.0, 100.0)?;
        ConfigError::check_range("outer_deadzone", f64::from(self.outer_deadzone), 0.0, 100.0)?;
        ConfigError::check_range("anti_deadzone", f64::from(self.anti_deadzone), 0.0, 100.0)?;
        if self.inner_deadzone + self.outer_deadzone >= 100.0 {
            return Err(ConfigError::invalid(
                "deadzone",
                "inner and outer deadzones leave no travel",
            ));
        }
        Ok(())
    }
}

/// Shaping applied to a trigger binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerShaping {
    pub inner_deadzone: f32,
    pub outer_deadzone: f32,
    pub anti_deadzone: f32,
}

impl TriggerShaping {
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for a percentage outside `0..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("inner_deadzone", f64::from(self.inner_deadzone), 0.0, 100.0)?;
        ConfigError::check_range("outer_deadzone", f64::from(self.outer_deadzone), 0.0, 100.0)?;
        ConfigError::check_range("anti_deadzone", f64::from(self.anti_deadzone), 0.0, 100.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseActionType {
    LeftButton,
    RightButton,
    MiddleButton,
    Move,
    Scroll,
    ScrollUp,
    ScrollDown,
}

impl MouseActionType {
    /// True for the kinds driven by an axis rather than a button.
    pub fn is_axis(self) -> bool {
        matches!(self, Self::Move | Self::Scroll)
    }
}

/// What a binding produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Hold a virtual gamepad button.
    Button { target: ButtonFlags },
    /// Press a key chord.
    Keyboard { keys: Vec<KeyCode> },
    Mouse {
        action: MouseActionType,
        #[serde(default = "default_mouse_sensitivity")]
        sensitivity: f32,
        #[serde(default = "default_scroll_clicks")]
        scroll_clicks: i32,
        #[serde(default)]
        invert: bool,
    },
    /// Companion command such as opening the overlay.
    Special { command: SpecialCommand },
    /// Drive a virtual stick from a stick or pad.
    Joystick {
        target: AxisLayoutFlags,
        #[serde(default)]
        shaping: AxisShaping,
    },
    /// Drive a virtual trigger from a trigger.
    Trigger {
        target: AxisLayoutFlags,
        #[serde(default)]
        shaping: TriggerShaping,
    },
}

fn default_mouse_sensitivity() -> f32 {
    10.0
}

fn default_scroll_clicks() -> i32 {
    1
}

/// One binding as stored in a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub kind: ActionKind,
    #[serde(default)]
    pub press: PressConfig,
    #[serde(default)]
    pub haptic: HapticConfig,
}

impl ActionConfig {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            press: PressConfig::default(),
            haptic: HapticConfig::default(),
        }
    }

    pub fn button(target: ButtonFlags) -> Self {
        Self::new(ActionKind::Button { target })
    }

    pub fn keyboard(keys: Vec<KeyCode>) -> Self {
        Self::new(ActionKind::Keyboard { keys })
    }

    pub fn mouse(action: MouseActionType) -> Self {
        Self::new(ActionKind::Mouse {
            action,
            sensitivity: default_mouse_sensitivity(),
            scroll_clicks: default_scroll_clicks(),
            invert: false,
        })
    }

    pub fn special(command: SpecialCommand) -> Self {
        Self::new(ActionKind::Special { command })
    }

    pub fn joystick(target: AxisLayoutFlags) -> Self {
        Self::new(ActionKind::Joystick {
            target,
            shaping: AxisShaping::default(),
        })
    }

    pub fn trigger(target: AxisLayoutFlags) -> Self {
        Self::new(ActionKind::Trigger {
            target,
            shaping: TriggerShaping::default(),
        })
    }

    pub fn with_press(mut self, press: PressConfig) -> Self {
        self.press = press;
        self
    }

    pub fn with_haptic(mut self, mode: HapticMode, strength: HapticStrength) -> Self {
        self.haptic = HapticConfig { mode, strength };
        self
    }

    /// True for bindings that consume an axis sample.
    pub fn is_axis(&self) -> bool {
        match &self.kind {
            ActionKind::Joystick { .. } | ActionKind::Trigger { .. } => true,
            ActionKind::Mouse { action, .. } => action.is_axis(),
            _ => false,
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.press.validate()?;
        match &self.kind {
            ActionKind::Keyboard { keys } if keys.is_empty() => {
                Err(ConfigError::invalid("keys", "keyboard binding has no keys"))
            }
            ActionKind::Joystick { target, shaping } => {
                if target.is_trigger() {
                    return Err(ConfigError::invalid(
                        "target",
                        format!("{target:?} is not a stick"),
                    ));
                }
                shaping.validate()
            }
            ActionKind::Trigger { target, shaping } => {
                if !target.is_trigger() {
                    return Err(ConfigError::invalid(
                        "target",
                        format!("{target:?} is not a trigger"),
                    ));
                }
                shaping.validate()
            }
            ActionKind::Mouse { sensitivity, .. } => {
                ConfigError::check_range("sensitivity", f64::from(*sensitivity), 0.0, 100.0)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_with_defaults() -> Result<(), serde_json::Error> {
        let config: ActionConfig =
            serde_json::from_str(r#"{"kind": {"type": "keyboard", "keys": [65, 16]}}"#)?;
        assert_eq!(config.kind, ActionKind::Keyboard {
            keys: vec![KeyCode(65), KeyCode(16)]
        });
        assert_eq!(config.press, PressConfig::default());
        assert_eq!(config.haptic.mode, HapticMode::Off);
        Ok(())
    }

    #[test]
    fn test_press_fields() -> Result<(), serde_json::Error> {
        let config: ActionConfig = serde_json::from_str(
            r#"{"kind": {"type": "button", "target": "B2"},
                "press": {"press_type": "long", "long_press_ms": 450.0, "turbo": true}}"#,
        )?;
        assert_eq!(config.press.press_type, PressType::Long);
        assert!(config.press.turbo);
        assert_eq!(config.press.turbo_delay, 9);
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_bindings() {
        assert!(ActionConfig::keyboard(vec![]).validate().is_err());
        assert!(ActionConfig::joystick(AxisLayoutFlags::L2).validate().is_err());
        assert!(ActionConfig::trigger(AxisLayoutFlags::LeftStick).validate().is_err());
        let turbo = ActionConfig::button(ButtonFlags::B1).with_press(PressConfig {
            turbo: true,
            turbo_delay: 0,
            ..PressConfig::default()
        });
        assert!(turbo.validate().is_err());
        assert!(ActionConfig::joystick(AxisLayoutFlags::RightStick).validate().is_ok());
    }

    #[test]
    fn test_is_axis() {
        assert!(ActionConfig::mouse(MouseActionType::Move).is_axis());
        assert!(!ActionConfig::mouse(MouseActionType::LeftButton).is_axis());
        assert!(ActionConfig::trigger(AxisLayoutFlags::R2).is_axis());
    }
}
