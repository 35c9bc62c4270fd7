//! Layout: which actions each physical input drives.
//!
//! A [`LayoutConfig`] is the serialized form; [`LayoutMapper`] owns the
//! runtime [`Action`]s built from it and turns one adapter snapshot into the
//! state submitted to the virtual target. Each tick runs, in order:
//!
//! 1. button bindings, in button bit order;
//! 2. axis bindings, in layout order;
//! 3. the gyro binding, summed onto its output stick.
//!
//! Inputs without a binding do not reach the target.

use std::collections::BTreeMap;

use openhandheld_actions::{Action, ActionConfig, ActionFrame, ActionKind, Orientation, OutputSink};
use openhandheld_errors::ConfigError;
use openhandheld_input::{AxisLayoutFlags, ButtonFlags, ControllerState};
use openhandheld_motion::{GyroConfig, GyroProcessor, MotionFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Buttons the default layout passes straight through.
const PASSTHROUGH_BUTTONS: [ButtonFlags; 21] = [
    ButtonFlags::B1,
    ButtonFlags::B2,
    ButtonFlags::B3,
    ButtonFlags::B4,
    ButtonFlags::DPadUp,
    ButtonFlags::DPadDown,
    ButtonFlags::DPadLeft,
    ButtonFlags::DPadRight,
    ButtonFlags::Start,
    ButtonFlags::Back,
    ButtonFlags::Special,
    ButtonFlags::L1,
    ButtonFlags::R1,
    ButtonFlags::LeftStickClick,
    ButtonFlags::RightStickClick,
    ButtonFlags::LeftPadTouch,
    ButtonFlags::LeftPadClick,
    ButtonFlags::RightPadTouch,
    ButtonFlags::RightPadClick,
    ButtonFlags::L4,
    ButtonFlags::R4,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub buttons: BTreeMap<ButtonFlags, Vec<ActionConfig>>,
    pub axes: BTreeMap<AxisLayoutFlags, Vec<ActionConfig>>,
    pub gyro: Option<GyroConfig>,
    pub orientation: Orientation,
}

impl Default for LayoutConfig {
    /// Every standard control maps onto itself; no gyro.
    fn default() -> Self {
        let buttons = PASSTHROUGH_BUTTONS
            .into_iter()
            .map(|flag| (flag, vec![ActionConfig::button(flag)]))
            .collect();

        let axes = [
            (AxisLayoutFlags::LeftStick, ActionConfig::joystick(AxisLayoutFlags::LeftStick)),
            (AxisLayoutFlags::RightStick, ActionConfig::joystick(AxisLayoutFlags::RightStick)),
            (AxisLayoutFlags::LeftPad, ActionConfig::joystick(AxisLayoutFlags::LeftPad)),
            (AxisLayoutFlags::RightPad, ActionConfig::joystick(AxisLayoutFlags::RightPad)),
            (AxisLayoutFlags::L2, ActionConfig::trigger(AxisLayoutFlags::L2)),
            (AxisLayoutFlags::R2, ActionConfig::trigger(AxisLayoutFlags::R2)),
        ]
        .into_iter()
        .map(|(source, action)| (source, vec![action]))
        .collect();

        Self {
            buttons,
            axes,
            gyro: None,
            orientation: Orientation::Landscape,
        }
    }
}

impl LayoutConfig {
    /// A layout with no bindings at all.
    pub fn empty() -> Self {
        Self {
            buttons: BTreeMap::new(),
            axes: BTreeMap::new(),
            gyro: None,
            orientation: Orientation::Landscape,
        }
    }

    pub fn bind_button(mut self, source: ButtonFlags, action: ActionConfig) -> Self {
        self.buttons.entry(source).or_default().push(action);
        self
    }

    pub fn bind_axis(mut self, source: AxisLayoutFlags, action: ActionConfig) -> Self {
        self.axes.entry(source).or_default().push(action);
        self
    }

    pub fn with_gyro(mut self, gyro: GyroConfig) -> Self {
        self.gyro = Some(gyro);
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for the first invalid binding. A stick output
    /// bound to a button has no value to follow and is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (source, actions) in &self.buttons {
            for action in actions {
                action.validate()?;
                if matches!(action.kind, ActionKind::Joystick { .. }) {
                    return Err(ConfigError::invalid(
                        format!("buttons.{source}"),
                        "a button cannot drive a stick",
                    ));
                }
            }
        }
        for actions in self.axes.values() {
            for action in actions {
                action.validate()?;
            }
        }
        if let Some(gyro) = &self.gyro {
            gyro.validate()?;
        }
        Ok(())
    }
}

/// Runtime form of a [`LayoutConfig`].
#[derive(Debug, Clone)]
pub struct LayoutMapper {
    config: LayoutConfig,
    buttons: Vec<(ButtonFlags, Vec<Action>)>,
    axes: Vec<(AxisLayoutFlags, Vec<Action>)>,
    gyro: Option<GyroProcessor>,
    motion: MotionFrame,
}

impl LayoutMapper {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails [`LayoutConfig::validate`].
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buttons = config
            .buttons
            .iter()
            .map(|(source, actions)| (*source, actions.iter().map(Action::from_config).collect()))
            .collect();
        let axes = config
            .axes
            .iter()
            .map(|(source, actions)| (*source, actions.iter().map(Action::from_config).collect()))
            .collect();
        let gyro = config.gyro.clone().map(GyroProcessor::new);

        debug!(
            "Layout built: {} button bindings, {} axis bindings, gyro {}",
            config.buttons.len(),
            config.axes.len(),
            if gyro.is_some() { "on" } else { "off" }
        );
        Ok(Self {
            config,
            buttons,
            axes,
            gyro,
            motion: MotionFrame::default(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Motion output of the last tick.
    pub fn motion(&self) -> MotionFrame {
        self.motion
    }

    /// Replace the layout. Outputs held by the old bindings are released
    /// through `sink` first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] and keeps the current layout when `config`
    /// is invalid.
    pub fn set_layout(&mut self, config: LayoutConfig, sink: &mut dyn OutputSink) -> Result<(), ConfigError> {
        let next = Self::new(config)?;
        self.reset(sink);
        *self = next;
        Ok(())
    }

    /// Map one snapshot. The result keeps the input's tick and raw gyro.
    pub fn apply(&mut self, input: &ControllerState, delta_ms: f32, sink: &mut dyn OutputSink) -> ControllerState {
        let mut output = ControllerState::new(input.tick);
        output.gyro = input.gyro;

        {
            let ControllerState { buttons, axes, .. } = &mut output;
            let mut frame = ActionFrame::new(buttons, axes, sink).with_orientation(self.config.orientation);

            for (source, actions) in &mut self.buttons {
                let pressed = input.buttons.is_pressed(*source);
                for action in actions.iter_mut() {
                    action.execute_button(pressed, delta_ms, &mut frame);
                }
            }

            for (source, actions) in &mut self.axes {
                let (x, y) = input.axes.layout(*source);
                for action in actions.iter_mut() {
                    action.execute_axis(*source, x, y, delta_ms, &mut frame);
                }
            }
        }

        if let Some(gyro) = &mut self.gyro {
            self.motion = gyro.process(&input.buttons, &input.gyro, &mut output.axes, delta_ms);
        }

        trace!("Tick {} mapped to {} buttons", output.tick, output.buttons.len());
        output
    }

    /// Release everything held downstream and clear binding state.
    pub fn reset(&mut self, sink: &mut dyn OutputSink) {
        let buttons = self.buttons.iter_mut().map(|(_, actions)| actions);
        let axes = self.axes.iter_mut().map(|(_, actions)| actions);
        for actions in buttons.chain(axes) {
            for action in actions.iter_mut() {
                action.reset(sink);
            }
        }
        if let (Some(gyro), Some(config)) = (&mut self.gyro, &self.config.gyro) {
            gyro.set_config(config.clone());
        }
        self.motion = MotionFrame::default();
    }
}
