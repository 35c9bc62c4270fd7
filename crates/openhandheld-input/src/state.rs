//! Aggregate per-tick controller snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{AxisFlags, AxisState, ButtonFlags, ButtonState, GyroState};

/// Buttons, axes and motion of one controller for one tick.
///
/// A state is never mutated after it has been published; consumers on other
/// threads hold a [`SharedControllerState`] and the producer builds the next
/// tick into a fresh value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Monotonically increasing tick id of the producer.
    pub tick: u64,
    pub buttons: ButtonState,
    pub axes: AxisState,
    pub gyro: GyroState,
}

/// Published, read-only controller state.
pub type SharedControllerState = Arc<ControllerState>;

impl ControllerState {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, flag: ButtonFlags) -> Self {
        self.buttons.press(flag);
        self
    }

    pub fn with_axis(mut self, axis: AxisFlags, value: i16) -> Self {
        self.axes.set(axis, value);
        self
    }

    pub fn with_gyro(mut self, gyro: GyroState) -> Self {
        self.gyro = gyro;
        self
    }

    /// Freeze a copy of this state stamped with `tick`.
    pub fn publish(&self, tick: u64) -> SharedControllerState {
        Arc::new(Self {
            tick,
            ..self.clone()
        })
    }

    /// True when no button is held and every axis rests at center.
    pub fn is_neutral(&self) -> bool {
        self.buttons.is_empty() && self.axes.iter().all(|(axis, v)| v == axis.center())
    }
}
