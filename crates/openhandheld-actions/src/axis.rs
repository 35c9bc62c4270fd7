//! Stick and trigger remapping.

use openhandheld_filters::{
    anti_deadzone, anti_deadzone_scalar, improve_circularity, invert,
    radial_inner_outer_deadzone, rotate, trigger_inner_outer_deadzone, TRIGGER_MAX,
};
use openhandheld_input::{AxisLayoutFlags, AxisState, saturate_i16};

use crate::config::{AxisShaping, Orientation, TriggerShaping};

/// Shape a stick vector: radial deadzone, anti-deadzone, circularity, then
/// rotation and inversion.
pub fn shape_stick(x: i16, y: i16, shaping: &AxisShaping, orientation: Orientation) -> (i16, i16) {
    let (mut x, mut y) = (f32::from(x), f32::from(y));

    (x, y) = radial_inner_outer_deadzone(x, y, shaping.inner_deadzone, shaping.outer_deadzone);
    (x, y) = anti_deadzone(x, y, shaping.anti_deadzone);
    if shaping.improve_circularity {
        (x, y) = improve_circularity(x, y);
    }

    let mut degrees = shaping.rotation;
    if shaping.auto_rotate {
        degrees += orientation.degrees();
    }
    (x, y) = rotate(x, y, degrees);
    (x, y) = invert(x, y, shaping.invert_x, shaping.invert_y);

    (saturate_i16(x), saturate_i16(y))
}

/// Shape a `0..=255` trigger value.
pub fn shape_trigger(value: i16, shaping: &TriggerShaping) -> i16 {
    let v = trigger_inner_outer_deadzone(
        f32::from(value),
        shaping.inner_deadzone,
        shaping.outer_deadzone,
    );
    let v = anti_deadzone_scalar(v, shaping.anti_deadzone, TRIGGER_MAX);
    saturate_i16(v.clamp(0.0, TRIGGER_MAX))
}

/// Add a vector onto a layout, saturating each component.
pub(crate) fn add_to_layout(axes: &mut AxisState, layout: AxisLayoutFlags, x: i16, y: i16) {
    let (cx, cy) = axes.layout(layout);
    axes.set_layout(layout, cx.saturating_add(x), cy.saturating_add(y));
}

#[derive(Debug, Clone)]
pub struct JoystickAction {
    pub target: AxisLayoutFlags,
    pub shaping: AxisShaping,
}

impl JoystickAction {
    pub fn execute(&self, x: i16, y: i16, orientation: Orientation, axes: &mut AxisState) {
        let (sx, sy) = shape_stick(x, y, &self.shaping, orientation);
        add_to_layout(axes, self.target, sx, sy);
    }
}

#[derive(Debug, Clone)]
pub struct TriggerAction {
    pub target: AxisLayoutFlags,
    pub shaping: TriggerShaping,
}

impl TriggerAction {
    pub fn execute(&self, value: i16, axes: &mut AxisState) {
        let shaped = shape_trigger(value, &self.shaping);
        add_to_layout(axes, self.target, shaped, 0);
    }
}
