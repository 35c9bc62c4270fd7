//! Mouse output
//!
//! Button kinds react to press edges. `Move` and `Scroll` are driven by an
//! axis: sticks move the cursor at a speed proportional to deflection, pads
//! move it by the finger's travel since the previous tick.

use openhandheld_input::AxisLayoutFlags;

use crate::config::MouseActionType;
use crate::output::{MouseButton, OutputEvent, OutputSink};
use crate::press::PressOutput;

const STICK_MAX: f32 = i16::MAX as f32;
/// Pad travel is amplified relative to stick speed.
const PAD_GAIN: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct MouseAction {
    pub action: MouseActionType,
    pub sensitivity: f32,
    pub scroll_clicks: i32,
    pub invert: bool,
    is_down: bool,
    /// Sub-pixel motion carried to the next tick.
    remainder: (f32, f32),
    pad_prev: Option<(f32, f32)>,
}

impl MouseAction {
    pub fn new(action: MouseActionType, sensitivity: f32, scroll_clicks: i32, invert: bool) -> Self {
        Self {
            action,
            sensitivity,
            scroll_clicks,
            invert,
            is_down: false,
            remainder: (0.0, 0.0),
            pad_prev: None,
        }
    }

    fn button(&self) -> Option<MouseButton> {
        match self.action {
            MouseActionType::LeftButton => Some(MouseButton::Left),
            MouseActionType::RightButton => Some(MouseButton::Right),
            MouseActionType::MiddleButton => Some(MouseButton::Middle),
            _ => None,
        }
    }

    /// Button and wheel-click kinds.
    pub fn execute_button(&mut self, output: PressOutput, sink: &mut dyn OutputSink) {
        if output.rising() && !self.is_down {
            self.is_down = true;
            match self.action {
                MouseActionType::ScrollUp => sink.emit(OutputEvent::Scroll {
                    dx: 0,
                    dy: self.scroll_clicks,
                }),
                MouseActionType::ScrollDown => sink.emit(OutputEvent::Scroll {
                    dx: 0,
                    dy: -self.scroll_clicks,
                }),
                _ => {
                    if let Some(button) = self.button() {
                        sink.emit(OutputEvent::MouseDown(button));
                    }
                }
            }
        } else if output.falling() && self.is_down {
            self.is_down = false;
            if let Some(button) = self.button() {
                sink.emit(OutputEvent::MouseUp(button));
            }
        }
    }

    /// `Move` and `Scroll` kinds.
    pub fn execute_axis(
        &mut self,
        source: AxisLayoutFlags,
        x: i16,
        y: i16,
        sink: &mut dyn OutputSink,
    ) {
        let sign = if self.invert { -1.0 } else { 1.0 };
        // Screen space grows downwards.
        let (vx, vy) = (f32::from(x), -f32::from(y));

        let (dx, dy) = if source.is_pad() {
            if x == 0 && y == 0 {
                self.pad_prev = None;
                return;
            }
            let Some((px, py)) = self.pad_prev.replace((vx, vy)) else {
                return;
            };
            let gain = self.sensitivity * PAD_GAIN / STICK_MAX * sign;
            ((vx - px) * gain, (vy - py) * gain)
        } else {
            if x == 0 && y == 0 {
                return;
            }
            let gain = self.sensitivity / STICK_MAX * sign;
            (vx * gain, vy * gain)
        };

        let total_x = dx + self.remainder.0;
        let total_y = dy + self.remainder.1;
        let (ix, iy) = (total_x.trunc(), total_y.trunc());
        self.remainder = (total_x - ix, total_y - iy);

        let (ix, iy) = (ix as i32, iy as i32);
        if ix == 0 && iy == 0 {
            return;
        }
        match self.action {
            MouseActionType::Scroll => sink.emit(OutputEvent::Scroll { dx: ix, dy: -iy }),
            _ => sink.emit(OutputEvent::MouseMove { dx: ix, dy: iy }),
        }
    }

    /// Release a held button, e.g. when the layout is swapped mid-press.
    pub fn release(&mut self, sink: &mut dyn OutputSink) {
        if self.is_down {
            self.is_down = false;
            if let Some(button) = self.button() {
                sink.emit(OutputEvent::MouseUp(button));
            }
        }
    }
}
