//! Press timing, toggle and turbo
//!
//! ```text
//!            press (timed)               threshold reached (long)
//!   Idle ─────────────────► TimingPress ─────────────────────────► Resolved
//!    ▲                        │    │      released early (short)      │
//!    │   gesture failed       │    └──────────────────────────────────┤
//!    └────────────────────────┘                                       │
//!    └────────────────────────────── released ────────────────────────┘
//! ```
//!
//! The timer runs in milliseconds and includes the tick that starts it, so a
//! press held for `n` ticks of `delta` measures `n * delta`. A successful
//! short press is a one-tick pulse on the release tick; a successful long
//! press turns on at the threshold and follows the input until release.

use crate::config::{PressConfig, PressType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Idle,
    TimingPress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Result of one [`PressMachine::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PressOutput {
    pub value: bool,
    pub edge: Option<Edge>,
}

impl PressOutput {
    pub fn rising(&self) -> bool {
        self.edge == Some(Edge::Rising)
    }

    pub fn falling(&self) -> bool {
        self.edge == Some(Edge::Falling)
    }
}

/// Runtime state of one boolean binding.
#[derive(Debug, Clone)]
pub struct PressMachine {
    config: PressConfig,
    state: PressState,
    /// Elapsed press time in ms, negative while inactive.
    timer: f32,
    /// Set after a failed gesture until the input is released.
    awaiting_release: bool,
    /// A short press resolved last tick and must end this tick.
    pulse: bool,
    prev_value: bool,
    toggled: bool,
    turbo_phase: bool,
    turbo_idx: u32,
    output: bool,
}

impl PressMachine {
    pub fn new(config: PressConfig) -> Self {
        Self {
            config,
            state: PressState::Idle,
            timer: -1.0,
            awaiting_release: false,
            pulse: false,
            prev_value: false,
            toggled: false,
            turbo_phase: false,
            turbo_idx: 0,
            output: false,
        }
    }

    pub fn config(&self) -> &PressConfig {
        &self.config
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    /// Drop all runtime state, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Advance one tick with the raw input and the tick length in ms.
    pub fn update(&mut self, pressed: bool, delta_ms: f32) -> PressOutput {
        let value = self.gate(pressed, delta_ms.max(0.0));

        if self.config.toggle {
            if value && !self.prev_value {
                self.toggled = !self.toggled;
            }
        } else {
            self.toggled = false;
        }

        if self.config.turbo {
            if value || self.toggled {
                let delay = self.config.turbo_delay.max(1);
                if self.turbo_idx % delay == 0 {
                    self.turbo_phase = !self.turbo_phase;
                }
                self.turbo_idx = self.turbo_idx.wrapping_add(1);
            } else {
                self.turbo_phase = false;
                self.turbo_idx = 0;
            }
        } else {
            self.turbo_phase = false;
        }

        self.prev_value = value;

        let next = match (self.config.toggle, self.config.turbo) {
            (true, true) => self.toggled && self.turbo_phase,
            (true, false) => self.toggled,
            (false, true) => self.turbo_phase,
            (false, false) => value,
        };

        let edge = match (self.output, next) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.output = next;

        PressOutput { value: next, edge }
    }

    /// Apply press-duration gating to the raw input.
    fn gate(&mut self, pressed: bool, delta_ms: f32) -> bool {
        if !self.config.is_timed() {
            self.state = if pressed {
                PressState::Resolved
            } else {
                PressState::Idle
            };
            return pressed;
        }

        match self.state {
            PressState::Idle => self.idle(pressed, delta_ms),
            PressState::TimingPress => {
                if pressed {
                    self.timer += delta_ms;
                }
                self.check_timer(pressed)
            }
            PressState::Resolved => {
                if self.pulse {
                    self.pulse = false;
                    self.state = PressState::Idle;
                    return self.idle(pressed, delta_ms);
                }
                if pressed {
                    true
                } else {
                    self.state = PressState::Idle;
                    false
                }
            }
        }
    }

    fn idle(&mut self, pressed: bool, delta_ms: f32) -> bool {
        if !pressed {
            self.awaiting_release = false;
            return false;
        }
        if self.awaiting_release {
            return false;
        }
        self.state = PressState::TimingPress;
        self.timer = delta_ms;
        self.check_timer(pressed)
    }

    fn check_timer(&mut self, pressed: bool) -> bool {
        let threshold = self.config.long_press_ms;
        match self.config.press_type {
            PressType::Long => {
                if pressed && self.timer >= threshold {
                    self.resolve(false)
                } else if !pressed {
                    self.discard(false);
                    false
                } else {
                    false
                }
            }
            PressType::Short => {
                if !pressed {
                    if self.timer < threshold {
                        self.resolve(true)
                    } else {
                        self.discard(false);
                        false
                    }
                } else if self.timer >= threshold {
                    self.discard(true);
                    false
                } else {
                    false
                }
            }
        }
    }

    /// Synthesize a clean rising edge for the downstream toggle and turbo.
    fn resolve(&mut self, pulse: bool) -> bool {
        self.state = PressState::Resolved;
        self.timer = -1.0;
        self.pulse = pulse;
        self.prev_value = false;
        true
    }

    fn discard(&mut self, still_held: bool) {
        self.state = PressState::Idle;
        self.timer = -1.0;
        self.awaiting_release = still_held;
    }
}
