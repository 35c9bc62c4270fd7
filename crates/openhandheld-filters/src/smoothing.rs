//! Smoothing filters
//!
//! [`OneEuroFilter`] adapts its cutoff to the signal speed: slow motion is
//! smoothed heavily, fast motion passes with little lag.

use std::f64::consts::PI;

/// Exponential low-pass filter. The first sample passes through unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct LowPassState {
    last: f64,
    primed: bool,
}

impl LowPassState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last output; 0 before the first sample.
    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn filter(&mut self, x: f64, alpha: f64) -> f64 {
        let out = if self.primed {
            alpha * x + (1.0 - alpha) * self.last
        } else {
            self.primed = true;
            x
        };
        self.last = out;
        out
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One-euro filter on a single channel.
#[derive(Copy, Clone, Debug)]
pub struct OneEuroFilter {
    /// Minimum cutoff frequency in Hz.
    pub min_cutoff: f64,
    /// Cutoff slope against signal speed.
    pub beta: f64,
    derivative_cutoff: f64,
    x: LowPassState,
    dx: LowPassState,
    primed: bool,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            derivative_cutoff: 1.0,
            x: LowPassState::new(),
            dx: LowPassState::new(),
            primed: false,
        }
    }

    /// Filter `x` sampled at `rate` Hz.
    pub fn filter(&mut self, x: f64, rate: f64) -> f64 {
        if !x.is_finite() {
            return self.x.last();
        }
        let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };

        let dx = if self.primed {
            (x - self.x.last()) * rate
        } else {
            self.primed = true;
            0.0
        };

        let edx = self.dx.filter(dx, alpha(rate, self.derivative_cutoff));
        let cutoff = self.min_cutoff + self.beta * edx.abs();
        self.x.filter(x, alpha(rate, cutoff))
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.dx.reset();
        self.primed = false;
    }
}

/// Smoothing coefficient for a cutoff at a sample rate.
fn alpha(rate: f64, cutoff: f64) -> f64 {
    let tau = 1.0 / (2.0 * PI * cutoff);
    let te = 1.0 / rate;
    1.0 / (1.0 + tau / te)
}

/// Matched one-euro filters for a 2D stick.
#[derive(Copy, Clone, Debug)]
pub struct OneEuroPair {
    pub x: OneEuroFilter,
    pub y: OneEuroFilter,
}

impl OneEuroPair {
    /// Cutoff tuned for stick angles.
    pub const DEFAULT_CUTOFF: f64 = 0.005;
    pub const DEFAULT_BETA: f64 = 0.004;

    pub fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            x: OneEuroFilter::new(min_cutoff, beta),
            y: OneEuroFilter::new(min_cutoff, beta),
        }
    }

    pub fn filter(&mut self, x: f64, y: f64, rate: f64) -> (f64, f64) {
        (self.x.filter(x, rate), self.y.filter(y, rate))
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

impl Default for OneEuroPair {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CUTOFF, Self::DEFAULT_BETA)
    }
}
