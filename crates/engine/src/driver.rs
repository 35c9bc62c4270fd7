//! Fixed-period tick thread.
//!
//! One named thread owns the [`AppContext`] and calls
//! [`AppContext::tick`] once per period against an absolute deadline, so a
//! slow tick shortens the following sleep instead of shifting the schedule.
//! When a tick overruns by more than a full period the schedule restarts
//! from now. `delta` is the measured time since the previous tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::context::AppContext;
use crate::error::{EngineError, EngineResult};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
pub struct TickDriver {
    interval: Duration,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl TickDriver {
    /// A zero interval is raised to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the tick thread. The context comes back from
    /// [`TickHandle::stop`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Spawn`] when the thread cannot be created.
    pub fn spawn(self, context: AppContext) -> EngineResult<TickHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(AtomicU64::new(0));

        let thread_running = Arc::clone(&running);
        let thread_ticks = Arc::clone(&ticks);
        let interval = self.interval;
        let thread = thread::Builder::new()
            .name("handheld-tick".to_string())
            .spawn(move || run(context, interval, &thread_running, &thread_ticks))
            .map_err(EngineError::Spawn)?;

        info!("Tick thread started at {} ms", interval.as_millis());
        Ok(TickHandle {
            running,
            ticks,
            thread: Some(thread),
        })
    }
}

fn run(mut context: AppContext, interval: Duration, running: &AtomicBool, ticks: &AtomicU64) -> AppContext {
    context.start();

    let mut tick: u64 = 0;
    let mut last = Instant::now();
    let mut deadline = last + interval;

    while running.load(Ordering::Acquire) && !context.is_shutdown_requested() {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;
        tick = tick.wrapping_add(1);
        context.tick(tick, delta_ms);
        ticks.store(tick, Ordering::Release);

        deadline += interval;
        if now > deadline + interval {
            trace!("Tick {} overran, restarting schedule", tick);
            deadline = now + interval;
        }
    }

    if context.is_shutdown_requested() {
        running.store(false, Ordering::Release);
    }
    debug!("Tick thread leaving after {} ticks", tick);
    context.shutdown();
    context
}

/// Running tick thread.
#[derive(Debug)]
pub struct TickHandle {
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    thread: Option<JoinHandle<AppContext>>,
}

impl TickHandle {
    /// False once stopped, or after the peer requested a shutdown.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Stop the thread and take the context back.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TickThreadPanicked`] when the thread died.
    pub fn stop(mut self) -> EngineResult<AppContext> {
        self.join()
    }

    fn join(&mut self) -> EngineResult<AppContext> {
        self.running.store(false, Ordering::Release);
        let Some(thread) = self.thread.take() else {
            return Err(EngineError::TickThreadPanicked);
        };
        match thread.join() {
            Ok(context) => {
                info!("Tick thread stopped after {} ticks", self.ticks());
                Ok(context)
            }
            Err(_) => {
                error!("Tick thread panicked");
                Err(EngineError::TickThreadPanicked)
            }
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            warn!("Tick handle dropped while running, stopping");
            if let Err(e) = self.join() {
                error!("Tick thread stop failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, LayoutMapper};
    use openhandheld_actions::NullSink;
    use openhandheld_ipc::{ChannelTransport, MessageCodec, PipeMessage, PipeTransport};
    use openhandheld_targets::{TargetKind, VirtualTarget, mock::MockBus};
    use openhandheld_test_helpers::prelude::*;

    fn context(bus: &MockBus) -> Result<AppContext, Box<dyn std::error::Error>> {
        let target = VirtualTarget::new(TargetKind::Xbox360, Box::new(bus.clone()), Duration::from_millis(2));
        Ok(AppContext::new(target, LayoutMapper::new(LayoutConfig::default())?, Box::new(NullSink)))
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(TickDriver::new(Duration::ZERO).interval(), Duration::from_millis(1));
    }

    #[test]
    fn stop_returns_context_and_unplugs_target() -> TestResult {
        let bus = MockBus::new();
        let handle = TickDriver::new(Duration::from_millis(2)).spawn(context(&bus)?)?;
        assert!(wait_until(WAIT_TIMEOUT, || handle.ticks() >= 3));
        assert!(handle.is_running());
        assert_eq!(bus.connected(), Some(TargetKind::Xbox360));

        let context = handle.stop()?;
        assert!(!context.target().is_connected());
        assert_eq!(bus.connected(), None);
        Ok(())
    }

    #[test]
    fn force_shutdown_ends_the_loop() -> TestResult {
        let bus = MockBus::new();
        let (ours, mut theirs) = ChannelTransport::pair();
        let ctx = context(&bus)?.with_pipe(Box::new(ours));
        let handle = TickDriver::new(Duration::from_millis(2)).spawn(ctx)?;

        theirs.send_frame(&MessageCodec::new().encode(&PipeMessage::ForceShutdown, 0, 0)?)?;
        assert!(wait_until(WAIT_TIMEOUT, || !handle.is_running()));
        let context = handle.stop()?;
        assert!(context.is_shutdown_requested());
        Ok(())
    }
}
