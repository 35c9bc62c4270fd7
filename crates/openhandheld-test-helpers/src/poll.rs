//! Polling for conditions set by background threads.

use std::thread;
use std::time::{Duration, Instant};

/// Default deadline for [`wait_until`] in tests.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Poll `condition` every millisecond until it holds or `timeout` passes.
///
/// Returns whether the condition was met.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn sees_flag_set_by_another_thread() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&flag);
        let handle = thread::spawn(move || setter.store(true, Ordering::Release));
        assert!(wait_until(WAIT_TIMEOUT, || flag.load(Ordering::Acquire)));
        assert!(handle.join().is_ok());
    }

    #[test]
    fn gives_up_after_timeout() {
        assert!(!wait_until(Duration::from_millis(5), || false));
    }
}
