//! Cancellable single-shot deadline used to coalesce resize storms.

use std::time::{Duration, Instant};

/// Trailing-edge debounce: every [`arm`](Self::arm) pushes the deadline out
/// by the full window, and [`fire`](Self::fire) reports `true` exactly once,
/// when a deadline has passed with no further signal. No threads or timers
/// are involved; the owner pumps `fire` from its event loop.
#[derive(Clone, Copy, Debug)]
pub struct SingleShot {
    window: Duration,
    deadline: Option<Instant>,
}

impl SingleShot {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Starts (or restarts) the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline(always)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarms and returns `true` when the deadline has been reached.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn test_fires_once_after_window() {
        let mut shot = SingleShot::new(WINDOW);
        let t0 = Instant::now();
        shot.arm(t0);
        assert!(!shot.fire(t0 + Duration::from_millis(299)));
        assert!(shot.fire(t0 + WINDOW));
        // Already disarmed; no repeat firing.
        assert!(!shot.fire(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_rearm_extends_deadline() {
        let mut shot = SingleShot::new(WINDOW);
        let t0 = Instant::now();
        shot.arm(t0);
        let t1 = t0 + Duration::from_millis(200);
        shot.arm(t1);
        // The original deadline has passed but the re-arm moved it.
        assert!(!shot.fire(t0 + WINDOW));
        assert!(shot.fire(t1 + WINDOW));
    }

    #[test]
    fn test_cancel() {
        let mut shot = SingleShot::new(WINDOW);
        let t0 = Instant::now();
        shot.arm(t0);
        shot.cancel();
        assert!(!shot.is_armed());
        assert!(!shot.fire(t0 + Duration::from_secs(1)));
    }
}
