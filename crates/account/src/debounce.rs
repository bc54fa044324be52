//! Explicit debounce timers
//!
//! A [`Debouncer`] is armed on every input change and fires once its quiet
//! window has elapsed without a newer change. Each arm bumps a generation
//! token so a stale deadline can never fire on behalf of a newer input.

use std::time::Duration;
use tokio::time::Instant;

/// Generation token handed out when a debouncer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebounceToken(u64);

/// A single-shot, re-armable debounce timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: u64,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            deadline: None,
        }
    }

    /// The quiet window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the timer relative to `now`
    pub fn arm(&mut self, now: Instant) -> DebounceToken {
        self.generation += 1;
        self.deadline = Some(now + self.window);
        DebounceToken(self.generation)
    }

    /// Token of the most recent arm
    pub fn current_token(&self) -> DebounceToken {
        DebounceToken(self.generation)
    }

    /// Pending deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a change is waiting to be processed
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm the timer if its deadline has passed. Returns `true` when the
    /// caller should run the debounced action now.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm the timer if it was armed with `token` and is due.
    pub fn fire_token(&mut self, token: DebounceToken, now: Instant) -> bool {
        token == self.current_token() && self.fire_if_due(now)
    }

    /// Disarm unconditionally. Returns whether anything was pending.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.arm(start);

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(299)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(300)));
        // single shot
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_rearm_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.arm(start);
        debouncer.arm(start + Duration::from_millis(200));

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(350)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_stale_token_does_not_fire() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let stale = debouncer.arm(start);
        let fresh = debouncer.arm(start);

        let later = start + Duration::from_secs(1);
        assert!(!debouncer.fire_token(stale, later));
        assert!(debouncer.fire_token(fresh, later));
    }

    #[test]
    fn test_flush() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(!debouncer.flush());
        debouncer.arm(Instant::now());
        assert!(debouncer.is_pending());
        assert!(debouncer.flush());
        assert!(!debouncer.is_pending());
    }
}
