//! Trailing-edge debounce driven by the event loop clock

use std::time::{Duration, Instant};

/// Collapses a burst of `touch` calls into one firing, `wait` after the last one
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// Record activity; any earlier pending deadline is replaced
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the idle window has elapsed
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

    const WAIT: Duration = Duration::from_secs(1);

    #[test]
    fn test_idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::new(WAIT);
        assert!(!debouncer.fire(Instant::now() + WAIT * 10));
    }

    #[test]
    fn test_fires_once_after_wait() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.touch(start);

        assert!(!debouncer.fire(start + Duration::from_millis(999)));
        assert!(debouncer.fire(start + WAIT));
        assert!(!debouncer.fire(start + WAIT * 2));
    }

    #[test]
    fn test_new_activity_resets_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(800));

        assert!(!debouncer.fire(start + WAIT));
        assert!(debouncer.fire(start + Duration::from_millis(1800)));
    }

    #[test]
    fn test_cancel_drops_pending_fire() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.touch(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire(start + WAIT));
    }
}
