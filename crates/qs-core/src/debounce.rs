//! Debouncing for expensive collection passes.
//!
//! Time is passed in rather than read from a clock, so hosts drive the debouncer from their
//! own event loop and tests can step through it deterministically.

use std::time::{Duration, Instant};

/// Holds the latest scheduled item until the quiet period has elapsed.
///
/// Scheduling a new item replaces the pending one and restarts the quiet period; the deadline
/// is reset, never extended from the old one.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Quiet period.
    delay: Duration,
    /// Deadline and the item waiting for it.
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `item`, replacing anything pending.
    pub fn schedule(&mut self, now: Instant, item: T) {
        self.pending = Some((now + self.delay, item));
    }

    /// Takes the pending item if its deadline has passed.
    pub fn ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, item)| item),
            _ => None,
        }
    }

    /// Drops the pending item.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns true if an item is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending item.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start, 1);
        assert_eq!(d.ready(start + Duration::from_millis(100)), None);
        assert_eq!(d.ready(start + DELAY), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn new_item_resets_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start, 1);
        d.schedule(start + Duration::from_millis(200), 2);
        assert_eq!(d.ready(start + DELAY), None);
        assert_eq!(d.deadline(), Some(start + Duration::from_millis(450)));
        assert_eq!(d.ready(start + Duration::from_millis(450)), Some(2));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule(start, "x");
        d.cancel();
        assert_eq!(d.ready(start + DELAY * 2), None);
    }
}
