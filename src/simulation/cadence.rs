//! Fixed-interval tick timing.
//!
//! Deadlines advance by exactly one interval per completed tick. A tick that
//! overruns moves the next deadline to "now": the following tick fires
//! immediately, and missed deadlines are never replayed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct TickCadence {
    interval: Duration,
    next_deadline: Instant,
}

impl TickCadence {
    /// Cadence whose first tick is due one interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_deadline: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_deadline
    }

    /// Record that the due tick finished at `now` and schedule the next one.
    ///
    /// Returns `true` if the tick overran the following deadline.
    pub fn complete(&mut self, now: Instant) -> bool {
        let next = self.next_deadline + self.interval;
        let overran = now > next;
        self.next_deadline = if overran { now } else { next };
        overran
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn test_first_tick_after_one_interval() {
        let start = Instant::now();
        let cadence = TickCadence::new(INTERVAL, start);
        assert!(!cadence.is_due(start));
        assert!(!cadence.is_due(start + Duration::from_millis(199)));
        assert!(cadence.is_due(start + INTERVAL));
    }

    #[test]
    fn test_deadlines_do_not_drift() {
        let start = Instant::now();
        let mut cadence = TickCadence::new(INTERVAL, start);

        // Tick runs 30ms late and takes 50ms; the next deadline is still on the grid.
        let finished = start + INTERVAL + Duration::from_millis(80);
        assert!(!cadence.complete(finished));
        assert_eq!(cadence.next_deadline(), start + INTERVAL * 2);
    }

    #[test]
    fn test_overrun_fires_once_immediately() {
        let start = Instant::now();
        let mut cadence = TickCadence::new(INTERVAL, start);

        // A tick that takes three intervals.
        let finished = start + INTERVAL * 4;
        assert!(cadence.complete(finished));
        assert_eq!(cadence.next_deadline(), finished);
        assert!(cadence.is_due(finished));

        // After the catch-up tick the cadence resumes from there; no backlog.
        let caught_up = finished + Duration::from_millis(5);
        assert!(!cadence.complete(caught_up));
        assert_eq!(cadence.next_deadline(), finished + INTERVAL);
        assert!(!cadence.is_due(caught_up));
    }
}
