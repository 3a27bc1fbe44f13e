//! Debounce state machine
//!
//! Coalesces a burst of filesystem events into a single trigger: every
//! event pushes the deadline to `now + quiet_period`, and the trigger
//! fires once the deadline passes with no further events. Kept separate
//! from the event plumbing so the policy is testable with explicit
//! instants.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Debounce {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Push the deadline out to `now + quiet_period`
    pub fn record_event(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the trigger if the deadline has passed
    pub fn fire_if_elapsed(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending trigger
    pub fn clear(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const QUIET: Duration = Duration::from_secs(2);

    #[rstest]
    fn does_not_fire_without_events() {
        let mut debounce = Debounce::new(QUIET);

        assert!(!debounce.is_pending());
        assert!(!debounce.fire_if_elapsed(Instant::now()));
    }

    #[rstest]
    fn fires_once_the_quiet_period_elapses() {
        let mut debounce = Debounce::new(QUIET);
        let start = Instant::now();

        debounce.record_event(start);

        assert!(!debounce.fire_if_elapsed(start + Duration::from_secs(1)));
        assert!(debounce.fire_if_elapsed(start + QUIET));
        // the trigger is consumed
        assert!(!debounce.is_pending());
        assert!(!debounce.fire_if_elapsed(start + Duration::from_secs(10)));
    }

    #[rstest]
    fn every_event_pushes_the_deadline_out() {
        let mut debounce = Debounce::new(QUIET);
        let start = Instant::now();

        debounce.record_event(start);
        debounce.record_event(start + Duration::from_secs(1));

        assert!(!debounce.fire_if_elapsed(start + QUIET));
        assert!(debounce.fire_if_elapsed(start + Duration::from_secs(1) + QUIET));
    }

    #[rstest]
    fn clear_drops_the_pending_trigger() {
        let mut debounce = Debounce::new(QUIET);
        let start = Instant::now();

        debounce.record_event(start);
        debounce.clear();

        assert!(!debounce.is_pending());
        assert!(!debounce.fire_if_elapsed(start + Duration::from_secs(10)));
    }
}
