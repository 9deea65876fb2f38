//! Quiet-period scheduling.
//!
//! [`Debouncer`] is a single cancellable slot: arming it replaces whatever
//! was pending and pushes the deadline out by the quiet period. Time is
//! passed in explicitly, so the owner decides whether it comes from the
//! wall clock ([`SystemClock`]) or from a test ([`ManualClock`]).

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Delay after the last change before the pipeline runs.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(300);

/// Monotonic time, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Duration,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Schedules `value` to fire one quiet period after `now`, returning the
    /// value it superseded, if any.
    pub fn arm(&mut self, value: T, now: Duration) -> Option<T> {
        let deadline = now + self.quiet;
        trace!(?deadline, "debounce armed");
        let superseded = self.pending.replace(Pending { value, deadline });
        if superseded.is_some() {
            debug!("debounce superseded a pending value");
        }
        superseded.map(|pending| pending.value)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Takes the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                trace!(?now, "debounce fired");
                self.cancel()
            }
            _ => None,
        }
    }

    /// Takes the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_period() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::default();
        debouncer.arm("x", clock.now());

        clock.advance_ms(299);
        assert_eq!(debouncer.poll(clock.now()), None);
        clock.advance_ms(1);
        assert_eq!(debouncer.poll(clock.now()), Some("x"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(clock.now()), None);
    }

    #[test]
    fn rearming_pushes_deadline_and_drops_superseded() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let mut fired = Vec::new();

        for (value, gap) in [("1", 100), ("12", 100), ("123", 100)] {
            debouncer.arm(value, clock.now());
            clock.advance_ms(gap);
            fired.extend(debouncer.poll(clock.now()));
        }
        assert!(fired.is_empty());
        assert_eq!(debouncer.deadline(), Some(Duration::from_millis(500)));

        clock.advance_ms(200);
        fired.extend(debouncer.poll(clock.now()));
        assert_eq!(fired, ["123"]);
    }

    #[test]
    fn arm_returns_superseded_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        assert_eq!(debouncer.arm(1, Duration::ZERO), None);
        assert_eq!(debouncer.arm(2, Duration::ZERO), Some(1));
        assert_eq!(debouncer.cancel(), Some(2));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn flush_ignores_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_secs(60));
        debouncer.arm("late", Duration::ZERO);
        assert_eq!(debouncer.flush(), Some("late"));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance_ms(25);
        assert_eq!(other.now(), Duration::from_millis(25));
    }
}
