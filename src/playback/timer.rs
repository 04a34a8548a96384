//! Repeating timer polled by the playback driver.

use std::time::Duration;

/// A repeating timer. Dropping it cancels it.
///
/// Late polls fire once and re-arm one interval after the poll, so missed
/// periods are skipped rather than replayed in a burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Duration,
}

impl IntervalTimer {
    /// Arm a timer whose first firing is one interval after `now`.
    pub fn start(now: Duration, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    #[inline]
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.next_due
    }

    /// Consume one firing and re-arm.
    pub fn fire(&mut self, now: Duration) {
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
    }
}
