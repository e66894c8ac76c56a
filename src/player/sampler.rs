use std::time::{Duration, Instant};

/// Recurring position poll owned by a playing session.
///
/// The sampler is a deadline rather than a thread: the host loop waits until
/// `deadline` and then calls `poll`. Dropping it cancels it, so there is
/// never a tick left in flight after playback stops.
#[derive(Debug, Clone)]
pub struct Sampler {
    interval: Duration,
    next_due: Instant,
}

impl Sampler {
    pub fn start(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next_due
    }

    /// Return true if a sample is due at `now`, and schedule the next one.
    ///
    /// Missed ticks are not replayed; the next tick is one interval after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}
