//! Periodic productivity check.
//!
//! The scheduler owns no thread. Whoever drives it calls [`CheckScheduler::on_tick`]
//! with the current monotonic reading; when the interval has elapsed it
//! re-arms first and only then looks at the timer, so a firing can never
//! stop the cadence.

use crate::core::timer::Timer;
use std::time::Duration;
use tracing::debug;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    /// Interval not elapsed yet.
    NotDue,
    /// Fired while the timer was not running; nothing to confirm.
    Skipped,
    /// Fired on a running timer, which is now paused at `elapsed_seconds`.
    Confirm { elapsed_seconds: u64 },
}

#[derive(Debug, Clone)]
pub struct CheckScheduler {
    interval: Duration,
    next_due: Duration,
}

impl CheckScheduler {
    pub fn new(interval: Duration, now: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Time left before the next firing.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }

    /// Schedule the next firing one full interval after `now`.
    pub fn rearm(&mut self, now: Duration) {
        self.next_due = now + self.interval;
    }

    /// Change the period; the new one counts from `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Duration) {
        self.interval = interval;
        self.rearm(now);
    }

    pub fn on_tick(&mut self, now: Duration, timer: &mut Timer) -> Firing {
        if now < self.next_due {
            return Firing::NotDue;
        }

        // A late tick fires once, never in a burst.
        self.rearm(now);

        if !timer.is_running() {
            debug!(state = timer.state().as_str(), "check fired, timer not running");
            return Firing::Skipped;
        }

        let elapsed_seconds = timer.elapsed();
        timer.pause();
        debug!(elapsed_seconds, "check fired, timer paused for confirmation");
        Firing::Confirm { elapsed_seconds }
    }
}
