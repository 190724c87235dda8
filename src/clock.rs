//! Clock source for the timer core.
//!
//! Elapsed-time math uses the monotonic reading; record timestamps use the
//! local wall clock. Both come from the same injectable [`Clock`] so the
//! timer, scheduler and recorder can be driven deterministically in tests.

use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary, fixed origin.
    fn monotonic(&self) -> Duration;

    /// Current local date-time.
    fn wall(&self) -> NaiveDateTime;

    /// Current local date-time truncated to whole seconds.
    fn wall_seconds(&self) -> NaiveDateTime {
        let now = self.wall();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Real clock backed by [`Instant`] and [`Local`].
#[derive(Debug)]
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
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug)]
struct ManualState {
    monotonic: Duration,
    wall: NaiveDateTime,
}

/// Hand-driven clock. Advancing it moves both readings forward together.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new(wall: NaiveDateTime) -> Self {
        Self {
            state: Mutex::new(ManualState {
                monotonic: Duration::ZERO,
                wall,
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.monotonic += by;
        if let Ok(delta) = TimeDelta::from_std(by) {
            state.wall += delta;
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).monotonic
    }

    fn wall(&self) -> NaiveDateTime {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn manual_clock_moves_both_readings() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = ManualClock::new(start);

        clock.advance_secs(125);
        assert_eq!(clock.monotonic(), Duration::from_secs(125));
        assert_eq!(clock.wall(), start + TimeDelta::seconds(125));
    }

    #[test]
    fn wall_seconds_drops_subsecond_part() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(9, 0, 0, 750)
            .unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.wall_seconds().nanosecond(), 0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.monotonic();
        let b = clock.monotonic();
        assert!(b >= a);
    }
}
