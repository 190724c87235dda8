//! Elapsed-time state machine.
//!
//! `Idle -> Running <-> Paused`, `reset()` from anywhere goes back to `Idle`.
//! Every transition is total: calling one from the wrong state is a no-op.

use crate::clock::Clock;
use crate::models::TimerState;
use std::sync::Arc;
use std::time::Duration;

pub struct Timer {
    clock: Arc<dyn Clock>,
    state: TimerState,
    /// Monotonic reading taken when the current run started.
    run_started: Option<Duration>,
    /// Time banked by earlier runs.
    accumulated: Duration,
}

impl Timer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            run_started: None,
            accumulated: Duration::ZERO,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Returns false when the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        self.run_started = Some(self.clock.monotonic());
        self.state = TimerState::Running;
        true
    }

    /// Returns false unless the timer was running.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.accumulated += self.current_run();
        self.run_started = None;
        self.state = TimerState::Paused;
        true
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.run_started = None;
        self.state = TimerState::Idle;
    }

    /// Elapsed time including the run in progress.
    pub fn elapsed_duration(&self) -> Duration {
        match self.state {
            TimerState::Running => self.accumulated + self.current_run(),
            _ => self.accumulated,
        }
    }

    /// Whole elapsed seconds.
    pub fn elapsed(&self) -> u64 {
        self.elapsed_duration().as_secs()
    }

    pub fn display(&self) -> String {
        format_duration(self.elapsed())
    }

    fn current_run(&self) -> Duration {
        self.run_started
            .map(|t0| self.clock.monotonic().saturating_sub(t0))
            .unwrap_or_default()
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}
