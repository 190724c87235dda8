//! One tracking session: timer, periodic check and recorder behind a
//! single owner.
//!
//! The tracker is driven from outside: `tick()` on a steady cadence, user
//! commands in between, and `resolve()` once the user answers a
//! [`ConfirmationRequest`]. It never blocks; everything the presentation
//! layer has to show or play comes back as [`TrackerSignal`]s.

use crate::clock::Clock;
use crate::config::CheckSettings;
use crate::core::recorder::SessionRecorder;
use crate::core::scheduler::{CheckScheduler, Firing};
use crate::core::timer::Timer;
use crate::db::TimeStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Confirmation, ConfirmationRequest, TimerState, TrackerSignal};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct Tracker<S: TimeStore> {
    store: S,
    clock: Arc<dyn Clock>,
    timer: Timer,
    scheduler: CheckScheduler,
    recorder: SessionRecorder,
    settings: CheckSettings,
    current_task: Option<i64>,
    pending: Option<ConfirmationRequest>,
    next_request_id: u64,
}

impl<S: TimeStore> Tracker<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, settings: CheckSettings) -> Self {
        let scheduler = CheckScheduler::new(settings.interval(), clock.monotonic());
        Self {
            store,
            timer: Timer::new(clock.clone()),
            recorder: SessionRecorder::new(clock.clone()),
            clock,
            scheduler,
            settings,
            current_task: None,
            pending: None,
            next_request_id: 1,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> CheckSettings {
        self.settings
    }

    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn elapsed(&self) -> u64 {
        self.timer.elapsed()
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn display(&self) -> String {
        self.timer.display()
    }

    pub fn current_task(&self) -> Option<i64> {
        self.current_task
    }

    pub fn pending(&self) -> Option<&ConfirmationRequest> {
        self.pending.as_ref()
    }

    /// Seconds until the next periodic check.
    pub fn next_check_in(&self) -> u64 {
        self.scheduler.remaining(self.clock.monotonic()).as_secs()
    }

    /// Point the tracker at another task. `None` clears the selection.
    pub fn select_task(&mut self, task_id: Option<i64>) -> AppResult<()> {
        if let Some(id) = task_id {
            if self.store.get_task(id)?.is_none() {
                return Err(AppError::not_found("Task", id));
            }
        }
        self.current_task = task_id;
        Ok(())
    }

    /// Start or resume. Refused while a confirmation is outstanding.
    pub fn start(&mut self) -> bool {
        if self.pending.is_some() {
            debug!("start ignored, confirmation pending");
            return false;
        }
        let from_idle = self.timer.state() == TimerState::Idle;
        let started = self.timer.start();
        if started && from_idle {
            // first check one full interval after tracking begins
            self.scheduler.rearm(self.clock.monotonic());
        }
        started
    }

    pub fn pause(&mut self) -> bool {
        self.timer.pause()
    }

    /// Discard the elapsed time, and any outstanding confirmation with it.
    pub fn reset(&mut self) {
        if let Some(req) = self.pending.take() {
            debug!(request = req.id, "pending confirmation dropped by reset");
        }
        self.timer.reset();
    }

    /// Swap in new check settings; a changed interval counts from now.
    pub fn apply_settings(&mut self, settings: CheckSettings) {
        if settings.interval() != self.scheduler.interval() {
            self.scheduler
                .set_interval(settings.interval(), self.clock.monotonic());
        }
        self.settings = settings;
    }

    pub fn tick(&mut self) -> Vec<TrackerSignal> {
        let now = self.clock.monotonic();
        match self.scheduler.on_tick(now, &mut self.timer) {
            Firing::NotDue | Firing::Skipped => Vec::new(),
            Firing::Confirm { elapsed_seconds: 0 } => {
                // nothing worth asking about yet
                self.timer.start();
                Vec::new()
            }
            Firing::Confirm { elapsed_seconds } => self.open_request(elapsed_seconds, true),
        }
    }

    /// Stop tracking. Elapsed time, if any, goes through the same
    /// confirmation as a periodic check but tracking does not resume.
    pub fn request_stop(&mut self) -> Vec<TrackerSignal> {
        if self.pending.is_some() {
            return Vec::new();
        }
        self.timer.pause();
        let elapsed = self.timer.elapsed();
        if elapsed == 0 {
            self.timer.reset();
            return Vec::new();
        }
        self.open_request(elapsed, false)
    }

    fn open_request(&mut self, elapsed_seconds: u64, resume_after: bool) -> Vec<TrackerSignal> {
        let request = ConfirmationRequest {
            id: self.next_request_id,
            elapsed_seconds,
            task_id: self.current_task,
            resume_after,
            cue: self.settings.sound_cue(),
            requested_at: self.clock.wall_seconds(),
        };
        self.next_request_id += 1;
        self.pending = Some(request.clone());

        let mut signals = Vec::with_capacity(2);
        if let Some(cue) = request.cue {
            signals.push(TrackerSignal::Sound(cue));
        }
        signals.push(TrackerSignal::ConfirmationRequested(request));
        signals
    }

    /// Apply the user's answer to request `request_id`.
    ///
    /// - No: the span is discarded and the timer reset.
    /// - Yes: the span is recorded as productive, the timer reset and, for a
    ///   periodic check, started again.
    /// - Yes with a storage failure: the timer keeps the span, paused, and a
    ///   `StorageFailed` signal is returned.
    /// - Yes rejected by the recorder (no task, stale task): the span is
    ///   discarded as for No and the rejection is returned as the error.
    ///
    /// In every case the next periodic check is one full interval away.
    /// Answers to unknown or superseded requests are ignored.
    pub fn resolve(
        &mut self,
        request_id: u64,
        answer: Confirmation,
    ) -> AppResult<Vec<TrackerSignal>> {
        let Some(request) = self.pending.take_if(|r| r.id == request_id) else {
            debug!(request = request_id, "answer to unknown request ignored");
            return Ok(Vec::new());
        };

        let outcome = self.apply_answer(&request, answer);
        self.scheduler.rearm(self.clock.monotonic());
        outcome
    }

    fn apply_answer(
        &mut self,
        request: &ConfirmationRequest,
        answer: Confirmation,
    ) -> AppResult<Vec<TrackerSignal>> {
        if answer == Confirmation::No {
            self.timer.reset();
            debug!(seconds = request.elapsed_seconds, "span discarded");
            return Ok(vec![TrackerSignal::SessionDiscarded(request.elapsed_seconds)]);
        }

        let seconds = i64::try_from(request.elapsed_seconds)
            .map_err(|_| AppError::InvalidSession("duration out of range".into()));
        let recorded = seconds.and_then(|secs| {
            self.recorder
                .record_session(&mut self.store, request.task_id, secs, true)
        });

        match recorded {
            Ok(record) => {
                self.timer.reset();
                if request.resume_after {
                    self.timer.start();
                }
                Ok(vec![TrackerSignal::SessionRecorded(record)])
            }
            Err(e) if e.is_storage() => {
                error!(seconds = request.elapsed_seconds, error = %e, "could not record session");
                Ok(vec![TrackerSignal::StorageFailed {
                    elapsed_seconds: self.timer.elapsed(),
                    message: e.to_string(),
                }])
            }
            Err(e) => {
                warn!(error = %e, "session rejected");
                self.timer.reset();
                if request.resume_after {
                    self.timer.start();
                }
                Err(e)
            }
        }
    }
}
