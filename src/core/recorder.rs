//! Turns a confirmed elapsed span into a persisted time record.

use crate::clock::Clock;
use crate::db::TimeStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NewTimeRecord, SessionEntry, SessionFilter, SessionSummary, TimeRecord};
use chrono::TimeDelta;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SessionRecorder {
    clock: Arc<dyn Clock>,
}

impl SessionRecorder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Persist `elapsed_seconds` ending now against `task_id`.
    ///
    /// Does not touch the timer; the caller resets or resumes it.
    pub fn record_session<S: TimeStore + ?Sized>(
        &self,
        store: &mut S,
        task_id: Option<i64>,
        elapsed_seconds: i64,
        productive: bool,
    ) -> AppResult<TimeRecord> {
        let task_id =
            task_id.ok_or_else(|| AppError::InvalidSession("no task selected".into()))?;
        if elapsed_seconds <= 0 {
            return Err(AppError::InvalidSession(format!(
                "duration must be positive, got {elapsed_seconds}s"
            )));
        }

        // The id is a loose link held by the presentation layer.
        if store.get_task(task_id)?.is_none() {
            return Err(AppError::not_found("Task", task_id));
        }

        let out_of_range =
            || AppError::InvalidSession(format!("duration out of range: {elapsed_seconds}s"));
        let span = TimeDelta::try_seconds(elapsed_seconds).ok_or_else(out_of_range)?;
        let end_time = self.clock.wall_seconds();
        let start_time = end_time
            .checked_sub_signed(span)
            .ok_or_else(out_of_range)?;

        let record = store.create_time_record(&NewTimeRecord {
            task_id,
            start_time,
            end_time,
            duration_seconds: elapsed_seconds,
            productive,
        })?;

        info!(
            record = record.id,
            task = task_id,
            seconds = elapsed_seconds,
            productive,
            "session recorded"
        );
        Ok(record)
    }

    pub fn delete_session<S: TimeStore + ?Sized>(
        &self,
        store: &mut S,
        record_id: i64,
    ) -> AppResult<()> {
        if !store.delete_time_record(record_id)? {
            return Err(AppError::not_found("Time record", record_id));
        }
        debug!(record = record_id, "session deleted");
        Ok(())
    }

    pub fn list_sessions_for_task<S: TimeStore + ?Sized>(
        &self,
        store: &S,
        task_id: i64,
    ) -> AppResult<Vec<TimeRecord>> {
        store.list_time_records_for_task(task_id)
    }

    pub fn list_all_sessions<S: TimeStore + ?Sized>(
        &self,
        store: &S,
    ) -> AppResult<Vec<SessionEntry>> {
        store.list_all_time_records()
    }

    pub fn list_sessions_filtered<S: TimeStore + ?Sized>(
        &self,
        store: &S,
        filter: &SessionFilter,
    ) -> AppResult<Vec<SessionEntry>> {
        store.list_time_records_filtered(filter)
    }

    pub fn summarize<S: TimeStore + ?Sized>(
        &self,
        store: &S,
        filter: &SessionFilter,
    ) -> AppResult<SessionSummary> {
        let entries = store.list_time_records_filtered(filter)?;
        Ok(SessionSummary::from_entries(&entries))
    }
}
