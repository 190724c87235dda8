use crate::errors::AppResult;
use crate::utils::date::parse_period;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

/// On-disk representation of record timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. Accepts the `T` separator and a fractional
/// part as well; the fraction is dropped.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ts| ts.with_nanosecond(0).unwrap_or(ts))
}

/// Immutable record of a confirmed work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRecord {
    pub id: i64,                   // ⇔ time_records.id
    pub task_id: i64,              // ⇔ time_records.task_id (FK tasks.id)
    pub start_time: NaiveDateTime, // ⇔ time_records.start_time (TEXT)
    pub end_time: NaiveDateTime,   // ⇔ time_records.end_time (TEXT)
    pub duration_seconds: i64,     // ⇔ time_records.duration_seconds
    pub productive: bool,          // ⇔ time_records.was_productive
}

/// Values of a record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeRecord {
    pub task_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    pub productive: bool,
}

/// A record joined with the names of its task and project, as shown in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub record: TimeRecord,
    pub project_id: i64,
    pub project_name: String,
    pub task_name: String,
}

/// Filter for the session log. Absent fields match everything; the date
/// range is inclusive and whole-day (`date_to` extends to 23:59:59).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SessionFilter {
    pub fn between(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
            ..Self::default()
        }
    }

    /// Filter for a `--period` value; `None` and `"all"` match every date.
    pub fn from_period(period: Option<&str>) -> AppResult<Self> {
        match period {
            None => Ok(Self::default()),
            Some(p) if p.eq_ignore_ascii_case("all") => Ok(Self::default()),
            Some(p) => {
                let (from, to) = parse_period(p)?;
                Ok(Self::between(from, to))
            }
        }
    }

    pub fn with_project(mut self, project_id: Option<i64>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn with_task(mut self, task_id: Option<i64>) -> Self {
        self.task_id = task_id;
        self
    }

    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.date_from.map(|d| d.and_time(NaiveTime::MIN))
    }

    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.date_to
            .and_then(|d| d.and_hms_opt(23, 59, 59))
    }
}

/// Simple sums over a list of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub sessions: usize,
    pub total_seconds: i64,
    pub productive_seconds: i64,
}

impl SessionSummary {
    pub fn from_entries(entries: &[SessionEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            acc.sessions += 1;
            acc.total_seconds += e.record.duration_seconds;
            if e.record.productive {
                acc.productive_seconds += e.record.duration_seconds;
            }
            acc
        })
    }
}
