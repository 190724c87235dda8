use crate::core::timer::format_duration;
use crate::models::SessionEntry;
use crate::models::time_record::format_timestamp;
use serde::Serialize;

/// Flat row written by the CSV and JSON exporters.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionExport {
    pub id: i64,
    pub project: String,
    pub task: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_seconds: i64,
    pub duration: String,
    pub productive: bool,
}

impl From<&SessionEntry> for SessionExport {
    fn from(e: &SessionEntry) -> Self {
        Self {
            id: e.record.id,
            project: e.project_name.clone(),
            task: e.task_name.clone(),
            start_time: format_timestamp(&e.record.start_time),
            end_time: format_timestamp(&e.record.end_time),
            duration_seconds: e.record.duration_seconds,
            duration: format_duration(e.record.duration_seconds.max(0) as u64),
            productive: e.record.productive,
        }
    }
}
