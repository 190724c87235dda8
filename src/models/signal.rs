use super::time_record::TimeRecord;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Audible cue requested alongside a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Single,
    /// Repeat until the prompt is answered.
    Looped,
}

/// User's answer to "were you working?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    /// Anything other than an explicit yes counts as no.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }
}

/// Outstanding productivity question for one elapsed span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRequest {
    pub id: u64,
    pub elapsed_seconds: u64,
    pub task_id: Option<i64>,
    /// The timer was running when the span was frozen; resume after a yes.
    pub resume_after: bool,
    pub cue: Option<SoundCue>,
    pub requested_at: NaiveDateTime,
}

/// Side effects the tracker asks the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TrackerSignal {
    ConfirmationRequested(ConfirmationRequest),
    Sound(SoundCue),
    SessionRecorded(TimeRecord),
    /// Elapsed time thrown away; carries the discarded seconds.
    SessionDiscarded(u64),
    /// Persisting failed; the elapsed seconds stay on the timer.
    StorageFailed { elapsed_seconds: u64, message: String },
}
