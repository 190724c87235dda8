use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Nothing accumulated, not running.
    Idle,
    Running,
    /// Elapsed time frozen.
    Paused,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }
}
