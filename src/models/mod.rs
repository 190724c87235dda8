pub mod project;
pub mod signal;
pub mod task;
pub mod time_record;
pub mod timer_state;

pub use project::Project;
pub use signal::{Confirmation, ConfirmationRequest, SoundCue, TrackerSignal};
pub use task::Task;
pub use time_record::{NewTimeRecord, SessionEntry, SessionFilter, SessionSummary, TimeRecord};
pub use timer_state::TimerState;
