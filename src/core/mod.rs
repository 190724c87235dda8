pub mod catalog;
pub mod log;
pub mod recorder;
pub mod scheduler;
pub mod timer;
pub mod tracker;

pub use catalog::Catalog;
pub use recorder::SessionRecorder;
pub use scheduler::{CheckScheduler, Firing};
pub use timer::{Timer, format_duration};
pub use tracker::Tracker;
