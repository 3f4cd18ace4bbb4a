mod entity;
mod registry;
mod scheduler;

pub use entity::{format_time, Timer, TimerState};
pub use registry::TimerRegistry;
pub use scheduler::{Job, JobId, Scheduler};
