//! Domain models for the queueing network simulator

pub mod event;
pub mod job;

// Re-exports
pub use event::{Event, EventLog};
pub use job::{Job, JobError, JobId, JobSequence};
