//! Event scheduling
//!
//! - **types**: `SimEvent`, entity ids and event payloads
//! - **scheduler**: `EventScheduler`, the event queue and clock

pub mod scheduler;
pub mod types;

pub use scheduler::{EventHandler, EventScheduler, SchedulerError};
pub use types::{EntityId, EventId, EventPayload, GeneratorId, SimEvent, StationId};
