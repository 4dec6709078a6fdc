//! Telco Simulator Core - Rust Engine
//!
//! Discrete-event simulation of a queueing network: multi-server stations
//! connected by probabilistic routing, fed by a stochastic arrival process.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation
//! - **variates**: Uniform, exponential, Poisson and gamma samplers
//! - **core**: Logical simulation clock
//! - **models**: Domain types (Job, event log)
//! - **events**: Scheduled events and the event scheduler
//! - **arrivals**: Arrival-process generator
//! - **station**: Queue stations, sinks and routing
//! - **orchestrator**: Configuration, network wiring and the run loop
//!
//! # Critical Invariants
//!
//! 1. Simulation time never decreases
//! 2. A station never has more busy servers than its capacity
//! 3. All randomness is deterministic given the seed

// Module declarations
pub mod arrivals;
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod station;
pub mod variates;

// Re-exports for convenience
pub use arrivals::{Generator, GeneratorError};
pub use crate::core::time::{ClockError, SimClock};
pub use events::{EventScheduler, SchedulerError};
pub use models::{Event, EventLog, Job, JobId};
pub use orchestrator::{Orchestrator, SimulationConfig, SimulationError, SimulationReport};
pub use rng::RngManager;
pub use station::{QueueStation, StationError, StationKind};
pub use variates::{VariateError, VariateGenerator};
