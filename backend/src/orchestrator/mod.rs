//! Orchestrator - builds the network and runs the event loop
//!
//! - **config**: serializable topology and run parameters
//! - **engine**: network construction, event dispatch, run lifecycle
//! - **report**: post-run snapshot of every station

pub mod config;
pub mod engine;
pub mod report;

// Re-export main types for convenience
pub use config::{
    ArrivalConfig, GeneratorConfig, RouteConfig, ServiceTimeConfig, SimulationConfig,
    StationConfig, StationKindConfig,
};
pub use engine::{Network, Orchestrator, SimulationError};
pub use report::{JobRecord, SimulationReport, StationReport};
