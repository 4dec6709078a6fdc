//! Simulation configuration
//!
//! A configuration describes one run: the end time, an optional seed and a
//! fixed topology of generators, stations and routing edges. Topologies are
//! plain data and (de)serialize as JSON.
//!
//! ```json
//! {
//!   "end_time": 10.0,
//!   "rng_seed": 543210,
//!   "generators": [
//!     { "name": "Gen_1", "destination": "Station_1",
//!       "arrivals": { "type": "poisson", "rate": 4.0 } }
//!   ],
//!   "stations": [
//!     { "name": "Station_1",
//!       "kind": { "type": "processing", "servers": 3,
//!                 "service": { "distribution": "exponential", "rate": 0.5 } } },
//!     { "name": "Transducer", "kind": { "type": "sink" } }
//!   ],
//!   "routes": [
//!     { "from": "Station_1", "to": "Transducer", "probability": 1.0 }
//!   ]
//! }
//! ```

use crate::variates::{DEFAULT_SCALE, DEFAULT_SHAPE};
use serde::{Deserialize, Serialize};

/// Complete configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Hard cutoff; events after it never execute
    pub end_time: f64,

    /// Seed for every random stream; `None` picks a fresh random seed
    #[serde(default)]
    pub rng_seed: Option<u64>,

    pub generators: Vec<GeneratorConfig>,

    pub stations: Vec<StationConfig>,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub name: String,

    /// Station receiving generated jobs
    pub destination: String,

    pub arrivals: ArrivalConfig,
}

/// How a generator schedules its arrivals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrivalConfig {
    /// Poisson count per time unit, exponential spacing
    Poisson { rate: f64 },

    /// Fixed arrival times
    Trace { times: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub kind: StationKindConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StationKindConfig {
    Processing {
        servers: usize,
        service: ServiceTimeConfig,
    },
    Sink,
}

/// Service-time distribution of a processing station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum ServiceTimeConfig {
    Exponential {
        /// Mean jobs served per time unit
        rate: f64,
    },
    Gamma {
        #[serde(default = "default_gamma_shape")]
        shape: f64,
        #[serde(default = "default_gamma_scale")]
        scale: f64,
    },
    Constant {
        value: f64,
    },
}

impl ServiceTimeConfig {
    /// Gamma service with the default shape and scale
    pub fn gamma() -> Self {
        ServiceTimeConfig::Gamma {
            shape: DEFAULT_SHAPE,
            scale: DEFAULT_SCALE,
        }
    }
}

fn default_gamma_shape() -> f64 {
    DEFAULT_SHAPE
}

fn default_gamma_scale() -> f64 {
    DEFAULT_SCALE
}

/// Routing edge between two stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub from: String,
    pub to: String,
    pub probability: f64,
}

impl RouteConfig {
    pub fn new(from: &str, to: &str, probability: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            probability,
        }
    }
}

impl StationConfig {
    pub fn processing(name: &str, servers: usize, service: ServiceTimeConfig) -> Self {
        Self {
            name: name.to_string(),
            kind: StationKindConfig::Processing { servers, service },
        }
    }

    pub fn sink(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: StationKindConfig::Sink,
        }
    }
}

impl GeneratorConfig {
    pub fn poisson(name: &str, destination: &str, rate: f64) -> Self {
        Self {
            name: name.to_string(),
            destination: destination.to_string(),
            arrivals: ArrivalConfig::Poisson { rate },
        }
    }

    pub fn trace(name: &str, destination: &str, times: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            destination: destination.to_string(),
            arrivals: ArrivalConfig::Trace { times },
        }
    }
}

impl SimulationConfig {
    /// The reference telco topology
    ///
    /// ```text
    /// Gen_1 (4/h) ─▶ Station_1 (3 servers, 0.5/h) ─1.0─▶ Station_2 (1 server, 1/h)
    ///                      ▲                                  │
    ///                      └────────────── 0.2 ───────────────┤
    ///                                                         └─0.8─▶ Transducer
    /// ```
    ///
    /// Time is measured in hours; the run covers 10 hours with seed 543210.
    pub fn telco_default() -> Self {
        Self {
            end_time: 10.0,
            rng_seed: Some(543210),
            generators: vec![GeneratorConfig::poisson("Gen_1", "Station_1", 4.0)],
            stations: vec![
                StationConfig::processing(
                    "Station_1",
                    3,
                    ServiceTimeConfig::Exponential { rate: 0.5 },
                ),
                StationConfig::processing(
                    "Station_2",
                    1,
                    ServiceTimeConfig::Exponential { rate: 1.0 },
                ),
                StationConfig::sink("Transducer"),
            ],
            routes: vec![
                RouteConfig::new("Station_1", "Station_2", 1.0),
                RouteConfig::new("Station_2", "Station_1", 0.2),
                RouteConfig::new("Station_2", "Transducer", 0.8),
            ],
        }
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }
}
