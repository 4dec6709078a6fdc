//! Orchestrator Engine
//!
//! Builds a queueing network from a [`SimulationConfig`] and drives it with
//! an [`EventScheduler`]:
//! - Arrival generation (Poisson count, exponential spacing)
//! - Station admission, service and completion
//! - Weighted routing between stations
//! - Event logging (complete job history)
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::run
//! 1. Initialize every generator (schedules all arrivals)
//! 2. EventScheduler::simulate pops events in time order and hands each to
//!    the Network:
//!    - Arrival    → Generator::execute → QueueStation::add_job
//!    - Completion → QueueStation::execute → routing draw → add_job downstream
//! 3. Stop when the queue drains or the next event lies past the end time
//! 4. Snapshot stations into a SimulationReport
//! ```
//!
//! Every random stream is seeded from the one configured seed through
//! [`derive_seed`], one role per stream, so identical configurations
//! replay identically.
//!
//! # Example
//!
//! ```rust
//! use telco_simulator_core_rs::orchestrator::{Orchestrator, SimulationConfig};
//!
//! let mut orchestrator = Orchestrator::new(SimulationConfig::telco_default()).unwrap();
//! let report = orchestrator.run().unwrap();
//!
//! assert!(report.final_time <= 10.0);
//! println!("{} jobs reached the transducer", report.jobs_absorbed());
//! ```

use crate::arrivals::{Generator, GeneratorError};
use crate::events::{
    EntityId, EventHandler, EventPayload, EventScheduler, GeneratorId, SchedulerError, SimEvent,
    StationId,
};
use crate::models::{Event, EventLog, Job, JobSequence};
use crate::orchestrator::config::{
    ArrivalConfig, ServiceTimeConfig, SimulationConfig, StationKindConfig,
};
use crate::orchestrator::report::{SimulationReport, StationReport};
use crate::rng::derive_seed;
use crate::station::{QueueStation, StationError, ROUTING_TOLERANCE};
use crate::variates::{
    ConstantVariate, ExponentialVariate, GammaVariate, UniformVariate, VariateError,
    VariateGenerator,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

// Seed roles, see `derive_seed`
const ROUTING_SEED_ROLE: u64 = 0;
const GENERATOR_SEED_ROLE_BASE: u64 = 1_000;
const STATION_SEED_ROLE_BASE: u64 = 2_000;

// ============================================================================
// Errors
// ============================================================================

/// Errors that abort a simulation or prevent it from being built
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Station not found: {0}")]
    StationNotFound(String),

    #[error("No entity registered for {0}")]
    UnknownEntity(EntityId),

    #[error("Event {payload:?} cannot be delivered to {target}")]
    MismatchedEvent {
        target: EntityId,
        payload: EventPayload,
    },

    #[error("Simulation has already run")]
    AlreadyRun,

    #[error(transparent)]
    Variate(#[from] VariateError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Station(#[from] StationError),
}

// ============================================================================
// Network
// ============================================================================

/// Every schedulable entity of one run, plus the shared routing stream
#[derive(Debug)]
pub struct Network {
    generators: Vec<Generator>,
    stations: Vec<QueueStation>,
    routing_draw: UniformVariate,
    jobs: JobSequence,
    log: EventLog,
}

impl Network {
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn stations(&self) -> &[QueueStation] {
        &self.stations
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    pub fn jobs_created(&self) -> u64 {
        self.jobs.issued()
    }

    fn station_name(&self, id: StationId) -> String {
        self.stations
            .get(id.0)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| EntityId::Station(id).to_string())
    }

    /// Hand `job` to station `destination`
    fn deliver(
        &mut self,
        job: Job,
        destination: StationId,
        time: f64,
        scheduler: &mut EventScheduler,
    ) -> Result<(), SimulationError> {
        let station = self
            .stations
            .get_mut(destination.0)
            .ok_or(SimulationError::UnknownEntity(EntityId::Station(destination)))?;
        station.add_job(job, time, scheduler, &mut self.log)?;
        Ok(())
    }

    fn on_arrival(
        &mut self,
        id: GeneratorId,
        time: f64,
        scheduler: &mut EventScheduler,
    ) -> Result<(), SimulationError> {
        let generator = self
            .generators
            .get_mut(id.0)
            .ok_or(SimulationError::UnknownEntity(EntityId::Generator(id)))?;
        let generator_name = generator.name().to_string();

        match generator.execute(time, &mut self.jobs) {
            Some(arrival) => {
                let station = self.station_name(arrival.destination);
                self.log.log(Event::Arrival {
                    time,
                    generator: generator_name,
                    job_id: arrival.job.id(),
                    station,
                });
                self.deliver(arrival.job, arrival.destination, time, scheduler)
            }
            None => {
                self.log.log(Event::GeneratorIdle {
                    time,
                    generator: generator_name,
                });
                Ok(())
            }
        }
    }

    fn on_completion(
        &mut self,
        id: StationId,
        event: &SimEvent,
        scheduler: &mut EventScheduler,
    ) -> Result<(), SimulationError> {
        let EventPayload::Completion { job, server } = event.payload() else {
            return Err(SimulationError::MismatchedEvent {
                target: event.target(),
                payload: event.payload(),
            });
        };
        let time = event.time();

        // disjoint field borrows: the station, the log and the routing stream
        let station = self
            .stations
            .get_mut(id.0)
            .ok_or(SimulationError::UnknownEntity(EntityId::Station(id)))?;
        let dispatch = station.execute(
            job,
            server,
            time,
            scheduler,
            &mut self.log,
            &mut self.routing_draw,
        )?;
        let from = station.name().to_string();
        let to = self.station_name(dispatch.destination);
        debug!(from = %from, to = %to, job = %job, time, "routing job");

        self.log.log(Event::Routed {
            time,
            from,
            to,
            job_id: job,
            draw: dispatch.draw,
        });
        self.deliver(dispatch.job, dispatch.destination, time, scheduler)
    }
}

impl EventHandler for Network {
    type Error = SimulationError;

    fn dispatch(
        &mut self,
        event: SimEvent,
        scheduler: &mut EventScheduler,
    ) -> Result<(), SimulationError> {
        match (event.target(), event.payload()) {
            (EntityId::Generator(id), EventPayload::Arrival) => {
                self.on_arrival(id, event.time(), scheduler)
            }
            (EntityId::Station(id), EventPayload::Completion { .. }) => {
                self.on_completion(id, &event, scheduler)
            }
            (target, payload) => Err(SimulationError::MismatchedEvent { target, payload }),
        }
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Owns one simulation run: scheduler, network and resolved seed
#[derive(Debug)]
pub struct Orchestrator {
    seed: u64,
    scheduler: EventScheduler,
    network: Network,
    has_run: bool,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// Validates the topology, builds every generator and station, wires the
    /// routing edges and seeds all random streams.
    ///
    /// # Arguments
    ///
    /// * `config` - Complete simulation configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(SimulationError)` - Configuration validation failed
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let seed = config.rng_seed.unwrap_or_else(rand::random);
        let scheduler = EventScheduler::new(config.end_time)?;

        let station_ids: HashMap<&str, StationId> = config
            .stations
            .iter()
            .enumerate()
            .map(|(index, station)| (station.name.as_str(), StationId(index)))
            .collect();
        let lookup = |name: &str| {
            station_ids
                .get(name)
                .copied()
                .ok_or_else(|| SimulationError::StationNotFound(name.to_string()))
        };

        let mut stations = Vec::with_capacity(config.stations.len());
        for (index, station_config) in config.stations.iter().enumerate() {
            let id = StationId(index);
            let mut station = match &station_config.kind {
                StationKindConfig::Processing { servers, service } => QueueStation::processing(
                    id,
                    station_config.name.as_str(),
                    *servers,
                    Self::build_service(service)?,
                )?,
                StationKindConfig::Sink => QueueStation::sink(id, station_config.name.as_str()),
            };
            station.set_seed(derive_seed(seed, STATION_SEED_ROLE_BASE + index as u64));
            stations.push(station);
        }

        for route in &config.routes {
            let from = lookup(&route.from)?;
            let to = lookup(&route.to)?;
            stations[from.0].add_output_station(to, route.probability)?;
        }
        for station in &mut stations {
            station.validate_routing()?;
        }

        let mut generators = Vec::with_capacity(config.generators.len());
        for (index, generator_config) in config.generators.iter().enumerate() {
            let id = GeneratorId(index);
            let mut generator = match &generator_config.arrivals {
                ArrivalConfig::Poisson { rate } => {
                    Generator::new(id, generator_config.name.as_str(), *rate)?
                }
                ArrivalConfig::Trace { times } => Generator::with_arrival_times(
                    id,
                    generator_config.name.as_str(),
                    times.clone(),
                )?,
            };
            generator.set_seed(derive_seed(seed, GENERATOR_SEED_ROLE_BASE + index as u64));
            generator.set_queue_station(lookup(&generator_config.destination)?);
            generators.push(generator);
        }

        info!(
            seed,
            end_time = config.end_time,
            generators = generators.len(),
            stations = stations.len(),
            "network built"
        );

        Ok(Self {
            seed,
            scheduler,
            network: Network {
                generators,
                stations,
                routing_draw: UniformVariate::standard(derive_seed(seed, ROUTING_SEED_ROLE)),
                jobs: JobSequence::new(),
                log: EventLog::new(),
            },
            has_run: false,
        })
    }

    /// Validate configuration
    fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if !config.end_time.is_finite() || config.end_time < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "end_time must be finite and non-negative, got {}",
                config.end_time
            )));
        }

        if config.generators.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one generator".to_string(),
            ));
        }

        let mut station_names = HashSet::new();
        for station in &config.stations {
            if !station_names.insert(station.name.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate station name: {}",
                    station.name
                )));
            }
        }

        let mut generator_names = HashSet::new();
        for generator in &config.generators {
            if !generator_names.insert(generator.name.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate generator name: {}",
                    generator.name
                )));
            }
            if !station_names.contains(generator.destination.as_str()) {
                return Err(SimulationError::StationNotFound(generator.destination.clone()));
            }
        }

        let mut totals: HashMap<&str, f64> = HashMap::new();
        for route in &config.routes {
            for name in [&route.from, &route.to] {
                if !station_names.contains(name.as_str()) {
                    return Err(SimulationError::StationNotFound(name.clone()));
                }
            }
            *totals.entry(route.from.as_str()).or_insert(0.0) += route.probability;
        }

        for station in &config.stations {
            if let StationKindConfig::Processing { .. } = station.kind {
                let total = totals.get(station.name.as_str()).copied().unwrap_or(0.0);
                if (total - 1.0).abs() > ROUTING_TOLERANCE {
                    return Err(SimulationError::InvalidConfig(format!(
                        "Output probabilities of station {} sum to {}, expected 1.0",
                        station.name, total
                    )));
                }
            }
        }

        Ok(())
    }

    fn build_service(
        service: &ServiceTimeConfig,
    ) -> Result<Box<dyn VariateGenerator>, SimulationError> {
        let generator: Box<dyn VariateGenerator> = match service {
            ServiceTimeConfig::Exponential { rate } => Box::new(ExponentialVariate::new(*rate)?),
            ServiceTimeConfig::Gamma { shape, scale } => {
                Box::new(GammaVariate::with_parameters(*shape, *scale)?)
            }
            ServiceTimeConfig::Constant { value } => Box::new(ConstantVariate::new(*value)?),
        };
        Ok(generator)
    }

    /// Run the simulation to completion
    ///
    /// Initializes every generator, then dispatches events until the queue
    /// drains or the end time is reached. A run happens once; the first
    /// invariant violation aborts it and is returned.
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        if self.has_run {
            return Err(SimulationError::AlreadyRun);
        }
        self.has_run = true;

        for generator in &mut self.network.generators {
            generator.initialize(&mut self.scheduler)?;
        }

        let dispatched = self.scheduler.simulate(&mut self.network)?;
        debug!(dispatched, "event loop returned");

        let report = self.report();
        info!(
            final_time = report.final_time,
            jobs_created = report.jobs_created,
            jobs_absorbed = report.jobs_absorbed(),
            "run complete"
        );
        Ok(report)
    }

    /// Snapshot of the current state of the run
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            seed: self.seed,
            end_time: self.scheduler.end_time(),
            final_time: self.scheduler.now(),
            events_processed: self.scheduler.processed(),
            events_pending: self.scheduler.pending(),
            jobs_created: self.network.jobs_created(),
            stations: self
                .network
                .stations
                .iter()
                .map(StationReport::from)
                .collect(),
        }
    }

    /// Seed actually in use
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn station(&self, name: &str) -> Option<&QueueStation> {
        self.network.stations.iter().find(|s| s.name() == name)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.network.log
    }
}
