//! Arrival process for the queueing network.
//!
//! A [`Generator`] decides how many jobs arrive within one unit of logical
//! time by drawing a Poisson count, then spaces those arrivals by summing
//! independent exponential inter-arrival draws. Every arrival becomes one
//! scheduled event; when it fires the generator creates a job and hands it
//! to its destination station.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed → same arrival count and times
//! 2. **One-shot schedule**: The schedule is computed once, at initialization
//! 3. **Trace-driven option**: A fixed list of arrival times can replace
//!    the random schedule
//!
//! Arrivals are spaced from time zero, so with a high rate the cumulative
//! schedule may extend past one time unit; it is not truncated.
//!
//! # Example
//!
//! ```
//! use telco_simulator_core_rs::arrivals::Generator;
//! use telco_simulator_core_rs::events::{EventScheduler, GeneratorId, StationId};
//!
//! let mut scheduler = EventScheduler::new(10.0).unwrap();
//! let mut generator = Generator::new(GeneratorId(0), "Gen_1", 4.0).unwrap();
//! generator.set_seed(543210);
//! generator.set_queue_station(StationId(0));
//!
//! let count = generator.initialize(&mut scheduler).unwrap();
//! assert_eq!(scheduler.pending(), count);
//! ```

use crate::events::{EntityId, EventPayload, EventScheduler, GeneratorId, SchedulerError, StationId};
use crate::models::{Job, JobSequence};
use crate::rng::derive_seed;
use crate::variates::{ExponentialVariate, PoissonVariate, VariateError, VariateGenerator};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Generator {0} has already been initialized")]
    AlreadyInitialized(String),

    #[error("Generator {generator} has invalid arrival time {time}")]
    InvalidArrivalTime { generator: String, time: f64 },

    #[error(transparent)]
    Variate(#[from] VariateError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Where arrival times come from
#[derive(Debug, Clone)]
enum ArrivalSchedule {
    /// Poisson count, exponential spacing
    Random {
        count: PoissonVariate,
        spacing: ExponentialVariate,
    },
    /// Fixed arrival times, measured from initialization
    Trace(Vec<f64>),
}

/// A job handed to a station
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub job: Job,
    pub destination: StationId,
}

/// Arrival-process driver
#[derive(Debug, Clone)]
pub struct Generator {
    id: GeneratorId,
    name: String,
    schedule: ArrivalSchedule,
    queue_station: Option<StationId>,
    /// Scheduled arrival times not yet fired
    pending: VecDeque<f64>,
    /// Every arrival time produced by initialization
    arrival_times: Vec<f64>,
    initialized: bool,
    jobs_sent: usize,
}

impl Generator {
    /// Random arrivals at `rate` jobs per time unit
    pub fn new(id: GeneratorId, name: impl Into<String>, rate: f64) -> Result<Self, GeneratorError> {
        let schedule = ArrivalSchedule::Random {
            count: PoissonVariate::new(rate)?,
            spacing: ExponentialVariate::new(rate)?,
        };
        Ok(Self::build(id, name.into(), schedule))
    }

    /// Arrivals at fixed times relative to initialization
    pub fn with_arrival_times(
        id: GeneratorId,
        name: impl Into<String>,
        times: Vec<f64>,
    ) -> Result<Self, GeneratorError> {
        let name = name.into();
        if let Some(&bad) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(GeneratorError::InvalidArrivalTime {
                generator: name,
                time: bad,
            });
        }
        let mut times = times;
        times.sort_by(f64::total_cmp);
        Ok(Self::build(id, name, ArrivalSchedule::Trace(times)))
    }

    fn build(id: GeneratorId, name: String, schedule: ArrivalSchedule) -> Self {
        Self {
            id,
            name,
            schedule,
            queue_station: None,
            pending: VecDeque::new(),
            arrival_times: Vec::new(),
            initialized: false,
            jobs_sent: 0,
        }
    }

    pub fn id(&self) -> GeneratorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send generated jobs to `station`
    pub fn set_queue_station(&mut self, station: StationId) {
        self.queue_station = Some(station);
    }

    pub fn queue_station(&self) -> Option<StationId> {
        self.queue_station
    }

    /// Reseed both arrival streams
    ///
    /// Count and spacing get separate streams derived from `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        if let ArrivalSchedule::Random { count, spacing } = &mut self.schedule {
            count.set_seed(derive_seed(seed, 0));
            spacing.set_seed(derive_seed(seed, 1));
        }
    }

    /// Arrival times computed by `initialize`
    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    pub fn jobs_sent(&self) -> usize {
        self.jobs_sent
    }

    /// Arrivals scheduled but not yet fired
    pub fn pending_arrivals(&self) -> usize {
        self.pending.len()
    }

    /// Compute the arrival schedule and register one event per arrival
    ///
    /// Returns the number of arrivals. May only be called once.
    pub fn initialize(&mut self, scheduler: &mut EventScheduler) -> Result<usize, GeneratorError> {
        if self.initialized {
            return Err(GeneratorError::AlreadyInitialized(self.name.clone()));
        }

        let times = match &mut self.schedule {
            ArrivalSchedule::Random { count, spacing } => {
                let arrivals = count.next_count();
                let mut current = 0.0;
                (0..arrivals)
                    .map(|_| {
                        current += spacing.next_variate();
                        current
                    })
                    .collect::<Vec<f64>>()
            }
            ArrivalSchedule::Trace(times) => times.clone(),
        };

        for &time in &times {
            scheduler.notify(EntityId::Generator(self.id), time, EventPayload::Arrival)?;
        }

        info!(generator = %self.name, jobs = times.len(), "arrival schedule created");
        self.pending = times.iter().copied().collect();
        self.arrival_times = times;
        self.initialized = true;
        Ok(self.arrival_times.len())
    }

    /// React to an arrival event at `time`
    ///
    /// Returns the new job and its destination, or `None` when there is no
    /// destination or nothing left to send.
    pub fn execute(&mut self, time: f64, ids: &mut JobSequence) -> Option<Arrival> {
        let destination = match self.queue_station {
            Some(station) if !self.pending.is_empty() => station,
            _ => {
                warn!(generator = %self.name, time, "no jobs to send");
                return None;
            }
        };

        self.pending.pop_front();
        self.jobs_sent += 1;
        Some(Arrival {
            job: Job::new(ids.next_id(), time),
            destination,
        })
    }
}
