//! Queue stations: multi-server FIFO queues and terminal sinks
//!
//! A processing station admits jobs into an unbounded FIFO queue and serves
//! them on up to `servers` servers at once. Each service start samples the
//! station's service-time variate and schedules a completion event that
//! carries the job's id and server slot. On completion the job is routed to
//! a downstream station by weighted random draw.
//!
//! A sink absorbs jobs immediately: arrival, start and completion are all
//! stamped with the current time and the job stays in its finished list.
//!
//! # Job lifecycle
//!
//! ```text
//! add_job ──▶ Queued ──server free──▶ Active ──completion──▶ Routed ──▶ next station
//!                                                   └── (sink) ──▶ Finished
//! ```

pub mod routing;

pub use routing::{OutputEdge, RoutingError, RoutingTable, ROUTING_TOLERANCE};

use crate::events::{EntityId, EventPayload, EventScheduler, SchedulerError, StationId};
use crate::models::{Event, EventLog, Job, JobError, JobId};
use crate::variates::VariateGenerator;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Errors raised by station operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StationError {
    #[error("Station {station} needs at least one server; use a sink for zero capacity")]
    InvalidCapacity { station: String },

    #[error("Operation '{operation}' is not supported on sink station {station}")]
    UnsupportedOnSink {
        station: String,
        operation: &'static str,
    },

    #[error("Station {station} has no active {job} on server {server} at time {time}")]
    UnknownCompletion {
        station: String,
        job: JobId,
        server: usize,
        time: f64,
    },

    #[error("Station {station} finished a job at time {time} but has no output stations")]
    NoOutputStations { station: String, time: f64 },

    #[error("Routing failed at station {station}, time {time}: {source}")]
    Routing {
        station: String,
        time: f64,
        #[source]
        source: RoutingError,
    },

    #[error("Station {station} has invalid routing: {source}")]
    InvalidRouting {
        station: String,
        #[source]
        source: RoutingError,
    },

    #[error("Station {station} cannot register an edge: {source}")]
    InvalidEdge {
        station: String,
        #[source]
        source: RoutingError,
    },

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Distinguishes serving stations from terminal sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationKind {
    Processing { servers: usize },
    Sink,
}

/// A job occupying a server
#[derive(Debug, Clone)]
struct ActiveJob {
    job: Job,
    server: usize,
    /// Absolute time of the scheduled completion event
    completes_at: f64,
}

/// Job leaving a processing station for its next station
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub job: Job,
    pub destination: StationId,
    /// Uniform draw that selected the destination
    pub draw: f64,
}

/// A multi-server queue or a sink
///
/// # Example
///
/// ```
/// use telco_simulator_core_rs::events::{EventScheduler, StationId};
/// use telco_simulator_core_rs::models::{EventLog, Job, JobId};
/// use telco_simulator_core_rs::station::QueueStation;
/// use telco_simulator_core_rs::variates::ConstantVariate;
///
/// let mut scheduler = EventScheduler::new(10.0).unwrap();
/// let mut log = EventLog::new();
/// let mut station = QueueStation::processing(
///     StationId(0),
///     "Station_1",
///     1,
///     Box::new(ConstantVariate::new(2.0).unwrap()),
/// )
/// .unwrap();
///
/// station.add_job(Job::new(JobId(0), 0.0), 0.0, &mut scheduler, &mut log).unwrap();
/// assert_eq!(station.busy_servers(), 1);
/// assert_eq!(scheduler.pending(), 1);
/// ```
#[derive(Debug)]
pub struct QueueStation {
    id: StationId,
    name: String,
    kind: StationKind,
    wait_queue: VecDeque<Job>,
    active: Vec<ActiveJob>,
    routing: RoutingTable,
    service_time: Option<Box<dyn VariateGenerator>>,
    finished: Vec<Job>,
    peak_busy: usize,
    peak_queue: usize,
}

impl QueueStation {
    /// Create a serving station with `servers` parallel servers
    pub fn processing(
        id: StationId,
        name: impl Into<String>,
        servers: usize,
        service_time: Box<dyn VariateGenerator>,
    ) -> Result<Self, StationError> {
        let name = name.into();
        if servers == 0 {
            return Err(StationError::InvalidCapacity { station: name });
        }
        Ok(Self::build(
            id,
            name,
            StationKind::Processing { servers },
            Some(service_time),
        ))
    }

    /// Create a terminal station that absorbs every job it receives
    pub fn sink(id: StationId, name: impl Into<String>) -> Self {
        Self::build(id, name.into(), StationKind::Sink, None)
    }

    fn build(
        id: StationId,
        name: String,
        kind: StationKind,
        service_time: Option<Box<dyn VariateGenerator>>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            wait_queue: VecDeque::new(),
            active: Vec::new(),
            routing: RoutingTable::new(),
            service_time,
            finished: Vec::new(),
            peak_busy: 0,
            peak_queue: 0,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StationKind {
        self.kind
    }

    pub fn is_sink(&self) -> bool {
        self.kind == StationKind::Sink
    }

    /// Server capacity; zero for a sink
    pub fn capacity(&self) -> usize {
        match self.kind {
            StationKind::Processing { servers } => servers,
            StationKind::Sink => 0,
        }
    }

    pub fn busy_servers(&self) -> usize {
        self.active.len()
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn peak_busy_servers(&self) -> usize {
        self.peak_busy
    }

    pub fn peak_queue_len(&self) -> usize {
        self.peak_queue
    }

    /// Jobs this station has finished, in completion order
    ///
    /// For a processing station these are snapshots taken when service
    /// ended; the job itself moved on downstream.
    pub fn finished_jobs(&self) -> &[Job] {
        &self.finished
    }

    pub fn jobs_completed(&self) -> usize {
        self.finished.len()
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Reseed the service-time stream; sinks have none
    pub fn set_seed(&mut self, seed: u64) {
        if let Some(service) = self.service_time.as_mut() {
            service.set_seed(seed);
        }
    }

    /// Register a routing edge to `station`
    pub fn add_output_station(
        &mut self,
        station: StationId,
        probability: f64,
    ) -> Result<(), StationError> {
        if self.is_sink() {
            return Err(self.unsupported("add_output_station"));
        }
        self.routing
            .add(station, probability)
            .map_err(|source| StationError::InvalidEdge {
                station: self.name.clone(),
                source,
            })
    }

    /// Check the routing edges sum to 1.0
    ///
    /// Runs automatically on the first routing; call it earlier to surface
    /// a bad topology before the run starts.
    pub fn validate_routing(&mut self) -> Result<(), StationError> {
        if self.is_sink() {
            return Ok(());
        }
        self.routing
            .validate()
            .map_err(|source| StationError::InvalidRouting {
                station: self.name.clone(),
                source,
            })
    }

    /// Admit a job at `time`
    ///
    /// A processing station queues the job and starts it at once if a
    /// server is free. A sink finishes it on the spot.
    pub fn add_job(
        &mut self,
        mut job: Job,
        time: f64,
        scheduler: &mut EventScheduler,
        log: &mut EventLog,
    ) -> Result<(), StationError> {
        job.stamp_arrival(time);

        if self.is_sink() {
            job.stamp_start(time)?;
            job.stamp_completion(time)?;
            debug!(station = %self.name, job = %job.id(), time, "sink absorbed job");
            log.log(Event::SinkFinished {
                time,
                station: self.name.clone(),
                job_id: job.id(),
            });
            self.finished.push(job);
            return Ok(());
        }

        let job_id = job.id();
        self.wait_queue.push_back(job);
        if self.active.len() < self.capacity() {
            self.start_next_job(time, scheduler, log)?;
        } else {
            self.peak_queue = self.peak_queue.max(self.wait_queue.len());
            debug!(
                station = %self.name,
                job = %job_id,
                time,
                queue_len = self.wait_queue.len(),
                "all servers busy, job queued"
            );
            log.log(Event::Queued {
                time,
                station: self.name.clone(),
                job_id,
                queue_len: self.wait_queue.len(),
            });
        }
        Ok(())
    }

    /// Handle the completion of `job` on `server` at `time`
    ///
    /// Picks the downstream station with `routing_draw`, then frees the
    /// server, records the finished job and starts the next queued job.
    /// The `(job, server, time)` triple must match a scheduled completion.
    /// On error the station is left unchanged. The returned dispatch must
    /// be delivered to its destination.
    pub fn execute(
        &mut self,
        job: JobId,
        server: usize,
        time: f64,
        scheduler: &mut EventScheduler,
        log: &mut EventLog,
        routing_draw: &mut dyn VariateGenerator,
    ) -> Result<Dispatch, StationError> {
        if self.is_sink() {
            return Err(self.unsupported("execute"));
        }

        let index = self
            .active
            .iter()
            .position(|active| {
                active.job.id() == job && active.server == server && active.completes_at == time
            })
            .ok_or_else(|| StationError::UnknownCompletion {
                station: self.name.clone(),
                job,
                server,
                time,
            })?;
        let mut finished = self.active[index].job.clone();
        finished.stamp_completion(time)?;

        let draw = routing_draw.next_variate();
        let destination = self.select_output_station(draw, time)?;

        self.active.swap_remove(index);
        log.log(Event::ServiceComplete {
            time,
            station: self.name.clone(),
            job_id: job,
            server,
        });
        self.finished.push(finished.clone());
        debug!(
            station = %self.name,
            job = %job,
            time,
            draw,
            destination = destination.0,
            "job completed and routed"
        );

        self.start_next_job(time, scheduler, log)?;

        Ok(Dispatch {
            job: finished,
            destination,
            draw,
        })
    }

    /// Choose the downstream station for a uniform draw in `[0, 1)`
    pub fn select_output_station(&mut self, draw: f64, time: f64) -> Result<StationId, StationError> {
        if self.routing.is_empty() {
            return Err(StationError::NoOutputStations {
                station: self.name.clone(),
                time,
            });
        }
        let routing_failed = |station: &str, source| StationError::Routing {
            station: station.to_string(),
            time,
            source,
        };
        self.routing
            .validate()
            .map_err(|source| routing_failed(&self.name, source))?;
        self.routing
            .select(draw)
            .map_err(|source| routing_failed(&self.name, source))
    }

    /// Move the head of the wait queue onto a free server
    fn start_next_job(
        &mut self,
        time: f64,
        scheduler: &mut EventScheduler,
        log: &mut EventLog,
    ) -> Result<(), StationError> {
        let Some(server) = self.free_server() else {
            return Ok(());
        };
        let Some(mut job) = self.wait_queue.pop_front() else {
            return Ok(());
        };
        let Some(service) = self.service_time.as_mut() else {
            return Err(self.unsupported("start_next_job"));
        };

        job.stamp_start(time)?;
        let service_time = service.next_variate();
        let completes_at = scheduler.now() + service_time;
        let job_id = job.id();
        scheduler.notify(
            EntityId::Station(self.id),
            service_time,
            EventPayload::Completion {
                job: job_id,
                server,
            },
        )?;

        self.active.push(ActiveJob {
            job,
            server,
            completes_at,
        });
        self.peak_busy = self.peak_busy.max(self.active.len());
        debug_assert!(self.active.len() <= self.capacity());

        debug!(
            station = %self.name,
            job = %job_id,
            time,
            service_time,
            busy = self.active.len(),
            servers = self.capacity(),
            "started job"
        );
        log.log(Event::ServiceStart {
            time,
            station: self.name.clone(),
            job_id,
            server,
            service_time,
        });
        Ok(())
    }

    /// Lowest-numbered idle server, if any
    fn free_server(&self) -> Option<usize> {
        (0..self.capacity()).find(|slot| self.active.iter().all(|active| active.server != *slot))
    }

    fn unsupported(&self, operation: &'static str) -> StationError {
        StationError::UnsupportedOnSink {
            station: self.name.clone(),
            operation,
        }
    }
}
