//! Job model
//!
//! A job is the unit of work that flows through the queueing network.
//! Each job carries:
//! - A unique id
//! - The logical time it was created by a generator
//! - Arrival, service-start and completion times for its current station
//!   visit
//!
//! Timestamps are reset on every arrival, so at any station
//! `arrival <= start <= completion` holds once all three are set.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique job identifier within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job_{:06}", self.0)
    }
}

/// Errors raised when a timestamp would break the visit ordering
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JobError {
    #[error("{job} cannot start at {start} before arriving at {arrival:?}")]
    StartBeforeArrival {
        job: JobId,
        start: f64,
        arrival: Option<f64>,
    },

    #[error("{job} cannot complete at {completion} before starting at {start:?}")]
    CompletionBeforeStart {
        job: JobId,
        completion: f64,
        start: Option<f64>,
    },
}

/// A job travelling through the network
///
/// # Example
/// ```
/// use telco_simulator_core_rs::{Job, JobId};
///
/// let mut job = Job::new(JobId(1), 0.25);
/// job.stamp_arrival(0.25);
/// job.stamp_start(1.0).unwrap();
/// job.stamp_completion(3.0).unwrap();
/// assert_eq!(job.sojourn_time(), Some(2.75));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,

    /// Time the generator created the job
    created_at: f64,

    /// Arrival at the current station
    arrival_time: Option<f64>,

    /// Service start at the current station
    start_time: Option<f64>,

    /// Service completion at the current station
    completion_time: Option<f64>,

    /// Number of station arrivals so far, sinks included
    visits: u32,
}

impl Job {
    pub fn new(id: JobId, created_at: f64) -> Self {
        Self {
            id,
            created_at,
            arrival_time: None,
            start_time: None,
            completion_time: None,
            visits: 0,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    pub fn arrival_time(&self) -> Option<f64> {
        self.arrival_time
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.completion_time
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Record arrival at a new station, clearing the previous visit's
    /// service timestamps
    pub fn stamp_arrival(&mut self, time: f64) {
        self.arrival_time = Some(time);
        self.start_time = None;
        self.completion_time = None;
        self.visits += 1;
    }

    pub fn stamp_start(&mut self, time: f64) -> Result<(), JobError> {
        match self.arrival_time {
            Some(arrival) if arrival <= time => {
                self.start_time = Some(time);
                Ok(())
            }
            arrival => Err(JobError::StartBeforeArrival {
                job: self.id,
                start: time,
                arrival,
            }),
        }
    }

    pub fn stamp_completion(&mut self, time: f64) -> Result<(), JobError> {
        match self.start_time {
            Some(start) if start <= time => {
                self.completion_time = Some(time);
                Ok(())
            }
            start => Err(JobError::CompletionBeforeStart {
                job: self.id,
                completion: time,
                start,
            }),
        }
    }

    /// Time spent waiting in the current station's queue
    pub fn wait_time(&self) -> Option<f64> {
        Some(self.start_time? - self.arrival_time?)
    }

    /// Time from arrival to completion at the current station
    pub fn sojourn_time(&self) -> Option<f64> {
        Some(self.completion_time? - self.arrival_time?)
    }
}

/// Hands out job ids in creation order
#[derive(Debug, Clone, Default)]
pub struct JobSequence {
    next: u64,
}

impl JobSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> JobId {
        let id = JobId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}
