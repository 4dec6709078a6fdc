//! Run results
//!
//! A [`SimulationReport`] is a read-only snapshot of the network after a
//! run: per-station finished jobs and occupancy peaks plus scheduler
//! totals. Console or file output is built from it by the caller.

use crate::models::{Job, JobId};
use crate::station::{QueueStation, StationKind};
use serde::{Deserialize, Serialize};

/// Timestamps of one finished station visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub created_at: f64,
    pub arrival_time: Option<f64>,
    pub start_time: Option<f64>,
    pub completion_time: Option<f64>,
}

impl From<&Job> for JobRecord {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id(),
            created_at: job.created_at(),
            arrival_time: job.arrival_time(),
            start_time: job.start_time(),
            completion_time: job.completion_time(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub name: String,
    pub is_sink: bool,
    pub servers: usize,
    pub jobs_completed: usize,
    pub busy_servers: usize,
    pub queue_len: usize,
    pub peak_busy_servers: usize,
    pub peak_queue_len: usize,
    pub finished_jobs: Vec<JobRecord>,
}

impl StationReport {
    /// Mean time from arrival to completion over finished jobs
    pub fn mean_sojourn_time(&self) -> Option<f64> {
        let sojourns: Vec<f64> = self
            .finished_jobs
            .iter()
            .filter_map(|r| Some(r.completion_time? - r.arrival_time?))
            .collect();
        if sojourns.is_empty() {
            return None;
        }
        Some(sojourns.iter().sum::<f64>() / sojourns.len() as f64)
    }

    /// Completion times in the order jobs finished
    pub fn completion_times(&self) -> Vec<f64> {
        self.finished_jobs
            .iter()
            .filter_map(|r| r.completion_time)
            .collect()
    }
}

impl From<&QueueStation> for StationReport {
    fn from(station: &QueueStation) -> Self {
        Self {
            name: station.name().to_string(),
            is_sink: matches!(station.kind(), StationKind::Sink),
            servers: station.capacity(),
            jobs_completed: station.jobs_completed(),
            busy_servers: station.busy_servers(),
            queue_len: station.queue_len(),
            peak_busy_servers: station.peak_busy_servers(),
            peak_queue_len: station.peak_queue_len(),
            finished_jobs: station.finished_jobs().iter().map(JobRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Seed actually used, also when none was configured
    pub seed: u64,
    pub end_time: f64,
    /// Time of the last dispatched event
    pub final_time: f64,
    pub events_processed: usize,
    /// Events left in the queue beyond the end time
    pub events_pending: usize,
    pub jobs_created: u64,
    pub stations: Vec<StationReport>,
}

impl SimulationReport {
    pub fn station(&self, name: &str) -> Option<&StationReport> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// Jobs that reached a sink
    pub fn jobs_absorbed(&self) -> usize {
        self.stations
            .iter()
            .filter(|s| s.is_sink)
            .map(|s| s.jobs_completed)
            .sum()
    }
}
