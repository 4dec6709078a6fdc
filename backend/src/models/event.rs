//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures every job state
//! change during a run. Events enable:
//! - Deterministic replay checks (two runs with one seed log the same events)
//! - Debugging (understand what happened and when)
//! - Analysis (queueing delays, routing frequencies)
//!
//! # Event Types
//!
//! - **Arrival**: Generator created a job and sent it into the network
//! - **GeneratorIdle**: Generator was triggered with nothing to send
//! - **Queued**: Job waits because every server is busy
//! - **ServiceStart**: Job occupied a server
//! - **ServiceComplete**: Job left its server
//! - **Routed**: Job was sent to a downstream station
//! - **SinkFinished**: Job was absorbed by a terminal station
//!
//! # Example
//!
//! ```rust
//! use telco_simulator_core_rs::models::{Event, EventLog, JobId};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Queued {
//!     time: 0.5,
//!     station: "Station_1".to_string(),
//!     job_id: JobId(2),
//!     queue_len: 1,
//! });
//!
//! assert_eq!(log.events_for_station("Station_1").len(), 1);
//! ```

use crate::models::job::JobId;
use serde::{Deserialize, Serialize};

/// Simulation event capturing a job state change.
///
/// Events are logged in dispatch order, so times never decrease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Arrival {
        time: f64,
        generator: String,
        job_id: JobId,
        station: String,
    },

    GeneratorIdle {
        time: f64,
        generator: String,
    },

    Queued {
        time: f64,
        station: String,
        job_id: JobId,
        /// Queue length after the job joined
        queue_len: usize,
    },

    ServiceStart {
        time: f64,
        station: String,
        job_id: JobId,
        server: usize,
        service_time: f64,
    },

    ServiceComplete {
        time: f64,
        station: String,
        job_id: JobId,
        server: usize,
    },

    Routed {
        time: f64,
        from: String,
        to: String,
        job_id: JobId,
        /// Uniform draw that selected the edge
        draw: f64,
    },

    SinkFinished {
        time: f64,
        station: String,
        job_id: JobId,
    },
}

impl Event {
    /// Logical time at which this event occurred
    pub fn time(&self) -> f64 {
        match self {
            Event::Arrival { time, .. }
            | Event::GeneratorIdle { time, .. }
            | Event::Queued { time, .. }
            | Event::ServiceStart { time, .. }
            | Event::ServiceComplete { time, .. }
            | Event::Routed { time, .. }
            | Event::SinkFinished { time, .. } => *time,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "Arrival",
            Event::GeneratorIdle { .. } => "GeneratorIdle",
            Event::Queued { .. } => "Queued",
            Event::ServiceStart { .. } => "ServiceStart",
            Event::ServiceComplete { .. } => "ServiceComplete",
            Event::Routed { .. } => "Routed",
            Event::SinkFinished { .. } => "SinkFinished",
        }
    }

    /// Get job ID if event relates to a specific job
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Event::Arrival { job_id, .. }
            | Event::Queued { job_id, .. }
            | Event::ServiceStart { job_id, .. }
            | Event::ServiceComplete { job_id, .. }
            | Event::Routed { job_id, .. }
            | Event::SinkFinished { job_id, .. } => Some(*job_id),
            Event::GeneratorIdle { .. } => None,
        }
    }

    /// Get the station this event happened at
    ///
    /// Arrivals report their destination, routings their origin.
    pub fn station(&self) -> Option<&str> {
        match self {
            Event::Arrival { station, .. }
            | Event::Queued { station, .. }
            | Event::ServiceStart { station, .. }
            | Event::ServiceComplete { station, .. }
            | Event::SinkFinished { station, .. } => Some(station),
            Event::Routed { from, .. } => Some(from),
            Event::GeneratorIdle { .. } => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific job
    pub fn events_for_job(&self, job_id: JobId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.job_id() == Some(job_id))
            .collect()
    }

    /// Get events for a specific station
    pub fn events_for_station(&self, station: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.station() == Some(station))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(time: f64, job: u64) -> Event {
        Event::ServiceStart {
            time,
            station: "Station_1".to_string(),
            job_id: JobId(job),
            server: 0,
            service_time: 2.0,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::Routed {
            time: 4.0,
            from: "Station_2".to_string(),
            to: "Transducer".to_string(),
            job_id: JobId(7),
            draw: 0.41,
        };

        assert_eq!(event.time(), 4.0);
        assert_eq!(event.event_type(), "Routed");
        assert_eq!(event.job_id(), Some(JobId(7)));
        assert_eq!(event.station(), Some("Station_2"));
    }

    #[test]
    fn test_generator_idle_has_no_job() {
        let event = Event::GeneratorIdle {
            time: 1.0,
            generator: "Gen_1".to_string(),
        };
        assert_eq!(event.job_id(), None);
        assert_eq!(event.station(), None);
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        log.log(start(0.0, 1));
        log.log(start(1.0, 2));
        log.log(Event::SinkFinished {
            time: 2.0,
            station: "Transducer".to_string(),
            job_id: JobId(1),
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_of_type("ServiceStart").len(), 2);
        assert_eq!(log.events_for_job(JobId(1)).len(), 2);
        assert_eq!(log.events_for_station("Transducer").len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
