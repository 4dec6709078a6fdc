//! Scheduled simulation event types
//!
//! A [`SimEvent`] pairs the entity that must react with the absolute time
//! it reacts at and what it reacts to. Completion events carry the job and
//! server slot they belong to, so a station never has to rediscover which
//! job finished by comparing timestamps.

use crate::models::JobId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Index of a generator inside one network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorId(pub usize);

/// Index of a station inside one network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationId(pub usize);

/// Schedulable entity that owns an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Generator(GeneratorId),
    Station(StationId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Generator(id) => write!(f, "generator#{}", id.0),
            EntityId::Station(id) => write!(f, "station#{}", id.0),
        }
    }
}

/// What the target entity should do when the event fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Generator emits its next job
    Arrival,

    /// A job finishes service on a station's server
    Completion { job: JobId, server: usize },
}

/// Insertion sequence number; breaks ties between simultaneous events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// An event held by the scheduler, always at an absolute time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    id: EventId,
    target: EntityId,
    time: f64,
    payload: EventPayload,
}

impl SimEvent {
    pub(crate) fn new(id: EventId, target: EntityId, time: f64, payload: EventPayload) -> Self {
        Self {
            id,
            target,
            time,
            payload,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn payload(&self) -> EventPayload {
        self.payload
    }
}

// Ordering is by time, then by insertion order. Identity never takes part.
impl Ord for SimEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for SimEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SimEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimEvent {}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u64, time: f64) -> SimEvent {
        SimEvent::new(
            EventId(id),
            EntityId::Station(StationId(0)),
            time,
            EventPayload::Arrival,
        )
    }

    #[test]
    fn test_orders_by_time_first() {
        assert!(event(5, 1.0) < event(1, 2.0));
    }

    #[test]
    fn test_ties_break_by_insertion() {
        assert!(event(1, 3.0) < event(2, 3.0));
        assert_eq!(event(4, 3.0), event(4, 3.0));
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(EntityId::Generator(GeneratorId(2)).to_string(), "generator#2");
        assert_eq!(EntityId::Station(StationId(0)).to_string(), "station#0");
    }
}
