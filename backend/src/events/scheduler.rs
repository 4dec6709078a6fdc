//! Event scheduler: the simulation's event queue and clock
//!
//! # Architecture
//!
//! ```text
//! entities ──notify(delta)──▶ EventScheduler ──pop min time──▶ EventHandler::dispatch
//!     ▲                                                              │
//!     └──────────────────── notify(delta) during dispatch ───────────┘
//! ```
//!
//! The scheduler is an explicit instance owned by the caller. Entities
//! receive `&mut EventScheduler` while they run and schedule through it;
//! there is no process-wide state, so independent runs can coexist.
//!
//! Events at equal times are dispatched in insertion order. The end time
//! is a hard cutoff: an event later than it is never dispatched.

use crate::core::time::{ClockError, SimClock};
use crate::events::types::{EntityId, EventId, EventPayload, SimEvent};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the scheduler
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("Event for {target} at delta {delta} would occur in the past")]
    EventInPast { target: EntityId, delta: f64 },

    #[error("Event for {target} has non-finite time {time}")]
    InvalidEventTime { target: EntityId, time: f64 },
}

/// Receives each event the scheduler pops
///
/// The handler gets the scheduler back so the entity it dispatches to can
/// schedule follow-up events.
pub trait EventHandler {
    type Error: From<SchedulerError>;

    fn dispatch(
        &mut self,
        event: SimEvent,
        scheduler: &mut EventScheduler,
    ) -> Result<(), Self::Error>;
}

/// Time-ordered event queue plus the simulation clock
///
/// # Example
/// ```
/// use telco_simulator_core_rs::events::{
///     EntityId, EventHandler, EventPayload, EventScheduler, SchedulerError, SimEvent, StationId,
/// };
///
/// struct Recorder(Vec<f64>);
///
/// impl EventHandler for Recorder {
///     type Error = SchedulerError;
///
///     fn dispatch(&mut self, event: SimEvent, _: &mut EventScheduler) -> Result<(), SchedulerError> {
///         self.0.push(event.time());
///         Ok(())
///     }
/// }
///
/// let mut scheduler = EventScheduler::new(10.0).unwrap();
/// let target = EntityId::Station(StationId(0));
/// scheduler.notify(target, 3.0, EventPayload::Arrival).unwrap();
/// scheduler.notify(target, 1.0, EventPayload::Arrival).unwrap();
///
/// let mut recorder = Recorder(Vec::new());
/// scheduler.simulate(&mut recorder).unwrap();
/// assert_eq!(recorder.0, vec![1.0, 3.0]);
/// ```
#[derive(Debug)]
pub struct EventScheduler {
    clock: SimClock,
    queue: BinaryHeap<Reverse<SimEvent>>,
    next_event_id: u64,
    processed: usize,
}

impl EventScheduler {
    /// Create a scheduler at time zero that stops after `end_time`
    pub fn new(end_time: f64) -> Result<Self, SchedulerError> {
        Ok(Self {
            clock: SimClock::new(end_time)?,
            queue: BinaryHeap::new(),
            next_event_id: 0,
            processed: 0,
        })
    }

    /// Schedule an event `delta` time units after the current time
    pub fn notify(
        &mut self,
        target: EntityId,
        delta: f64,
        payload: EventPayload,
    ) -> Result<EventId, SchedulerError> {
        if delta.is_nan() {
            return Err(SchedulerError::InvalidEventTime {
                target,
                time: delta,
            });
        }
        if delta < 0.0 {
            return Err(SchedulerError::EventInPast { target, delta });
        }
        self.schedule_at(target, self.clock.now() + delta, payload)
    }

    /// Schedule an event at an absolute time, which must not precede now
    pub fn schedule_at(
        &mut self,
        target: EntityId,
        time: f64,
        payload: EventPayload,
    ) -> Result<EventId, SchedulerError> {
        if !time.is_finite() {
            return Err(SchedulerError::InvalidEventTime { target, time });
        }
        if time < self.clock.now() {
            return Err(SchedulerError::EventInPast {
                target,
                delta: time - self.clock.now(),
            });
        }

        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        self.queue
            .push(Reverse(SimEvent::new(id, target, time, payload)));

        debug!(
            entity = %target,
            time,
            queued = self.queue.len(),
            "event scheduled"
        );
        Ok(id)
    }

    /// Pop the next event if it lies within the end time, advancing the
    /// clock to it
    pub fn next_event(&mut self) -> Result<Option<SimEvent>, SchedulerError> {
        let due = match self.queue.peek() {
            Some(Reverse(event)) => !self.clock.is_past_end(event.time()),
            None => false,
        };
        if !due {
            return Ok(None);
        }

        match self.queue.pop() {
            Some(Reverse(event)) => {
                self.clock.advance_to(event.time())?;
                self.processed += 1;
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    /// Run the main loop until the queue drains or the end time is reached
    ///
    /// Returns the number of events dispatched by this call. The first
    /// handler error aborts the run.
    pub fn simulate<H: EventHandler>(&mut self, handler: &mut H) -> Result<usize, H::Error> {
        let start = self.processed;
        info!(
            now = self.clock.now(),
            end_time = self.clock.end_time(),
            pending = self.queue.len(),
            "simulation starting"
        );

        while let Some(event) = self.next_event()? {
            debug!(
                time = event.time(),
                entity = %event.target(),
                "dispatching event"
            );
            handler.dispatch(event, self)?;
        }

        info!(
            last_event_time = self.clock.now(),
            dispatched = self.processed - start,
            undispatched = self.queue.len(),
            "simulation finished"
        );
        Ok(self.processed - start)
    }

    /// Current simulation time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn end_time(&self) -> f64 {
        self.clock.end_time()
    }

    /// Events still waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events dispatched so far
    pub fn processed(&self) -> usize {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::StationId;

    const TARGET: EntityId = EntityId::Station(StationId(0));

    #[test]
    fn test_rejects_negative_delta() {
        let mut scheduler = EventScheduler::new(5.0).unwrap();
        assert_eq!(
            scheduler.notify(TARGET, -0.1, EventPayload::Arrival),
            Err(SchedulerError::EventInPast {
                target: TARGET,
                delta: -0.1
            })
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_rejects_infinite_time() {
        let mut scheduler = EventScheduler::new(5.0).unwrap();
        assert!(matches!(
            scheduler.notify(TARGET, f64::INFINITY, EventPayload::Arrival),
            Err(SchedulerError::InvalidEventTime { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_end_time() {
        assert!(matches!(
            EventScheduler::new(f64::NAN),
            Err(SchedulerError::Clock(ClockError::InvalidEndTime(_)))
        ));
    }

    #[test]
    fn test_next_event_advances_clock() {
        let mut scheduler = EventScheduler::new(5.0).unwrap();
        scheduler.notify(TARGET, 2.0, EventPayload::Arrival).unwrap();

        let event = scheduler.next_event().unwrap().unwrap();
        assert_eq!(event.time(), 2.0);
        assert_eq!(scheduler.now(), 2.0);
        assert_eq!(scheduler.processed(), 1);
    }

    #[test]
    fn test_delta_is_relative_to_now() {
        let mut scheduler = EventScheduler::new(10.0).unwrap();
        scheduler.notify(TARGET, 2.0, EventPayload::Arrival).unwrap();
        scheduler.next_event().unwrap();

        scheduler.notify(TARGET, 1.5, EventPayload::Arrival).unwrap();
        let event = scheduler.next_event().unwrap().unwrap();
        assert_eq!(event.time(), 3.5);
    }

    #[test]
    fn test_event_beyond_end_time_stays_queued() {
        let mut scheduler = EventScheduler::new(1.0).unwrap();
        scheduler.notify(TARGET, 1.0, EventPayload::Arrival).unwrap();
        scheduler.notify(TARGET, 1.5, EventPayload::Arrival).unwrap();

        assert!(scheduler.next_event().unwrap().is_some());
        assert!(scheduler.next_event().unwrap().is_none());
        assert_eq!(scheduler.now(), 1.0);
        assert_eq!(scheduler.pending(), 1);
    }
}
