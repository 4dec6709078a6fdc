//! Tests for EventScheduler: ordering, tie-breaking, cutoff and error
//! propagation

use proptest::prelude::*;
use telco_simulator_core_rs::events::{
    EntityId, EventHandler, EventPayload, EventScheduler, GeneratorId, SchedulerError, SimEvent,
    StationId,
};

const STATION: EntityId = EntityId::Station(StationId(0));

/// Records dispatched events and optionally schedules follow-ups
struct Recorder {
    seen: Vec<(f64, EntityId)>,
    follow_ups: Vec<f64>,
}

impl Recorder {
    fn new(follow_ups: Vec<f64>) -> Self {
        Self {
            seen: Vec::new(),
            follow_ups,
        }
    }

    fn times(&self) -> Vec<f64> {
        self.seen.iter().map(|(t, _)| *t).collect()
    }
}

impl EventHandler for Recorder {
    type Error = SchedulerError;

    fn dispatch(
        &mut self,
        event: SimEvent,
        scheduler: &mut EventScheduler,
    ) -> Result<(), SchedulerError> {
        assert_eq!(scheduler.now(), event.time());
        self.seen.push((event.time(), event.target()));
        if let Some(delta) = self.follow_ups.pop() {
            scheduler.notify(event.target(), delta, EventPayload::Arrival)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
struct Boom(f64);

impl From<SchedulerError> for Boom {
    fn from(_: SchedulerError) -> Self {
        Boom(f64::NAN)
    }
}

struct FailsAt(f64);

impl EventHandler for FailsAt {
    type Error = Boom;

    fn dispatch(&mut self, event: SimEvent, _: &mut EventScheduler) -> Result<(), Boom> {
        if event.time() >= self.0 {
            return Err(Boom(event.time()));
        }
        Ok(())
    }
}

#[test]
fn test_events_dispatched_in_time_order() {
    let mut scheduler = EventScheduler::new(100.0).unwrap();
    for delta in [5.0, 1.0, 3.0, 2.0, 4.0] {
        scheduler.notify(STATION, delta, EventPayload::Arrival).unwrap();
    }

    let mut recorder = Recorder::new(Vec::new());
    let dispatched = scheduler.simulate(&mut recorder).unwrap();

    assert_eq!(dispatched, 5);
    assert_eq!(recorder.times(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(scheduler.now(), 5.0);
}

#[test]
fn test_simultaneous_events_keep_insertion_order() {
    let mut scheduler = EventScheduler::new(10.0).unwrap();
    let targets = [
        EntityId::Station(StationId(2)),
        EntityId::Generator(GeneratorId(0)),
        EntityId::Station(StationId(1)),
    ];
    for target in targets {
        scheduler.notify(target, 1.0, EventPayload::Arrival).unwrap();
    }

    let mut recorder = Recorder::new(Vec::new());
    scheduler.simulate(&mut recorder).unwrap();

    let order: Vec<EntityId> = recorder.seen.iter().map(|(_, target)| *target).collect();
    assert_eq!(order, targets.to_vec());
}

#[test]
fn test_end_time_is_hard_cutoff() {
    let mut scheduler = EventScheduler::new(3.0).unwrap();
    for delta in [1.0, 3.0, 3.5, 10.0] {
        scheduler.notify(STATION, delta, EventPayload::Arrival).unwrap();
    }

    let mut recorder = Recorder::new(Vec::new());
    scheduler.simulate(&mut recorder).unwrap();

    assert_eq!(recorder.times(), vec![1.0, 3.0]);
    assert_eq!(scheduler.pending(), 2);
    assert_eq!(scheduler.now(), 3.0);
}

#[test]
fn test_empty_queue_returns_immediately() {
    let mut scheduler = EventScheduler::new(3.0).unwrap();
    let mut recorder = Recorder::new(Vec::new());
    assert_eq!(scheduler.simulate(&mut recorder).unwrap(), 0);
    assert_eq!(scheduler.now(), 0.0);
}

#[test]
fn test_follow_up_events_are_relative_to_dispatch_time() {
    let mut scheduler = EventScheduler::new(10.0).unwrap();
    scheduler.notify(STATION, 2.0, EventPayload::Arrival).unwrap();

    // popped from the back: +0.5 first, then +1.0
    let mut recorder = Recorder::new(vec![1.0, 0.5]);
    scheduler.simulate(&mut recorder).unwrap();

    assert_eq!(recorder.times(), vec![2.0, 2.5, 3.5]);
}

#[test]
fn test_handler_error_aborts_run() {
    let mut scheduler = EventScheduler::new(10.0).unwrap();
    for delta in [1.0, 2.0, 3.0] {
        scheduler.notify(STATION, delta, EventPayload::Arrival).unwrap();
    }

    let result = scheduler.simulate(&mut FailsAt(2.0));
    assert_eq!(result, Err(Boom(2.0)));
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn test_schedule_at_in_past_rejected() {
    let mut scheduler = EventScheduler::new(10.0).unwrap();
    scheduler.notify(STATION, 4.0, EventPayload::Arrival).unwrap();
    scheduler.next_event().unwrap();

    assert!(matches!(
        scheduler.schedule_at(STATION, 3.0, EventPayload::Arrival),
        Err(SchedulerError::EventInPast { .. })
    ));
    assert!(scheduler.schedule_at(STATION, 4.0, EventPayload::Arrival).is_ok());
}

#[test]
fn test_independent_schedulers_do_not_interfere() {
    let mut a = EventScheduler::new(10.0).unwrap();
    let mut b = EventScheduler::new(10.0).unwrap();
    a.notify(STATION, 1.0, EventPayload::Arrival).unwrap();

    assert_eq!(a.pending(), 1);
    assert_eq!(b.pending(), 0);

    let mut recorder = Recorder::new(Vec::new());
    b.simulate(&mut recorder).unwrap();
    assert!(recorder.seen.is_empty());
}

proptest! {
    #[test]
    fn prop_clock_never_decreases(
        initial in prop::collection::vec(0.0f64..50.0, 0..40),
        follow_ups in prop::collection::vec(0.0f64..20.0, 0..40),
        end_time in 0.0f64..100.0,
    ) {
        let mut scheduler = EventScheduler::new(end_time).unwrap();
        for delta in &initial {
            scheduler.notify(STATION, *delta, EventPayload::Arrival).unwrap();
        }

        let mut recorder = Recorder::new(follow_ups);
        scheduler.simulate(&mut recorder).unwrap();

        let times = recorder.times();
        for pair in times.windows(2) {
            prop_assert!(pair[0] <= pair[1], "clock went from {} to {}", pair[0], pair[1]);
        }
        for t in &times {
            prop_assert!(*t <= end_time);
        }
    }
}
