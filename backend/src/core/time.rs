//! Logical time management for the simulation
//!
//! Simulation time is a non-negative real that only moves forward. It is
//! logical, not wall-clock: the scheduler jumps the clock straight to the
//! next event.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by clock manipulation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    #[error("Clock cannot move backwards from {now} to {requested}")]
    Backwards { now: f64, requested: f64 },

    #[error("End time must be finite and non-negative, got {0}")]
    InvalidEndTime(f64),
}

/// Simulation clock with a hard end time
///
/// # Example
/// ```
/// use telco_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new(10.0).unwrap();
/// assert_eq!(clock.now(), 0.0);
///
/// clock.advance_to(2.5).unwrap();
/// assert_eq!(clock.now(), 2.5);
/// assert!(clock.advance_to(1.0).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Current logical time
    now: f64,
    /// Last time at which events may still execute
    end_time: f64,
}

impl SimClock {
    /// Create a clock at time zero
    ///
    /// # Arguments
    /// * `end_time` - Hard cutoff; events after it never execute
    pub fn new(end_time: f64) -> Result<Self, ClockError> {
        if !end_time.is_finite() || end_time < 0.0 {
            return Err(ClockError::InvalidEndTime(end_time));
        }
        Ok(Self { now: 0.0, end_time })
    }

    /// Move the clock forward to `time`
    ///
    /// Advancing to the current time is allowed (simultaneous events).
    pub fn advance_to(&mut self, time: f64) -> Result<(), ClockError> {
        if time < self.now || time.is_nan() {
            return Err(ClockError::Backwards {
                now: self.now,
                requested: time,
            });
        }
        self.now = time;
        Ok(())
    }

    /// Current logical time
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Whether an event at `time` falls beyond the cutoff
    pub fn is_past_end(&self, time: f64) -> bool {
        time > self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_end_time_rejected() {
        assert_eq!(
            SimClock::new(-1.0).unwrap_err(),
            ClockError::InvalidEndTime(-1.0)
        );
    }

    #[test]
    fn test_nan_advance_rejected() {
        let mut clock = SimClock::new(5.0).unwrap();
        assert!(clock.advance_to(f64::NAN).is_err());
        assert_eq!(clock.now(), 0.0);
    }
}
