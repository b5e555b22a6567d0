//! Simulated time for a single trial
//!
//! Time is a unit-less continuous duration (hours by convention) running from
//! 0 to the trial horizon. The clock only ever moves forward.

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};

/// Monotonic simulation clock bounded by a horizon
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new(100.0);
/// assert_eq!(clock.now(), 0.0);
///
/// clock.advance_to(12.5).unwrap();
/// assert_eq!(clock.now(), 12.5);
/// assert!(clock.advance_to(3.0).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulated time
    now: f64,
    /// End of the observation window
    horizon: f64,
}

impl SimClock {
    /// Create a clock at time 0
    pub fn new(horizon: f64) -> Self {
        Self { now: 0.0, horizon }
    }

    /// Move the clock to `time`
    ///
    /// # Errors
    /// `TimeWentBackwards` if `time` is earlier than the current time.
    pub fn advance_to(&mut self, time: f64) -> Result<(), SimulationError> {
        if time < self.now {
            return Err(SimulationError::TimeWentBackwards {
                current: self.now,
                requested: time,
            });
        }
        self.now = time;
        Ok(())
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Clip a scheduled time to the horizon
    pub fn clip(&self, time: f64) -> f64 {
        time.min(self.horizon)
    }

    /// Whether `time` falls inside the observation window
    pub fn within_horizon(&self, time: f64) -> bool {
        time <= self.horizon
    }
}
