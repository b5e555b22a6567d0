//! Error and warning types shared by the simulation core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a trial or a configuration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// A numeric parameter is out of its valid domain
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The configuration as a whole cannot be simulated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `pop_min` was called on an empty event queue
    #[error("Event queue is empty")]
    EmptyQueue,

    /// A value could not be serialized (fingerprints, reports)
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An event was scheduled before the current simulated time
    #[error("Time went backwards: current {current}, event at {requested}")]
    TimeWentBackwards { current: f64, requested: f64 },
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidParameter`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal findings surfaced to the caller alongside results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationWarning {
    /// Redundancy level outside {0, 1, 5, 6}; the no-redundancy rule was used
    UnrecognizedRedundancyLevel { level: u8 },
}

impl std::fmt::Display for SimulationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationWarning::UnrecognizedRedundancyLevel { level } => write!(
                f,
                "unrecognized redundancy level {}, falling back to no redundancy",
                level
            ),
        }
    }
}

/// Reject NaN, infinities and values `<= 0`.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must be a finite value > 0, got {}", value),
        ))
    }
}

/// Reject NaN, infinities and negative values.
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must be a finite value >= 0, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("shape", 1.5), Ok(1.5));
        assert!(require_positive("shape", 0.0).is_err());
        assert!(require_positive("shape", -1.0).is_err());
        assert!(require_positive("shape", f64::NAN).is_err());
        assert!(require_positive("shape", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_display_names_parameter() {
        let err = require_positive("scale", 0.0).unwrap_err();
        assert!(err.to_string().contains("scale"));
    }
}
