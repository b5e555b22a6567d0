//! Random variate generation for failure and repair durations.
//!
//! All draws go through a [`VariateSource`], which owns the trial's private
//! [`RngManager`] stream. Sampling is deterministic: the same seed and the
//! same sequence of requests yield the same durations.
//!
//! # Example
//!
//! ```
//! use reliability_simulator_core_rs::distributions::{VariateSource, WeibullLifetime};
//!
//! let mut source = VariateSource::new(42);
//! let lifetime = WeibullLifetime::new(1.5, 50.0).unwrap();
//! let hours = lifetime.sample(&mut source);
//! assert!(hours >= 0.0);
//! ```

use crate::error::{require_non_negative, require_positive, SimulationError};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Weibull(shape, scale) lifetime distribution governing time-to-failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullLifetime {
    /// Shape parameter `k` (k < 1 infant mortality, k > 1 wear-out)
    pub shape: f64,
    /// Scale parameter `λ` in hours
    pub scale: f64,
}

impl WeibullLifetime {
    /// Create a validated lifetime distribution
    ///
    /// # Errors
    /// `InvalidParameter` if shape or scale is not a finite value > 0.
    pub fn new(shape: f64, scale: f64) -> Result<Self, SimulationError> {
        let lifetime = Self { shape, scale };
        lifetime.validate()?;
        Ok(lifetime)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        require_positive("shape", self.shape)?;
        require_positive("scale", self.scale)?;
        Ok(())
    }

    /// Draw one time-to-failure. Parameters must already be validated.
    pub fn sample(&self, source: &mut VariateSource) -> f64 {
        source.weibull_unchecked(self.shape, self.scale)
    }
}

/// How long a failed component takes to come back.
///
/// The historical tooling disagreed here (a fixed 2h constant for disk-only
/// runs, 1.5–2.5h uniform for server+disk runs), so every component carries
/// its own model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RepairModel {
    /// Constant repair time
    Fixed { hours: f64 },

    /// Uniform repair time in `[min_hours, max_hours)`
    Uniform { min_hours: f64, max_hours: f64 },

    /// Weibull-distributed repair time
    Weibull { shape: f64, scale: f64 },

    /// Exponentially distributed repair time with the given mean
    Exponential { mean_hours: f64 },
}

impl Default for RepairModel {
    fn default() -> Self {
        RepairModel::Fixed { hours: 2.0 }
    }
}

impl RepairModel {
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            RepairModel::Fixed { hours } => {
                require_non_negative("repair.hours", hours)?;
            }
            RepairModel::Uniform {
                min_hours,
                max_hours,
            } => {
                require_non_negative("repair.min_hours", min_hours)?;
                require_non_negative("repair.max_hours", max_hours)?;
                if min_hours > max_hours {
                    return Err(SimulationError::invalid(
                        "repair.min_hours",
                        format!("{} exceeds max_hours {}", min_hours, max_hours),
                    ));
                }
            }
            RepairModel::Weibull { shape, scale } => {
                require_positive("repair.shape", shape)?;
                require_positive("repair.scale", scale)?;
            }
            RepairModel::Exponential { mean_hours } => {
                require_positive("repair.mean_hours", mean_hours)?;
            }
        }
        Ok(())
    }

    /// Draw one repair duration. Parameters must already be validated.
    ///
    /// `Fixed` consumes no random draws.
    pub fn sample(&self, source: &mut VariateSource) -> f64 {
        match *self {
            RepairModel::Fixed { hours } => hours,
            RepairModel::Uniform {
                min_hours,
                max_hours,
            } => source.rng.uniform(min_hours, max_hours),
            RepairModel::Weibull { shape, scale } => source.weibull_unchecked(shape, scale),
            RepairModel::Exponential { mean_hours } => mean_hours * source.unit_exponential(),
        }
    }
}

/// Per-trial random variate stream.
#[derive(Debug, Clone)]
pub struct VariateSource {
    rng: RngManager,
}

impl VariateSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngManager::new(seed),
        }
    }

    /// Stream `trial` of the configuration seeded with `seed`
    pub fn for_trial(seed: u64, trial: u64) -> Self {
        Self {
            rng: RngManager::for_stream(seed, trial),
        }
    }

    pub fn from_rng(rng: RngManager) -> Self {
        Self { rng }
    }

    /// Draw a Weibull(shape, scale) sample
    ///
    /// # Errors
    /// `InvalidParameter` if shape ≤ 0 or scale ≤ 0. No draw is consumed on error.
    pub fn weibull(&mut self, shape: f64, scale: f64) -> Result<f64, SimulationError> {
        require_positive("shape", shape)?;
        require_positive("scale", scale)?;
        Ok(self.weibull_unchecked(shape, scale))
    }

    /// Inverse-CDF sampling: `λ · (−ln(1 − u))^(1/k)`
    fn weibull_unchecked(&mut self, shape: f64, scale: f64) -> f64 {
        scale * self.unit_exponential().powf(1.0 / shape)
    }

    /// Exp(1) sample; `u ∈ [0, 1)` keeps the logarithm finite.
    fn unit_exponential(&mut self) -> f64 {
        let u = self.rng.next_f64();
        (1.0 - u).ln().abs()
    }

    pub fn rng(&self) -> &RngManager {
        &self.rng
    }
}
