//! RAID-style redundancy rules
//!
//! | level | system up iff |
//! |---|---|
//! | 0 | failed == 0 |
//! | 1 | failed < total |
//! | 5 | failed <= 1 |
//! | 6 | failed <= 2 |
//! | other | failed == 0 |
//!
//! The rule is evaluated after every failure and every repair with no
//! hysteresis: the failed count and the level fully determine the status.

use crate::error::{SimulationError, SimulationWarning};
use crate::models::SystemState;
use serde::{Deserialize, Serialize};

/// How unrecognized redundancy levels are treated at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Reject unknown levels with a configuration error
    Strict,
    /// Fall back to the no-redundancy rule and emit a warning
    #[default]
    Permissive,
}

/// Supported redundancy schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedundancyLevel {
    /// Striping, no redundancy
    Raid0,
    /// Mirroring across every member
    Raid1,
    /// Single parity
    Raid5,
    /// Double parity
    Raid6,
    /// Anything else; evaluated as no redundancy
    Unrecognized(u8),
}

impl RedundancyLevel {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => RedundancyLevel::Raid0,
            1 => RedundancyLevel::Raid1,
            5 => RedundancyLevel::Raid5,
            6 => RedundancyLevel::Raid6,
            other => RedundancyLevel::Unrecognized(other),
        }
    }

    /// Numeric RAID level as configured
    pub fn level(&self) -> u8 {
        match self {
            RedundancyLevel::Raid0 => 0,
            RedundancyLevel::Raid1 => 1,
            RedundancyLevel::Raid5 => 5,
            RedundancyLevel::Raid6 => 6,
            RedundancyLevel::Unrecognized(level) => *level,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RedundancyLevel::Unrecognized(_))
    }

    /// Whether the redundancy group is up with `failed` of `total` members down
    pub fn is_up(&self, total: usize, failed: usize) -> bool {
        match self {
            RedundancyLevel::Raid0 => failed == 0,
            RedundancyLevel::Raid1 => failed < total,
            RedundancyLevel::Raid5 => failed <= 1,
            RedundancyLevel::Raid6 => failed <= 2,
            RedundancyLevel::Unrecognized(_) => failed == 0,
        }
    }
}

/// Pure decision function over a numeric level
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::policy::decide;
///
/// assert!(decide(1, 2, 1));   // mirror survives one loss
/// assert!(!decide(1, 2, 2));  // but not two
/// assert!(!decide(0, 4, 1));  // stripe dies on the first loss
/// assert!(decide(6, 8, 2));
/// assert!(!decide(7, 8, 1));  // unknown level: no redundancy
/// ```
pub fn decide(level: u8, total_components: usize, failed_count: usize) -> bool {
    RedundancyLevel::from_level(level).is_up(total_components, failed_count)
}

/// Redundancy rule bound to a configuration
///
/// Disks form the redundancy group. Servers are in series with it: any
/// server down means the system is down. Without servers this is exactly
/// the level table applied to all components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedundancyPolicy {
    level: RedundancyLevel,
}

impl RedundancyPolicy {
    pub fn new(level: RedundancyLevel) -> Self {
        Self { level }
    }

    /// Resolve a configured level under the given validation mode
    ///
    /// # Errors
    /// `Configuration` for an unrecognized level in strict mode.
    ///
    /// # Example
    /// ```
    /// use reliability_simulator_core_rs::policy::{RedundancyPolicy, ValidationMode};
    ///
    /// let (policy, warning) = RedundancyPolicy::resolve(3, ValidationMode::Permissive).unwrap();
    /// assert!(warning.is_some());
    /// assert!(!policy.level().is_recognized());
    ///
    /// assert!(RedundancyPolicy::resolve(3, ValidationMode::Strict).is_err());
    /// ```
    pub fn resolve(
        level: u8,
        mode: ValidationMode,
    ) -> Result<(Self, Option<SimulationWarning>), SimulationError> {
        let resolved = RedundancyLevel::from_level(level);
        if resolved.is_recognized() {
            return Ok((Self::new(resolved), None));
        }
        match mode {
            ValidationMode::Strict => Err(SimulationError::Configuration(format!(
                "unrecognized redundancy level {} (supported: 0, 1, 5, 6)",
                level
            ))),
            ValidationMode::Permissive => Ok((
                Self::new(resolved),
                Some(SimulationWarning::UnrecognizedRedundancyLevel { level }),
            )),
        }
    }

    pub fn level(&self) -> RedundancyLevel {
        self.level
    }

    /// System status implied by the current component state
    pub fn system_up(&self, state: &SystemState) -> bool {
        state.failed_servers() == 0 && self.level.is_up(state.total_disks(), state.failed_disks())
    }
}
