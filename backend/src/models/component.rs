//! Storage components and their reliability parameters
//!
//! A component is immutable for the lifetime of a configuration. Its
//! [`ComponentId`] is its position in the configuration's component list,
//! which lets per-trial state live in plain vectors.

use crate::distributions::{RepairModel, VariateSource, WeibullLifetime};
use crate::error::{require_non_negative, SimulationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense index of a component within its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role of a component in the storage system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Member of the redundancy group
    Disk,
    /// Front-end host; its failure takes the whole system down
    Server,
}

/// A failable, repairable component
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::models::{Component, ComponentId, ComponentKind};
/// use reliability_simulator_core_rs::distributions::{RepairModel, WeibullLifetime};
///
/// let disk = Component {
///     id: ComponentId(0),
///     name: "S1D1".to_string(),
///     kind: ComponentKind::Disk,
///     lifetime: WeibullLifetime { shape: 1.5, scale: 500.0 },
///     repair: RepairModel::Fixed { hours: 2.0 },
///     per_failure_cost: 300.0,
///     downtime_loss_per_hour: 50.0,
/// };
/// assert!(disk.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,

    /// Human-readable label (e.g., "S1D2")
    pub name: String,

    pub kind: ComponentKind,

    /// Time-to-failure distribution
    pub lifetime: WeibullLifetime,

    /// Repair duration distribution
    pub repair: RepairModel,

    /// Cost charged for every failure of this component
    pub per_failure_cost: f64,

    /// Revenue lost per hour while the system is down
    pub downtime_loss_per_hour: f64,
}

impl Component {
    /// Check every parameter of the component
    ///
    /// # Errors
    /// `InvalidParameter` naming the offending component and field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let checks = || -> Result<(), SimulationError> {
            self.lifetime.validate()?;
            self.repair.validate()?;
            require_non_negative("per_failure_cost", self.per_failure_cost)?;
            require_non_negative("downtime_loss_per_hour", self.downtime_loss_per_hour)?;
            Ok(())
        };
        checks().map_err(|err| match err {
            SimulationError::InvalidParameter { name, reason } => {
                SimulationError::InvalidParameter {
                    name: format!("{}.{}", self.name, name),
                    reason,
                }
            }
            other => other,
        })
    }

    /// Time until this component next fails
    pub fn draw_failure_interval(&self, source: &mut VariateSource) -> f64 {
        self.lifetime.sample(source)
    }

    /// Time this component spends in repair
    pub fn draw_repair_duration(&self, source: &mut VariateSource) -> f64 {
        self.repair.sample(source)
    }

    pub fn is_disk(&self) -> bool {
        self.kind == ComponentKind::Disk
    }
}
