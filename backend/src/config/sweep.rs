//! Sweep file format
//!
//! ```json
//! {
//!   "seed": 105,
//!   "validation": "permissive",
//!   "currency": "PLN",
//!   "configurations": [
//!     {
//!       "label": "raid5-3",
//!       "redundancy_level": 5,
//!       "horizon_hours": 1000.0,
//!       "trials": 500,
//!       "sla": { "availability_percent": 99.0, "max_downtime_hours": 10.0 },
//!       "components": [
//!         { "name": "D", "kind": "disk", "count": 3,
//!           "failure": { "shape": 1.5, "scale": 500.0 },
//!           "repair": { "model": "fixed", "hours": 2.0 },
//!           "per_failure_cost": 300.0, "downtime_loss_per_hour": 50.0 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A component with `count: n > 1` expands into `name1..name_n`. A
//! configuration without a `seed` gets one derived from the sweep seed and
//! its position in the file.

use super::{read_file, ConfigError};
use crate::distributions::{RepairModel, WeibullLifetime};
use crate::error::SimulationWarning;
use crate::models::{Component, ComponentId, ComponentKind};
use crate::montecarlo::{SimulationConfig, SlaTargets};
use crate::policy::ValidationMode;
use crate::rng::derive_seed;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default seed when the file names none
pub const DEFAULT_SWEEP_SEED: u64 = 105;

fn default_seed() -> u64 {
    DEFAULT_SWEEP_SEED
}

fn default_count() -> usize {
    1
}

fn default_kind() -> ComponentKind {
    ComponentKind::Disk
}

/// Top-level sweep file, as written on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub validation: ValidationMode,

    /// Label for monetary columns in reports
    #[serde(default)]
    pub currency: Option<String>,

    pub configurations: Vec<ConfigurationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationEntry {
    pub label: String,
    pub redundancy_level: u8,
    pub horizon_hours: f64,
    pub trials: usize,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub downtime_loss_per_hour: Option<f64>,

    pub sla: SlaEntry,

    pub components: Vec<ComponentEntry>,
}

/// SLA block; a missing downtime limit means "no limit"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlaEntry {
    pub availability_percent: f64,

    #[serde(default)]
    pub max_downtime_hours: Option<f64>,
}

impl From<SlaEntry> for SlaTargets {
    fn from(entry: SlaEntry) -> Self {
        SlaTargets {
            availability_percent: entry.availability_percent,
            max_downtime_hours: entry.max_downtime_hours.unwrap_or(f64::INFINITY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    pub name: String,

    #[serde(default = "default_kind")]
    pub kind: ComponentKind,

    #[serde(default = "default_count")]
    pub count: usize,

    pub failure: WeibullLifetime,

    #[serde(default)]
    pub repair: RepairModel,

    #[serde(default)]
    pub per_failure_cost: f64,

    #[serde(default)]
    pub downtime_loss_per_hour: f64,
}

/// A resolved sweep: concrete configurations in file order
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub validation: ValidationMode,
    pub currency: Option<String>,
    pub configurations: Vec<SimulationConfig>,
}

impl SweepFile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    /// Replace the trial count of every configuration
    pub fn override_trials(&mut self, trials: usize) {
        for entry in &mut self.configurations {
            entry.trials = trials;
        }
    }

    /// Expand component templates and assign seeds
    ///
    /// # Errors
    /// `Invalid` for empty labels, `count: 0` or component names repeated
    /// within a configuration.
    pub fn resolve(&self) -> Result<Sweep, ConfigError> {
        let configurations = self
            .configurations
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.resolve(derive_seed(self.seed, index as u64)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Sweep {
            validation: self.validation,
            currency: self.currency.clone(),
            configurations,
        })
    }
}

impl ConfigurationEntry {
    fn resolve(&self, derived_seed: u64) -> Result<SimulationConfig, ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "configuration label must not be empty".to_string(),
            ));
        }

        let mut components = Vec::new();
        for template in &self.components {
            if template.count == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: component {} has count 0",
                    self.label, template.name
                )));
            }
            for n in 1..=template.count {
                let name = if template.count == 1 {
                    template.name.clone()
                } else {
                    format!("{}{}", template.name, n)
                };
                components.push(Component {
                    id: ComponentId(components.len()),
                    name,
                    kind: template.kind,
                    lifetime: template.failure,
                    repair: template.repair,
                    per_failure_cost: template.per_failure_cost,
                    downtime_loss_per_hour: template.downtime_loss_per_hour,
                });
            }
        }

        let mut names = HashSet::new();
        if let Some(dup) = components.iter().find(|c| !names.insert(c.name.as_str())) {
            return Err(ConfigError::Invalid(format!(
                "{}: component name {} is used twice",
                self.label, dup.name
            )));
        }

        Ok(SimulationConfig {
            label: self.label.clone(),
            redundancy_level: self.redundancy_level,
            components,
            horizon_hours: self.horizon_hours,
            trials: self.trials,
            seed: self.seed.unwrap_or(derived_seed),
            sla: self.sla.into(),
            downtime_loss_per_hour: self.downtime_loss_per_hour,
        })
    }
}

impl Sweep {
    /// Load, parse and resolve a sweep file in one go
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        SweepFile::load_from_path(path)?.resolve()
    }

    /// Validate every configuration without running it
    ///
    /// `mode` overrides the file's own validation mode when given. Returns
    /// the warnings permissive mode would log.
    ///
    /// # Errors
    /// `Invalid` for a repeated label; `Simulation` naming the first
    /// configuration the simulator rejects.
    pub fn validate(
        &self,
        mode: Option<ValidationMode>,
    ) -> Result<Vec<(String, SimulationWarning)>, ConfigError> {
        let mode = mode.unwrap_or(self.validation);
        let mut labels = HashSet::new();
        let mut warnings = Vec::new();
        for config in &self.configurations {
            if !labels.insert(config.label.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate configuration label {:?}",
                    config.label
                )));
            }
            let prepared = config
                .prepare(mode)
                .map_err(|source| ConfigError::Simulation {
                    label: config.label.clone(),
                    source,
                })?;
            warnings.extend(
                prepared
                    .warnings()
                    .iter()
                    .map(|w| (config.label.clone(), w.clone())),
            );
        }
        Ok(warnings)
    }
}
