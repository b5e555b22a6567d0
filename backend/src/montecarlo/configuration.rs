//! One simulated configuration: components, policy, horizon, trial count.

use super::stats::{check_horizon, check_trials, SlaTargets};
use crate::error::{SimulationError, SimulationWarning};
use crate::models::Component;
use crate::orchestrator::{compute_config_hash, simulate_trial_outcome, SystemModel, TrialOutcome};
use crate::policy::{RedundancyPolicy, ValidationMode};
use serde::{Deserialize, Serialize};

/// Everything needed to run a configuration's trials
///
/// Serializes to the canonical form used for the configuration hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Unique within a sweep
    pub label: String,

    /// Raw redundancy level (0, 1, 5, 6; others fall back to level 0 rules)
    pub redundancy_level: u8,

    /// Components, ids matching positions
    pub components: Vec<Component>,

    pub horizon_hours: f64,

    pub trials: usize,

    /// Base seed; trial `i` uses the stream derived from `(seed, i)`
    pub seed: u64,

    pub sla: SlaTargets,

    /// Outage loss rate; defaults to the sum of component rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downtime_loss_per_hour: Option<f64>,
}

impl SimulationConfig {
    /// Validate and resolve into a runnable configuration
    ///
    /// # Errors
    /// * `InvalidParameter` - non-positive horizon, bad component or SLA values
    /// * `Configuration` - zero trials, no disks, or (strict mode) an unknown level
    pub fn prepare(&self, mode: ValidationMode) -> Result<PreparedConfiguration, SimulationError> {
        let horizon = check_horizon(self.horizon_hours)?;
        check_trials(&self.label, self.trials)?;
        self.sla.validate()?;

        let (policy, warning) = RedundancyPolicy::resolve(self.redundancy_level, mode)?;
        let model = SystemModel::new(
            self.components.clone(),
            policy,
            self.downtime_loss_per_hour,
        )?;

        Ok(PreparedConfiguration {
            label: self.label.clone(),
            model,
            horizon,
            trials: self.trials,
            seed: self.seed,
            sla: self.sla,
            warnings: warning.into_iter().collect(),
            config_hash: self.config_hash()?,
        })
    }

    /// SHA-256 of the canonical JSON form
    pub fn config_hash(&self) -> Result<String, SimulationError> {
        compute_config_hash(self)
    }
}

/// A validated configuration, ready to run trials
#[derive(Debug, Clone)]
pub struct PreparedConfiguration {
    label: String,
    model: SystemModel,
    horizon: f64,
    trials: usize,
    seed: u64,
    sla: SlaTargets,
    warnings: Vec<SimulationWarning>,
    config_hash: String,
}

impl PreparedConfiguration {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn model(&self) -> &SystemModel {
        &self.model
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn sla(&self) -> SlaTargets {
        self.sla
    }

    pub fn warnings(&self) -> &[SimulationWarning] {
        &self.warnings
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Run trial `index` on its own random stream
    pub fn run_trial(&self, index: u64) -> Result<TrialOutcome, SimulationError> {
        simulate_trial_outcome(&self.model, self.horizon, self.seed, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{RepairModel, WeibullLifetime};
    use crate::models::{ComponentId, ComponentKind};

    fn config(level: u8) -> SimulationConfig {
        SimulationConfig {
            label: "cfg".to_string(),
            redundancy_level: level,
            components: vec![Component {
                id: ComponentId(0),
                name: "D1".to_string(),
                kind: ComponentKind::Disk,
                lifetime: WeibullLifetime {
                    shape: 1.0,
                    scale: 100.0,
                },
                repair: RepairModel::Fixed { hours: 2.0 },
                per_failure_cost: 1.0,
                downtime_loss_per_hour: 1.0,
            }],
            horizon_hours: 100.0,
            trials: 10,
            seed: 7,
            sla: SlaTargets::default(),
            downtime_loss_per_hour: None,
        }
    }

    #[test]
    fn test_unknown_level_warns_in_permissive_mode() {
        let prepared = config(4).prepare(ValidationMode::Permissive).unwrap();
        assert_eq!(
            prepared.warnings(),
            &[SimulationWarning::UnrecognizedRedundancyLevel { level: 4 }]
        );
        assert!(config(4).prepare(ValidationMode::Strict).is_err());
    }

    #[test]
    fn test_zero_horizon_and_trials_rejected() {
        let mut c = config(0);
        c.horizon_hours = 0.0;
        assert!(matches!(
            c.prepare(ValidationMode::Permissive),
            Err(SimulationError::InvalidParameter { .. })
        ));

        let mut c = config(0);
        c.trials = 0;
        assert!(matches!(
            c.prepare(ValidationMode::Permissive),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_hash_tracks_content() {
        let a = config(1);
        let mut b = config(1);
        assert_eq!(a.config_hash().unwrap(), b.config_hash().unwrap());
        b.seed = 8;
        assert_ne!(a.config_hash().unwrap(), b.config_hash().unwrap());
    }
}
