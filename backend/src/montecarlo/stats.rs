//! Reduction of trial results into summary statistics
//!
//! The reduction reads results in trial-index order. Combined with per-trial
//! streams that makes the aggregate bit-identical no matter which worker
//! finished first.

use crate::error::{require_positive, SimulationError};
use crate::models::{Component, ComponentKind};
use crate::orchestrator::{RunResult, TrialOutcome};
use serde::{Deserialize, Serialize};

/// SLA thresholds a configuration is judged against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaTargets {
    /// Minimum mean availability, in percent
    pub availability_percent: f64,
    /// Maximum mean downtime, in hours
    pub max_downtime_hours: f64,
}

impl Default for SlaTargets {
    fn default() -> Self {
        Self {
            availability_percent: 99.9,
            max_downtime_hours: f64::INFINITY,
        }
    }
}

impl SlaTargets {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(0.0..=100.0).contains(&self.availability_percent) {
            return Err(SimulationError::invalid(
                "sla.availability_percent",
                format!("must be within [0, 100], got {}", self.availability_percent),
            ));
        }
        if self.max_downtime_hours.is_nan() || self.max_downtime_hours < 0.0 {
            return Err(SimulationError::invalid(
                "sla.max_downtime_hours",
                format!("must be >= 0, got {}", self.max_downtime_hours),
            ));
        }
        Ok(())
    }

    /// `mean availability >= target AND mean downtime <= limit`
    pub fn is_met(&self, mean_availability: f64, mean_downtime: f64) -> bool {
        mean_availability >= self.availability_percent && mean_downtime <= self.max_downtime_hours
    }
}

/// Arithmetic mean and population standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricSummary {
    /// Two-pass mean / population std over the samples, in the given order
    ///
    /// An empty slice summarizes to zeros.
    ///
    /// # Example
    /// ```
    /// use reliability_simulator_core_rs::montecarlo::MetricSummary;
    ///
    /// let s = MetricSummary::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    /// assert_eq!(s.mean, 5.0);
    /// assert_eq!(s.std_dev, 2.0);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// Summary of MTBF-style values that are `+inf` when nothing failed
    ///
    /// Finite samples are summarized; if there are none the mean is `+inf`
    /// and the spread is 0, so the result is never NaN.
    pub fn from_censored(samples: &[f64]) -> Self {
        let finite: Vec<f64> = samples.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.is_empty() && !samples.is_empty() {
            return Self {
                mean: f64::INFINITY,
                std_dev: 0.0,
            };
        }
        Self::from_samples(&finite)
    }
}

/// The seven metric summaries shared by system and component views
struct Summaries {
    failure_free_trials: usize,
    downtime_hours: MetricSummary,
    failure_count: MetricSummary,
    repair_cost_total: MetricSummary,
    lost_revenue_total: MetricSummary,
    mttr: MetricSummary,
    mttf: MetricSummary,
    availability_percent: MetricSummary,
}

impl Summaries {
    fn of(results: &[RunResult]) -> Self {
        let column = |f: fn(&RunResult) -> f64| -> Vec<f64> { results.iter().map(f).collect() };
        Self {
            failure_free_trials: results.iter().filter(|r| r.failure_count == 0).count(),
            downtime_hours: MetricSummary::from_samples(&column(|r| r.downtime_hours)),
            failure_count: MetricSummary::from_samples(&column(|r| r.failure_count as f64)),
            repair_cost_total: MetricSummary::from_samples(&column(|r| r.repair_cost_total)),
            lost_revenue_total: MetricSummary::from_samples(&column(|r| r.lost_revenue_total)),
            mttr: MetricSummary::from_samples(&column(|r| r.mttr)),
            mttf: MetricSummary::from_censored(&column(|r| r.mttf)),
            availability_percent: MetricSummary::from_samples(&column(|r| r.availability_percent)),
        }
    }
}

/// Summary of one component across all trials
///
/// Downtime here is the time the component itself was down, whether or not
/// the system went down with it; lost revenue uses the component's own rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub kind: ComponentKind,
    pub failure_free_trials: usize,
    pub downtime_hours: MetricSummary,
    pub failure_count: MetricSummary,
    pub repair_cost_total: MetricSummary,
    pub lost_revenue_total: MetricSummary,
    pub mttr: MetricSummary,
    pub mttf: MetricSummary,
    pub availability_percent: MetricSummary,
}

impl ComponentSummary {
    pub fn from_runs(component: &Component, results: &[RunResult]) -> Self {
        let s = Summaries::of(results);
        Self {
            name: component.name.clone(),
            kind: component.kind,
            failure_free_trials: s.failure_free_trials,
            downtime_hours: s.downtime_hours,
            failure_count: s.failure_count,
            repair_cost_total: s.repair_cost_total,
            lost_revenue_total: s.lost_revenue_total,
            mttr: s.mttr,
            mttf: s.mttf,
            availability_percent: s.availability_percent,
        }
    }
}

/// Summary of all trials of one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub configuration_label: String,

    /// Number of trials reduced
    pub trials: usize,

    /// Trials in which no component failed (excluded from the MTBF summary)
    pub failure_free_trials: usize,

    pub downtime_hours: MetricSummary,
    pub failure_count: MetricSummary,
    pub repair_cost_total: MetricSummary,
    pub lost_revenue_total: MetricSummary,
    pub mttr: MetricSummary,
    pub mttf: MetricSummary,
    pub availability_percent: MetricSummary,

    /// Targets the verdict was computed against
    pub sla: SlaTargets,
    pub meets_sla: bool,

    /// Per-component summaries in component order; empty when reduced from
    /// system results alone
    #[serde(default)]
    pub components: Vec<ComponentSummary>,

    /// SHA-256 of the configuration; empty when aggregated outside a sweep
    pub config_hash: String,
}

impl AggregatedResult {
    /// Reduce a configuration's trial results
    ///
    /// # Errors
    /// `Configuration` if `results` is empty; `InvalidParameter` for bad SLA targets.
    pub fn from_runs(
        label: &str,
        results: &[RunResult],
        sla: SlaTargets,
    ) -> Result<Self, SimulationError> {
        if results.is_empty() {
            return Err(SimulationError::Configuration(format!(
                "{}: cannot aggregate zero trials",
                label
            )));
        }
        sla.validate()?;

        let s = Summaries::of(results);
        Ok(Self {
            configuration_label: label.to_string(),
            trials: results.len(),
            failure_free_trials: s.failure_free_trials,
            downtime_hours: s.downtime_hours,
            failure_count: s.failure_count,
            repair_cost_total: s.repair_cost_total,
            lost_revenue_total: s.lost_revenue_total,
            mttr: s.mttr,
            mttf: s.mttf,
            availability_percent: s.availability_percent,
            sla,
            meets_sla: sla.is_met(s.availability_percent.mean, s.downtime_hours.mean),
            components: Vec::new(),
            config_hash: String::new(),
        })
    }

    /// Reduce full trial outcomes, system and per-component
    ///
    /// # Errors
    /// As [`AggregatedResult::from_runs`], plus `Configuration` when an
    /// outcome's component count differs from `components`.
    pub fn from_outcomes(
        label: &str,
        components: &[Component],
        outcomes: &[TrialOutcome],
        sla: SlaTargets,
    ) -> Result<Self, SimulationError> {
        if let Some(bad) = outcomes.iter().find(|o| o.components.len() != components.len()) {
            return Err(SimulationError::Configuration(format!(
                "{}: trial reported {} components, expected {}",
                label,
                bad.components.len(),
                components.len()
            )));
        }

        let system: Vec<RunResult> = outcomes.iter().map(|o| o.result).collect();
        let mut aggregated = Self::from_runs(label, &system, sla)?;
        aggregated.components = components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let column: Vec<RunResult> =
                    outcomes.iter().map(|o| o.components[index]).collect();
                ComponentSummary::from_runs(component, &column)
            })
            .collect();
        Ok(aggregated)
    }

    pub fn with_config_hash(mut self, hash: String) -> Self {
        self.config_hash = hash;
        self
    }
}

pub(crate) fn check_trials(label: &str, trials: usize) -> Result<(), SimulationError> {
    if trials == 0 {
        return Err(SimulationError::Configuration(format!(
            "{}: trial count must be >= 1",
            label
        )));
    }
    Ok(())
}

/// Configured horizons must be strictly positive; the engine itself accepts 0
pub(crate) fn check_horizon(horizon: f64) -> Result<f64, SimulationError> {
    require_positive("horizon_hours", horizon)
}
