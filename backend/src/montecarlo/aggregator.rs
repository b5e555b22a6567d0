//! Monte-Carlo driver
//!
//! Trials of a configuration are independent: each one owns its random
//! stream and its state, and only reads the shared [`SystemModel`]. They run
//! on the rayon pool and are collected back in trial-index order, so the
//! aggregate does not depend on scheduling.
//!
//! Configurations in a sweep are evaluated in input order. A sweep can be
//! cut short by a [`CancellationToken`] or a timeout; configurations that
//! did not finish are reported as [`ConfigurationStatus::Abandoned`].
//!
//! [`SystemModel`]: crate::orchestrator::SystemModel

use super::configuration::{PreparedConfiguration, SimulationConfig};
use super::stats::{AggregatedResult, SlaTargets};
use crate::error::{SimulationError, SimulationWarning};
use crate::orchestrator::{RunResult, TrialOutcome};
use crate::policy::ValidationMode;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// ============================================================================
// Options
// ============================================================================

/// Shared flag that asks a running sweep to stop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// How a sweep is validated and executed
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    pub validation: ValidationMode,

    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,

    /// Wall-clock budget for the whole sweep
    pub timeout: Option<Duration>,

    pub cancellation: CancellationToken,
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of one configuration in a sweep
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationStatus {
    Completed(AggregatedResult),
    Failed(SimulationError),
    /// Stopped by cancellation or timeout before all trials ran
    Abandoned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationReport {
    pub label: String,
    pub warnings: Vec<SimulationWarning>,
    pub status: ConfigurationStatus,
}

impl ConfigurationReport {
    fn new(label: &str, warnings: Vec<SimulationWarning>, status: ConfigurationStatus) -> Self {
        Self {
            label: label.to_string(),
            warnings,
            status,
        }
    }

    pub fn result(&self) -> Option<&AggregatedResult> {
        match &self.status {
            ConfigurationStatus::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, ConfigurationStatus::Completed(_))
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self.status, ConfigurationStatus::Abandoned)
    }
}

// ============================================================================
// Aggregator
// ============================================================================

enum TrialAbort {
    Stopped,
    Failed(SimulationError),
}

struct StopSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl StopSignal {
    fn new(options: &SweepOptions) -> Self {
        Self {
            token: options.cancellation.clone(),
            deadline: options.timeout.map(|t| Instant::now() + t),
        }
    }

    fn should_stop(&self) -> bool {
        if self.token.is_cancelled() {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                // Latch so every worker sees the same answer from here on
                self.token.cancel();
                true
            }
            _ => false,
        }
    }
}

/// Runs configurations and reduces their trials
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::montecarlo::{MonteCarloAggregator, SlaTargets};
/// use reliability_simulator_core_rs::orchestrator::RunResult;
///
/// let runs = vec![RunResult::empty(), RunResult::empty()];
/// let agg = MonteCarloAggregator::aggregate("idle", &runs, SlaTargets::default()).unwrap();
/// assert_eq!(agg.availability_percent.mean, 100.0);
/// assert!(agg.meets_sla);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MonteCarloAggregator {
    options: SweepOptions,
}

impl MonteCarloAggregator {
    pub fn new(options: SweepOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    /// Reduce already computed trial results
    pub fn aggregate(
        label: &str,
        results: &[RunResult],
        sla: SlaTargets,
    ) -> Result<AggregatedResult, SimulationError> {
        AggregatedResult::from_runs(label, results, sla)
    }

    /// Run every trial of one configuration
    pub fn run_configuration(
        &self,
        config: &SimulationConfig,
    ) -> Result<ConfigurationReport, SimulationError> {
        let mut reports = self.run_sweep(std::slice::from_ref(config))?;
        reports
            .pop()
            .ok_or_else(|| SimulationError::Configuration("empty sweep".to_string()))
    }

    /// Run a sweep, one report per configuration in input order
    ///
    /// Per-configuration problems are reported in the matching
    /// [`ConfigurationReport`]; only a failure to build the worker pool
    /// aborts the whole call.
    pub fn run_sweep(
        &self,
        configs: &[SimulationConfig],
    ) -> Result<Vec<ConfigurationReport>, SimulationError> {
        let stop = StopSignal::new(&self.options);
        info!(
            configurations = configs.len(),
            threads = ?self.options.threads,
            "starting sweep"
        );

        let started = Instant::now();
        let reports = match self.options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        SimulationError::Configuration(format!("cannot build worker pool: {}", e))
                    })?;
                pool.install(|| self.sweep(configs, &stop))
            }
            None => self.sweep(configs, &stop),
        };

        let completed = reports.iter().filter(|r| r.is_completed()).count();
        let abandoned = reports.iter().filter(|r| r.is_abandoned()).count();
        info!(
            completed,
            abandoned,
            failed = reports.len() - completed - abandoned,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sweep finished"
        );
        Ok(reports)
    }

    fn sweep(&self, configs: &[SimulationConfig], stop: &StopSignal) -> Vec<ConfigurationReport> {
        let mut seen = HashSet::new();
        configs
            .iter()
            .map(|config| {
                if !seen.insert(config.label.as_str()) {
                    let err = SimulationError::Configuration(format!(
                        "duplicate configuration label {:?}",
                        config.label
                    ));
                    warn!(configuration = %config.label, "{}", err);
                    return ConfigurationReport::new(
                        &config.label,
                        Vec::new(),
                        ConfigurationStatus::Failed(err),
                    );
                }
                self.evaluate(config, stop)
            })
            .collect()
    }

    fn evaluate(&self, config: &SimulationConfig, stop: &StopSignal) -> ConfigurationReport {
        if stop.should_stop() {
            warn!(configuration = %config.label, "abandoned before start");
            return ConfigurationReport::new(
                &config.label,
                Vec::new(),
                ConfigurationStatus::Abandoned,
            );
        }

        let prepared = match config.prepare(self.options.validation) {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(configuration = %config.label, error = %err, "configuration rejected");
                return ConfigurationReport::new(
                    &config.label,
                    Vec::new(),
                    ConfigurationStatus::Failed(err),
                );
            }
        };

        for warning in prepared.warnings() {
            warn!(configuration = %config.label, "{}", warning);
        }

        let status = match Self::run_trials(&prepared, stop) {
            Ok(outcomes) => match AggregatedResult::from_outcomes(
                prepared.label(),
                prepared.model().components(),
                &outcomes,
                prepared.sla(),
            ) {
                Ok(result) => {
                    debug!(
                        configuration = %config.label,
                        trials = result.trials,
                        availability = result.availability_percent.mean,
                        meets_sla = result.meets_sla,
                        "configuration aggregated"
                    );
                    ConfigurationStatus::Completed(
                        result.with_config_hash(prepared.config_hash().to_string()),
                    )
                }
                Err(err) => ConfigurationStatus::Failed(err),
            },
            Err(TrialAbort::Stopped) => {
                warn!(configuration = %config.label, "abandoned mid-run");
                ConfigurationStatus::Abandoned
            }
            Err(TrialAbort::Failed(err)) => {
                warn!(configuration = %config.label, error = %err, "trial failed");
                ConfigurationStatus::Failed(err)
            }
        };

        ConfigurationReport::new(&config.label, prepared.warnings().to_vec(), status)
    }

    /// Results come back indexed by trial, whatever order workers finish in
    fn run_trials(
        prepared: &PreparedConfiguration,
        stop: &StopSignal,
    ) -> Result<Vec<TrialOutcome>, TrialAbort> {
        (0..prepared.trials())
            .into_par_iter()
            .map(|trial| {
                if stop.should_stop() {
                    return Err(TrialAbort::Stopped);
                }
                prepared
                    .run_trial(trial as u64)
                    .map_err(TrialAbort::Failed)
            })
            .collect()
    }
}
