//! Reliability Simulator Core - Rust Engine
//!
//! Discrete-event Monte-Carlo simulation of storage systems: disks and
//! servers fail with Weibull lifetimes, get repaired, and a RAID-style
//! redundancy rule decides whether the system as a whole is up.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation, one stream per trial
//! - **distributions**: Weibull lifetimes and repair-time models
//! - **core**: Simulated clock
//! - **events**: Failure/repair events and the time-ordered queue
//! - **models**: Components, per-trial state, event log
//! - **policy**: Redundancy rules (levels 0, 1, 5, 6)
//! - **orchestrator**: Single-trial event loop
//! - **montecarlo**: Parallel trials, aggregation, sweeps
//! - **config**: Sweep files and fleet inventories
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG, per-trial streams)
//! 2. Simulated time never moves backwards
//! 3. Aggregates do not depend on thread count or scheduling

// Module declarations
pub mod config;
pub mod core;
pub mod distributions;
pub mod error;
pub mod events;
pub mod models;
pub mod montecarlo;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use config::{ConfigError, FleetInventory, FleetOptions, Sweep, SweepFile};
pub use crate::core::clock::SimClock;
pub use distributions::{RepairModel, VariateSource, WeibullLifetime};
pub use error::{SimulationError, SimulationWarning};
pub use events::{EventKind, EventQueue, ScheduledEvent};
pub use models::{
    Component, ComponentId, ComponentKind, ComponentStatus, Event, EventLog, OutageInterval,
    SystemState,
};
pub use montecarlo::{
    AggregatedResult, CancellationToken, ComponentSummary, ConfigurationReport,
    ConfigurationStatus, MetricSummary, MonteCarloAggregator, SimulationConfig, SlaTargets,
    SweepOptions,
};
pub use orchestrator::{
    compute_config_hash, simulate_trial, simulate_trial_outcome, RunPhase, RunResult,
    SingleRunSimulator, SystemModel, TrialOutcome,
};
pub use policy::{decide, RedundancyLevel, RedundancyPolicy, ValidationMode};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn reliability_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PySimulator>()?;
    m.add_function(wrap_pyfunction!(ffi::run_sweep, m)?)?;
    Ok(())
}
