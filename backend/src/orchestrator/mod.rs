//! Orchestrator - single-trial simulation loop
//!
//! See `engine.rs` for the event loop and `fingerprint.rs` for configuration
//! hashing.

pub mod engine;
pub mod fingerprint;

pub use engine::{
    simulate_trial, simulate_trial_outcome, RunPhase, RunResult, SingleRunSimulator, SystemModel,
    TrialOutcome,
};
pub use fingerprint::compute_config_hash;
