//! Configuration files
//!
//! Two input formats are understood:
//!
//! - **sweep files** ([`sweep`]): explicit configurations with components,
//!   redundancy level, horizon, trials, SLA targets;
//! - **fleet inventories** ([`fleet`]): a list of servers and their disks,
//!   turned into one configuration per server (or per disk).
//!
//! Both resolve into a [`Sweep`], a list of [`SimulationConfig`] ready for
//! the Monte-Carlo driver.
//!
//! [`SimulationConfig`]: crate::montecarlo::SimulationConfig

pub mod fleet;
pub mod sweep;

pub use fleet::{DiskEntry, FleetInventory, FleetOptions, ServerEntry};
pub use sweep::{ComponentEntry, ConfigurationEntry, SlaEntry, Sweep, SweepFile};

use crate::error::SimulationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Structurally valid JSON describing an impossible setup
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A configuration the simulator itself refused
    #[error("{label}: {source}")]
    Simulation {
        label: String,
        #[source]
        source: SimulationError,
    },
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
