//! Fleet inventory import
//!
//! Inventories list servers and the disks behind them, with costs in a
//! single currency:
//!
//! ```json
//! {
//!   "time_period_hours": 8760,
//!   "weibull_shape": 1.5,
//!   "currency": "PLN",
//!   "servers": [
//!     { "id": 1, "server_repair_cost_PLN": 2000, "raid_level": 5,
//!       "disks": [ { "repair_cost_PLN": 300, "lost_revenue_per_hour_PLN": 50 } ] }
//!   ]
//! }
//! ```
//!
//! Server mode gives one configuration per server: the server itself
//! (Weibull scale = horizon) in series with its disks (scale = horizon / 2),
//! all repaired in 1.5 to 2.5 hours. Per-disk mode gives one single-disk
//! configuration per disk with a fixed 2 hour repair.

use super::sweep::Sweep;
use super::{read_file, ConfigError};
use crate::distributions::{RepairModel, WeibullLifetime};
use crate::models::{Component, ComponentId, ComponentKind};
use crate::montecarlo::{SimulationConfig, SlaTargets};
use crate::policy::ValidationMode;
use crate::rng::derive_seed;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SERVER_REPAIR: RepairModel = RepairModel::Uniform {
    min_hours: 1.5,
    max_hours: 2.5,
};

const STANDALONE_DISK_REPAIR: RepairModel = RepairModel::Fixed { hours: 2.0 };

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetInventory {
    pub time_period_hours: f64,
    pub weibull_shape: f64,

    #[serde(default)]
    pub currency: Option<String>,

    pub servers: Vec<ServerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub id: u32,

    #[serde(rename = "server_repair_cost_PLN", default)]
    pub server_repair_cost: f64,

    /// Missing means no redundancy
    #[serde(default)]
    pub raid_level: u8,

    pub disks: Vec<DiskEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiskEntry {
    #[serde(rename = "repair_cost_PLN")]
    pub repair_cost: f64,

    #[serde(rename = "lost_revenue_per_hour_PLN")]
    pub lost_revenue_per_hour: f64,
}

/// Run parameters the inventory itself does not carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetOptions {
    pub trials: usize,
    pub seed: u64,
    pub sla: SlaTargets,
    /// One configuration per disk instead of per server
    pub per_disk: bool,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: super::sweep::DEFAULT_SWEEP_SEED,
            sla: SlaTargets::default(),
            per_disk: false,
        }
    }
}

impl FleetInventory {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    /// Turn the inventory into a sweep
    ///
    /// # Errors
    /// `Invalid` for an empty fleet, a server without disks or duplicate
    /// server ids.
    pub fn to_sweep(&self, options: &FleetOptions) -> Result<Sweep, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("inventory has no servers".to_string()));
        }

        let mut ids = std::collections::HashSet::new();
        for server in &self.servers {
            if !ids.insert(server.id) {
                return Err(ConfigError::Invalid(format!(
                    "server id {} appears twice",
                    server.id
                )));
            }
            if server.disks.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "server {} has no disks",
                    server.id
                )));
            }
        }

        let configurations = if options.per_disk {
            self.servers
                .iter()
                .flat_map(|server| {
                    server
                        .disks
                        .iter()
                        .enumerate()
                        .map(move |(index, disk)| {
                            self.disk_configuration(server, index + 1, disk, options)
                        })
                })
                .collect()
        } else {
            self.servers
                .iter()
                .map(|server| self.server_configuration(server, options))
                .collect()
        };

        Ok(Sweep {
            validation: ValidationMode::Permissive,
            currency: self.currency.clone(),
            configurations,
        })
    }

    fn lifetime(&self, scale: f64) -> WeibullLifetime {
        WeibullLifetime {
            shape: self.weibull_shape,
            scale,
        }
    }

    fn server_configuration(
        &self,
        server: &ServerEntry,
        options: &FleetOptions,
    ) -> SimulationConfig {
        let horizon = self.time_period_hours;
        let mut components = vec![Component {
            id: ComponentId(0),
            name: format!("Server{}", server.id),
            kind: ComponentKind::Server,
            lifetime: self.lifetime(horizon),
            repair: SERVER_REPAIR,
            per_failure_cost: server.server_repair_cost,
            downtime_loss_per_hour: 0.0,
        }];
        for (index, disk) in server.disks.iter().enumerate() {
            components.push(Component {
                id: ComponentId(components.len()),
                name: format!("S{}D{}", server.id, index + 1),
                kind: ComponentKind::Disk,
                lifetime: self.lifetime(horizon / 2.0),
                repair: SERVER_REPAIR,
                per_failure_cost: disk.repair_cost,
                downtime_loss_per_hour: disk.lost_revenue_per_hour,
            });
        }

        SimulationConfig {
            label: format!("S{}", server.id),
            redundancy_level: server.raid_level,
            components,
            horizon_hours: horizon,
            trials: options.trials,
            seed: derive_seed(options.seed, u64::from(server.id) * 100),
            sla: options.sla,
            downtime_loss_per_hour: None,
        }
    }

    fn disk_configuration(
        &self,
        server: &ServerEntry,
        disk_number: usize,
        disk: &DiskEntry,
        options: &FleetOptions,
    ) -> SimulationConfig {
        let label = format!("S{}D{}", server.id, disk_number);
        SimulationConfig {
            label: label.clone(),
            redundancy_level: 0,
            components: vec![Component {
                id: ComponentId(0),
                name: label,
                kind: ComponentKind::Disk,
                lifetime: self.lifetime(self.time_period_hours / 2.0),
                repair: STANDALONE_DISK_REPAIR,
                per_failure_cost: disk.repair_cost,
                downtime_loss_per_hour: disk.lost_revenue_per_hour,
            }],
            horizon_hours: self.time_period_hours,
            trials: options.trials,
            seed: derive_seed(
                options.seed,
                u64::from(server.id) * 100 + disk_number as u64,
            ),
            sla: options.sla,
            downtime_loss_per_hour: None,
        }
    }
}
