//! Per-trial system state
//!
//! Tracks which components are down and whether the system as a whole is in
//! an outage. Created fresh at the start of each trial and dropped at its end.
//!
//! # Critical Invariants
//!
//! 1. **Failed count**: `failed_count()` equals the number of components whose
//!    status is `Down`
//! 2. **Outage iff down**: the system is down exactly when an outage is open;
//!    both are represented by the single `outage_start` value
//! 3. **Single outage**: at most one outage interval is open at any time

use crate::models::component::{Component, ComponentId, ComponentKind};
use serde::{Deserialize, Serialize};

/// Up/down status of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// A closed period during which the system was down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutageInterval {
    pub start: f64,
    pub end: f64,
}

impl OutageInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Complete state of one trial
///
/// # Example
///
/// ```rust
/// use reliability_simulator_core_rs::models::{ComponentId, SystemState};
/// use reliability_simulator_core_rs::models::ComponentKind;
///
/// let mut state = SystemState::from_kinds(&[ComponentKind::Disk, ComponentKind::Disk]);
/// state.mark_down(ComponentId(1));
/// assert_eq!(state.failed_count(), 1);
/// assert!(!state.is_system_down());
/// ```
#[derive(Debug, Clone)]
pub struct SystemState {
    status: Vec<ComponentStatus>,
    kinds: Vec<ComponentKind>,
    failed_disks: usize,
    failed_servers: usize,
    total_disks: usize,
    /// Start of the open outage; `Some` exactly while the system is down
    outage_start: Option<f64>,
}

impl SystemState {
    /// All components up, no outage
    pub fn new(components: &[Component]) -> Self {
        let kinds: Vec<ComponentKind> = components.iter().map(|c| c.kind).collect();
        Self::from_kinds(&kinds)
    }

    pub fn from_kinds(kinds: &[ComponentKind]) -> Self {
        Self {
            status: vec![ComponentStatus::Up; kinds.len()],
            kinds: kinds.to_vec(),
            failed_disks: 0,
            failed_servers: 0,
            total_disks: kinds.iter().filter(|k| **k == ComponentKind::Disk).count(),
            outage_start: None,
        }
    }

    /// Mark a component failed
    ///
    /// Returns `false` (and changes nothing) if it was already down.
    pub fn mark_down(&mut self, id: ComponentId) -> bool {
        if self.status[id.0] == ComponentStatus::Down {
            return false;
        }
        self.status[id.0] = ComponentStatus::Down;
        match self.kinds[id.0] {
            ComponentKind::Disk => self.failed_disks += 1,
            ComponentKind::Server => self.failed_servers += 1,
        }
        true
    }

    /// Mark a component repaired
    ///
    /// Returns `false` (and changes nothing) if it was already up.
    pub fn mark_up(&mut self, id: ComponentId) -> bool {
        if self.status[id.0] == ComponentStatus::Up {
            return false;
        }
        self.status[id.0] = ComponentStatus::Up;
        match self.kinds[id.0] {
            ComponentKind::Disk => self.failed_disks -= 1,
            ComponentKind::Server => self.failed_servers -= 1,
        }
        true
    }

    /// Open an outage at `time`; no-op if one is already open
    pub fn open_outage(&mut self, time: f64) {
        if self.outage_start.is_none() {
            self.outage_start = Some(time);
        }
    }

    /// Close the open outage at `time`, returning the closed interval
    pub fn close_outage(&mut self, time: f64) -> Option<OutageInterval> {
        self.outage_start
            .take()
            .map(|start| OutageInterval { start, end: time })
    }

    pub fn status(&self, id: ComponentId) -> ComponentStatus {
        self.status[id.0]
    }

    /// Total number of components currently down
    pub fn failed_count(&self) -> usize {
        self.failed_disks + self.failed_servers
    }

    pub fn failed_disks(&self) -> usize {
        self.failed_disks
    }

    pub fn failed_servers(&self) -> usize {
        self.failed_servers
    }

    pub fn total_disks(&self) -> usize {
        self.total_disks
    }

    pub fn num_components(&self) -> usize {
        self.status.len()
    }

    pub fn is_system_down(&self) -> bool {
        self.outage_start.is_some()
    }

    pub fn outage_start(&self) -> Option<f64> {
        self.outage_start
    }

    /// Ids of the components currently down, in id order
    pub fn failed_components(&self) -> Vec<ComponentId> {
        self.status
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == ComponentStatus::Down)
            .map(|(i, _)| ComponentId(i))
            .collect()
    }

    /// Recount from the status vector and compare with the cached counters
    pub fn invariants_hold(&self) -> bool {
        let down = self
            .status
            .iter()
            .filter(|s| **s == ComponentStatus::Down)
            .count();
        down == self.failed_count()
    }
}
