//! Scheduled event types for the failure/repair timeline
//!
//! # Design Principles
//!
//! 1. **Determinism**: Events at the same timestamp are ordered by insertion
//! 2. **Self-contained**: An event names its component and nothing else
//! 3. **Trial-local**: Events are created and consumed within one trial

use crate::models::ComponentId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// What happens to the component when the event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Component stops working
    Failure,
    /// Component finishes repair and is back in service
    Repair,
}

/// An event waiting in the queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Simulated time at which the event fires (>= 0)
    pub time: f64,
    pub kind: EventKind,
    pub component: ComponentId,
    /// Insertion sequence number, assigned by the queue
    pub seq: u64,
}

impl ScheduledEvent {
    /// Queue ordering key: time first, then insertion order
    pub(crate) fn order_key(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}
