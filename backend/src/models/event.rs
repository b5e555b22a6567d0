//! Event logging for trial replay and auditing.
//!
//! The [`Event`] enum captures every state change a trial goes through.
//! Recording is optional (sweeps leave it off); when enabled the log lets
//! tests and tools compare two runs event by event.
//!
//! # Event Types
//!
//! - **ComponentFailed / ComponentRepaired**: a component changed status
//! - **RepairScheduled**: repair completion time, noting horizon clipping
//! - **OutageOpened / OutageClosed**: the system changed status
//!
//! # Example
//!
//! ```rust
//! use reliability_simulator_core_rs::models::{ComponentId, Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::ComponentFailed { time: 12.0, component: ComponentId(0), failed_count: 1 });
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.events()[0].event_type(), "ComponentFailed");
//! ```

use crate::models::component::ComponentId;
use serde::{Deserialize, Serialize};

/// Trial event capturing a state change.
///
/// Events are logged in the order they are processed, which is
/// non-decreasing in `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A component failed; `failed_count` is the count after the failure
    ComponentFailed {
        time: f64,
        component: ComponentId,
        failed_count: usize,
    },

    /// A repair was scheduled to complete at `completes_at`
    RepairScheduled {
        time: f64,
        component: ComponentId,
        completes_at: f64,
        /// Completion was pulled back to the horizon
        clipped: bool,
    },

    /// A component came back; `failed_count` is the count after the repair
    ComponentRepaired {
        time: f64,
        component: ComponentId,
        failed_count: usize,
    },

    /// The system went down
    OutageOpened { time: f64, failed_count: usize },

    /// The system came back up (or the horizon closed the outage)
    OutageClosed { time: f64, started_at: f64 },
}

impl Event {
    pub fn time(&self) -> f64 {
        match self {
            Event::ComponentFailed { time, .. } => *time,
            Event::RepairScheduled { time, .. } => *time,
            Event::ComponentRepaired { time, .. } => *time,
            Event::OutageOpened { time, .. } => *time,
            Event::OutageClosed { time, .. } => *time,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ComponentFailed { .. } => "ComponentFailed",
            Event::RepairScheduled { .. } => "RepairScheduled",
            Event::ComponentRepaired { .. } => "ComponentRepaired",
            Event::OutageOpened { .. } => "OutageOpened",
            Event::OutageClosed { .. } => "OutageClosed",
        }
    }

    pub fn component(&self) -> Option<ComponentId> {
        match self {
            Event::ComponentFailed { component, .. } => Some(*component),
            Event::RepairScheduled { component, .. } => Some(*component),
            Event::ComponentRepaired { component, .. } => Some(*component),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_component(&self, component: ComponentId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.component() == Some(component))
            .collect()
    }
}
