//! Domain models for the reliability simulator

pub mod component;
pub mod event;
pub mod state;

// Re-exports
pub use component::{Component, ComponentId, ComponentKind};
pub use event::{Event, EventLog};
pub use state::{ComponentStatus, OutageInterval, SystemState};
