//! Redundancy Policy Module
//!
//! Decides whether the storage system is up given how many of its components
//! are currently down. The decision is a pure function of the RAID level, the
//! size of the redundancy group and the failed count; see [`redundancy`] for
//! the level table.
//!
//! # Example
//!
//! ```rust
//! use reliability_simulator_core_rs::policy::{RedundancyLevel, RedundancyPolicy};
//! use reliability_simulator_core_rs::models::{ComponentId, ComponentKind, SystemState};
//!
//! let policy = RedundancyPolicy::new(RedundancyLevel::Raid5);
//! let mut state = SystemState::from_kinds(&[ComponentKind::Disk; 3]);
//!
//! state.mark_down(ComponentId(0));
//! assert!(policy.system_up(&state));
//!
//! state.mark_down(ComponentId(2));
//! assert!(!policy.system_up(&state));
//! ```

pub mod redundancy;

pub use redundancy::{decide, RedundancyLevel, RedundancyPolicy, ValidationMode};
