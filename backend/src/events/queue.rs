//! Time-ordered event queue
//!
//! Binary min-heap keyed by `(time, seq)`. The sequence number is assigned on
//! push and grows monotonically, so events sharing a timestamp (repairs
//! clipped to the horizon, for instance) come out in the order they were
//! scheduled.

use crate::error::SimulationError;
use crate::events::types::{EventKind, ScheduledEvent};
use crate::models::ComponentId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry with the ordering reversed so `BinaryHeap` pops the minimum.
#[derive(Debug, Clone, Copy)]
struct MinEntry(ScheduledEvent);

impl PartialEq for MinEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinEntry {}

impl PartialOrd for MinEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.order_key(&self.0)
    }
}

/// Min-priority queue of scheduled failure/repair events
///
/// # Example
/// ```
/// use reliability_simulator_core_rs::events::{EventKind, EventQueue};
/// use reliability_simulator_core_rs::models::ComponentId;
///
/// let mut queue = EventQueue::new();
/// queue.push(5.0, EventKind::Failure, ComponentId(0));
/// queue.push(1.0, EventKind::Failure, ComponentId(1));
///
/// assert_eq!(queue.peek_min_time(), Some(1.0));
/// let first = queue.pop_min().unwrap();
/// assert_eq!(first.component, ComponentId(1));
/// ```
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<MinEntry>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event; returns the stored event with its sequence number
    pub fn push(&mut self, time: f64, kind: EventKind, component: ComponentId) -> ScheduledEvent {
        let event = ScheduledEvent {
            time,
            kind,
            component,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(MinEntry(event));
        event
    }

    /// Remove and return the earliest event
    ///
    /// # Errors
    /// `EmptyQueue` if nothing is scheduled.
    pub fn pop_min(&mut self) -> Result<ScheduledEvent, SimulationError> {
        self.heap
            .pop()
            .map(|entry| entry.0)
            .ok_or(SimulationError::EmptyQueue)
    }

    /// Time of the earliest event without removing it
    pub fn peek_min_time(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.0.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
