//! Time management for a trial

pub mod clock;
