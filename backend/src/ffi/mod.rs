//! Python bindings (feature `pyo3`)
//!
//! Minimal surface: load a sweep from JSON, run it with the GIL released,
//! get one dict per configuration back.

pub mod simulator;
pub mod types;

pub use simulator::{run_sweep, PySimulator};
