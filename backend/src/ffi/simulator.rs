//! PyO3 wrapper for sweeps
//!
//! # Example (from Python)
//!
//! ```python
//! from reliability_simulator_core_rs import Simulator
//!
//! sim = Simulator.from_json(open("sweep.json").read())
//! for report in sim.run(threads=4):
//!     print(report["configuration"], report["status"])
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::time::Duration;

use super::types::report_to_py;
use crate::config::{Sweep, SweepFile};
use crate::montecarlo::{ConfigurationReport, MonteCarloAggregator, SweepOptions};

/// Python wrapper for a resolved sweep
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    sweep: Sweep,
}

#[pymethods]
impl PySimulator {
    /// Parse and resolve a sweep document
    ///
    /// Raises ValueError for malformed JSON or invalid configurations.
    #[staticmethod]
    fn from_json(config_json: &str) -> PyResult<Self> {
        let sweep = SweepFile::from_json_str(config_json)
            .and_then(|file| file.resolve())
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PySimulator { sweep })
    }

    /// Configuration labels, in run order
    fn labels(&self) -> Vec<String> {
        self.sweep
            .configurations
            .iter()
            .map(|c| c.label.clone())
            .collect()
    }

    /// Currency label of the sweep, if any
    #[getter]
    fn currency(&self) -> Option<String> {
        self.sweep.currency.clone()
    }

    /// Run every configuration and return one dict per configuration
    #[pyo3(signature = (threads=None, timeout_secs=None))]
    fn run<'py>(
        &self,
        py: Python<'py>,
        threads: Option<usize>,
        timeout_secs: Option<f64>,
    ) -> PyResult<Bound<'py, PyList>> {
        let options = SweepOptions {
            validation: self.sweep.validation,
            threads,
            timeout: timeout_secs.map(Duration::from_secs_f64),
            ..SweepOptions::default()
        };
        let reports = py.allow_threads(|| run_reports(&self.sweep, options))?;
        reports_to_list(py, &reports)
    }
}

fn run_reports(sweep: &Sweep, options: SweepOptions) -> PyResult<Vec<ConfigurationReport>> {
    MonteCarloAggregator::new(options)
        .run_sweep(&sweep.configurations)
        .map_err(|e| PyRuntimeError::new_err(format!("Sweep failed: {}", e)))
}

fn reports_to_list<'py>(
    py: Python<'py>,
    reports: &[ConfigurationReport],
) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty_bound(py);
    for report in reports {
        list.append(report_to_py(py, report)?)?;
    }
    Ok(list)
}

/// Run a sweep document in one call
#[pyfunction]
pub fn run_sweep<'py>(py: Python<'py>, config_json: &str) -> PyResult<Bound<'py, PyList>> {
    let sim = PySimulator::from_json(config_json)?;
    sim.run(py, None, None)
}
