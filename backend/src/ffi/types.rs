//! Conversions from Rust results to Python dicts

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::ComponentKind;
use crate::montecarlo::{
    AggregatedResult, ComponentSummary, ConfigurationReport, ConfigurationStatus, MetricSummary,
};

fn summary_to_py<'py>(py: Python<'py>, summary: &MetricSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("mean", summary.mean)?;
    dict.set_item("std", summary.std_dev)?;
    Ok(dict)
}

fn component_to_py<'py>(
    py: Python<'py>,
    component: &ComponentSummary,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("name", &component.name)?;
    dict.set_item(
        "kind",
        match component.kind {
            ComponentKind::Disk => "disk",
            ComponentKind::Server => "server",
        },
    )?;
    dict.set_item("failure_free_trials", component.failure_free_trials)?;
    dict.set_item("downtime_hours", summary_to_py(py, &component.downtime_hours)?)?;
    dict.set_item("failure_count", summary_to_py(py, &component.failure_count)?)?;
    dict.set_item("repair_cost_total", summary_to_py(py, &component.repair_cost_total)?)?;
    dict.set_item("lost_revenue_total", summary_to_py(py, &component.lost_revenue_total)?)?;
    dict.set_item("mttr", summary_to_py(py, &component.mttr)?)?;
    dict.set_item("mttf", summary_to_py(py, &component.mttf)?)?;
    dict.set_item(
        "availability_percent",
        summary_to_py(py, &component.availability_percent)?,
    )?;
    Ok(dict)
}

/// Convert AggregatedResult to Python dict
pub fn aggregated_to_py<'py>(
    py: Python<'py>,
    result: &AggregatedResult,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);

    dict.set_item("configuration", &result.configuration_label)?;
    dict.set_item("trials", result.trials)?;
    dict.set_item("failure_free_trials", result.failure_free_trials)?;

    dict.set_item("downtime_hours", summary_to_py(py, &result.downtime_hours)?)?;
    dict.set_item("failure_count", summary_to_py(py, &result.failure_count)?)?;
    dict.set_item("repair_cost_total", summary_to_py(py, &result.repair_cost_total)?)?;
    dict.set_item("lost_revenue_total", summary_to_py(py, &result.lost_revenue_total)?)?;
    dict.set_item("mttr", summary_to_py(py, &result.mttr)?)?;
    dict.set_item("mttf", summary_to_py(py, &result.mttf)?)?;
    dict.set_item(
        "availability_percent",
        summary_to_py(py, &result.availability_percent)?,
    )?;

    dict.set_item("meets_sla", result.meets_sla)?;
    dict.set_item("config_hash", &result.config_hash)?;

    let components = PyList::empty_bound(py);
    for component in &result.components {
        components.append(component_to_py(py, component)?)?;
    }
    dict.set_item("components", components)?;

    Ok(dict)
}

/// Convert one sweep report to a Python dict
///
/// Always carries `configuration`, `status` and `warnings`; completed
/// configurations add `result`, failed ones add `error`.
pub fn report_to_py<'py>(
    py: Python<'py>,
    report: &ConfigurationReport,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("configuration", &report.label)?;

    let warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();
    dict.set_item("warnings", warnings)?;

    match &report.status {
        ConfigurationStatus::Completed(result) => {
            dict.set_item("status", "completed")?;
            dict.set_item("result", aggregated_to_py(py, result)?)?;
        }
        ConfigurationStatus::Failed(err) => {
            dict.set_item("status", "failed")?;
            dict.set_item("error", err.to_string())?;
        }
        ConfigurationStatus::Abandoned => {
            dict.set_item("status", "abandoned")?;
        }
    }

    Ok(dict)
}
