//! Result rendering: terminal table, CSV and JSON exports

use reliability_simulator_core_rs::{
    AggregatedResult, ComponentKind, ComponentSummary, ConfigurationReport, ConfigurationStatus,
    MetricSummary,
};
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Metric columns in export order
const METRICS: [&str; 7] = [
    "downtime_hours",
    "failure_count",
    "repair_cost_total",
    "lost_revenue_total",
    "mttr",
    "mttf",
    "availability_percent",
];

/// Name of the CSV `component` cell for the whole-system row
const SYSTEM_ROW: &str = "system";

fn system_metrics(r: &AggregatedResult) -> [&MetricSummary; 7] {
    [
        &r.downtime_hours,
        &r.failure_count,
        &r.repair_cost_total,
        &r.lost_revenue_total,
        &r.mttr,
        &r.mttf,
        &r.availability_percent,
    ]
}

fn component_metrics(c: &ComponentSummary) -> [&MetricSummary; 7] {
    [
        &c.downtime_hours,
        &c.failure_count,
        &c.repair_cost_total,
        &c.lost_revenue_total,
        &c.mttr,
        &c.mttf,
        &c.availability_percent,
    ]
}

fn kind_name(kind: ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Disk => "disk",
        ComponentKind::Server => "server",
    }
}

fn format_mtbf(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        "inf".to_string()
    }
}

fn status_name(status: &ConfigurationStatus) -> &'static str {
    match status {
        ConfigurationStatus::Completed(_) => "completed",
        ConfigurationStatus::Failed(_) => "failed",
        ConfigurationStatus::Abandoned => "abandoned",
    }
}

fn format_number(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.6}", value)
    }
}

// ============================================================================
// Summary table
// ============================================================================

pub fn summary_table(reports: &[ConfigurationReport], currency: Option<&str>) -> String {
    let money = currency.unwrap_or("");
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>12} {:>10} {:>14} {:>10} {:>12} {:>8}",
        "configuration",
        "trials",
        "avail %",
        "downtime h",
        format!("repair {}", money).trim_end(),
        "MTTR h",
        "MTBF h",
        "SLA"
    );

    for report in reports {
        match &report.status {
            ConfigurationStatus::Completed(r) => {
                let _ = writeln!(
                    out,
                    "{:<20} {:>8} {:>12.4} {:>10.2} {:>14.2} {:>10.2} {:>12} {:>8}",
                    report.label,
                    r.trials,
                    r.availability_percent.mean,
                    r.downtime_hours.mean,
                    r.repair_cost_total.mean,
                    r.mttr.mean,
                    format_mtbf(r.mttf.mean),
                    if r.meets_sla { "PASS" } else { "FAIL" }
                );
                for c in &r.components {
                    let _ = writeln!(
                        out,
                        "  {:<18} {:>8} {:>12.4} {:>10.2} {:>14.2} {:>10.2} {:>12}",
                        c.name,
                        "",
                        c.availability_percent.mean,
                        c.downtime_hours.mean,
                        c.repair_cost_total.mean,
                        c.mttr.mean,
                        format_mtbf(c.mttf.mean),
                    );
                }
            }
            ConfigurationStatus::Failed(err) => {
                let _ = writeln!(out, "{:<20} failed: {}", report.label, err);
            }
            ConfigurationStatus::Abandoned => {
                let _ = writeln!(out, "{:<20} abandoned", report.label);
            }
        }
    }
    out
}

// ============================================================================
// CSV
// ============================================================================

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn csv_header() -> String {
    let mut columns = vec![
        "configuration".to_string(),
        "component".to_string(),
        "status".to_string(),
        "trials".to_string(),
        "failure_free_trials".to_string(),
    ];
    for name in METRICS {
        columns.push(format!("{}_mean", name));
        columns.push(format!("{}_std", name));
    }
    columns.extend(
        ["meets_sla", "currency", "config_hash"]
            .iter()
            .map(|s| s.to_string()),
    );
    columns.join(",")
}

fn push_metrics(fields: &mut Vec<String>, metrics: [&MetricSummary; 7]) {
    for summary in metrics {
        fields.push(format_number(summary.mean));
        fields.push(format_number(summary.std_dev));
    }
}

/// The whole-system row of a configuration
pub fn csv_row(report: &ConfigurationReport, currency: Option<&str>) -> String {
    let mut fields = vec![
        csv_field(&report.label),
        SYSTEM_ROW.to_string(),
        status_name(&report.status).to_string(),
    ];
    match report.result() {
        Some(result) => {
            fields.push(result.trials.to_string());
            fields.push(result.failure_free_trials.to_string());
            push_metrics(&mut fields, system_metrics(result));
            fields.push(result.meets_sla.to_string());
            fields.push(csv_field(currency.unwrap_or("")));
            fields.push(result.config_hash.clone());
        }
        None => {
            fields.extend(std::iter::repeat(String::new()).take(2 + 2 * METRICS.len() + 1));
            fields.push(csv_field(currency.unwrap_or("")));
            fields.push(String::new());
        }
    }
    fields.join(",")
}

/// One row per component of a completed configuration; the SLA cell stays
/// empty since the verdict applies to the system only
pub fn csv_component_rows(report: &ConfigurationReport, currency: Option<&str>) -> Vec<String> {
    let Some(result) = report.result() else {
        return Vec::new();
    };
    result
        .components
        .iter()
        .map(|c| {
            let mut fields = vec![
                csv_field(&report.label),
                csv_field(&c.name),
                status_name(&report.status).to_string(),
                result.trials.to_string(),
                c.failure_free_trials.to_string(),
            ];
            push_metrics(&mut fields, component_metrics(c));
            fields.push(String::new());
            fields.push(csv_field(currency.unwrap_or("")));
            fields.push(result.config_hash.clone());
            fields.join(",")
        })
        .collect()
}

pub fn write_csv(
    path: &Path,
    reports: &[ConfigurationReport],
    currency: Option<&str>,
) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "{}", csv_header())?;
    for report in reports {
        writeln!(file, "{}", csv_row(report, currency))?;
        for row in csv_component_rows(report, currency) {
            writeln!(file, "{}", row)?;
        }
    }
    file.flush()
}

// ============================================================================
// JSON
// ============================================================================

fn summary_json(summary: &MetricSummary) -> Value {
    // JSON has no infinity; an MTBF with no failures is reported as null
    let number = |v: f64| if v.is_finite() { json!(v) } else { Value::Null };
    json!({ "mean": number(summary.mean), "std": number(summary.std_dev) })
}

fn metrics_json(metrics: [&MetricSummary; 7]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, summary) in METRICS.iter().zip(metrics) {
        map.insert(name.to_string(), summary_json(summary));
    }
    Value::Object(map)
}

fn component_json(c: &ComponentSummary) -> Value {
    json!({
        "name": c.name,
        "kind": kind_name(c.kind),
        "failure_free_trials": c.failure_free_trials,
        "metrics": metrics_json(component_metrics(c)),
    })
}

pub fn report_json(report: &ConfigurationReport) -> Value {
    let mut value = json!({
        "configuration": report.label,
        "status": status_name(&report.status),
        "warnings": report.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
    });
    match &report.status {
        ConfigurationStatus::Completed(result) => {
            value["trials"] = json!(result.trials);
            value["failure_free_trials"] = json!(result.failure_free_trials);
            value["metrics"] = metrics_json(system_metrics(result));
            value["components"] =
                Value::Array(result.components.iter().map(component_json).collect());
            value["meets_sla"] = json!(result.meets_sla);
            value["config_hash"] = json!(result.config_hash);
        }
        ConfigurationStatus::Failed(err) => {
            value["error"] = json!(err.to_string());
        }
        ConfigurationStatus::Abandoned => {}
    }
    value
}

pub fn write_json(
    path: &Path,
    reports: &[ConfigurationReport],
    currency: Option<&str>,
) -> std::io::Result<()> {
    let document = json!({
        "currency": currency,
        "configurations": reports.iter().map(report_json).collect::<Vec<_>>(),
    });
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(file, &document)?;
    Ok(())
}
