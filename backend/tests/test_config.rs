//! Tests for sweep files and fleet inventories

use reliability_simulator_core_rs::config::ConfigError;
use reliability_simulator_core_rs::{
    ComponentKind, ConfigurationStatus, FleetInventory, FleetOptions, MonteCarloAggregator,
    RepairModel, SimulationError, SimulationWarning, Sweep, SweepFile, SweepOptions,
    ValidationMode,
};
use std::io::Write;

const SWEEP_JSON: &str = r#"{
    "seed": 105,
    "currency": "PLN",
    "configurations": [
        {
            "label": "raid5-3",
            "redundancy_level": 5,
            "horizon_hours": 1000.0,
            "trials": 50,
            "sla": { "availability_percent": 99.0, "max_downtime_hours": 10.0 },
            "components": [
                { "name": "D", "kind": "disk", "count": 3,
                  "failure": { "shape": 1.5, "scale": 500.0 },
                  "repair": { "model": "fixed", "hours": 2.0 },
                  "per_failure_cost": 300.0, "downtime_loss_per_hour": 50.0 }
            ]
        },
        {
            "label": "raid4",
            "redundancy_level": 4,
            "horizon_hours": 1000.0,
            "trials": 50,
            "seed": 9,
            "downtime_loss_per_hour": 120.0,
            "sla": { "availability_percent": 95.0 },
            "components": [
                { "name": "D", "count": 4, "failure": { "shape": 1.2, "scale": 800.0 },
                  "repair": { "model": "exponential", "mean_hours": 6.0 } }
            ]
        }
    ]
}"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_sweep_from_disk() {
    let file = write_temp(SWEEP_JSON);
    let sweep = Sweep::load(file.path()).unwrap();

    assert_eq!(sweep.currency.as_deref(), Some("PLN"));
    assert_eq!(sweep.configurations.len(), 2);

    let raid4 = &sweep.configurations[1];
    assert_eq!(raid4.seed, 9);
    assert_eq!(raid4.downtime_loss_per_hour, Some(120.0));
    assert_eq!(raid4.components.len(), 4);
    assert_eq!(raid4.components[3].name, "D4");
    assert_eq!(
        raid4.components[0].repair,
        RepairModel::Exponential { mean_hours: 6.0 }
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Sweep::load("/nonexistent/sweep.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let file = write_temp("{ \"configurations\": [ ");
    assert!(matches!(
        SweepFile::load_from_path(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_validate_reports_permissive_warnings() {
    let sweep = SweepFile::from_json_str(SWEEP_JSON)
        .unwrap()
        .resolve()
        .unwrap();

    let warnings = sweep.validate(None).unwrap();
    assert_eq!(
        warnings,
        vec![(
            "raid4".to_string(),
            SimulationWarning::UnrecognizedRedundancyLevel { level: 4 }
        )]
    );

    match sweep.validate(Some(ValidationMode::Strict)) {
        Err(ConfigError::Simulation { label, source }) => {
            assert_eq!(label, "raid4");
            assert!(matches!(source, SimulationError::Configuration(_)));
        }
        other => panic!("expected a simulation error for raid4, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_duplicate_labels() {
    let json = SWEEP_JSON.replace("\"label\": \"raid4\"", "\"label\": \"raid5-3\"");
    let sweep = SweepFile::from_json_str(&json).unwrap().resolve().unwrap();
    assert!(matches!(sweep.validate(None), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_override_trials() {
    let mut file = SweepFile::from_json_str(SWEEP_JSON).unwrap();
    file.override_trials(7);
    let sweep = file.resolve().unwrap();
    assert!(sweep.configurations.iter().all(|c| c.trials == 7));
}

#[test]
fn test_sweep_file_runs_end_to_end() {
    let sweep = SweepFile::from_json_str(SWEEP_JSON)
        .unwrap()
        .resolve()
        .unwrap();
    let reports = MonteCarloAggregator::new(SweepOptions {
        validation: sweep.validation,
        ..SweepOptions::default()
    })
    .run_sweep(&sweep.configurations)
    .unwrap();

    assert_eq!(reports.len(), 2);
    for report in &reports {
        let result = report.result().unwrap();
        assert_eq!(result.trials, 50);
        assert_eq!(result.config_hash.len(), 64);
        assert!(result.availability_percent.mean <= 100.0);
    }
    assert_ne!(
        reports[0].result().unwrap().config_hash,
        reports[1].result().unwrap().config_hash
    );
}

#[test]
fn test_fleet_inventory_round_trip_through_sweep() {
    let inventory_json = r#"{
        "time_period_hours": 8760,
        "weibull_shape": 1.5,
        "currency": "PLN",
        "servers": [
            { "id": 1, "server_repair_cost_PLN": 2000, "raid_level": 1,
              "disks": [
                { "repair_cost_PLN": 300, "lost_revenue_per_hour_PLN": 50 },
                { "repair_cost_PLN": 300, "lost_revenue_per_hour_PLN": 50 }
              ] },
            { "id": 2, "server_repair_cost_PLN": 1800, "raid_level": 5,
              "disks": [
                { "repair_cost_PLN": 250, "lost_revenue_per_hour_PLN": 40 },
                { "repair_cost_PLN": 250, "lost_revenue_per_hour_PLN": 40 },
                { "repair_cost_PLN": 250, "lost_revenue_per_hour_PLN": 40 }
              ] }
        ]
    }"#;
    let file = write_temp(inventory_json);
    let inventory = FleetInventory::load_from_path(file.path()).unwrap();

    let options = FleetOptions {
        trials: 40,
        ..FleetOptions::default()
    };
    let sweep = inventory.to_sweep(&options).unwrap();
    assert!(sweep.validate(Some(ValidationMode::Strict)).unwrap().is_empty());

    let reports = MonteCarloAggregator::default()
        .run_sweep(&sweep.configurations)
        .unwrap();
    let labels: Vec<&str> = reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["S1", "S2"]);
    assert!(reports.iter().all(|r| r.is_completed()));

    let s1 = reports[0].result().unwrap();
    let rows: Vec<&str> = s1.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(rows, vec!["Server1", "S1D1", "S1D2"]);
    // A server outage is always a system outage
    assert_eq!(s1.components[0].kind, ComponentKind::Server);
    assert!(s1.components[0].downtime_hours.mean <= s1.downtime_hours.mean + 1e-9);

    let per_disk = inventory
        .to_sweep(&FleetOptions {
            per_disk: true,
            ..options
        })
        .unwrap();
    assert_eq!(per_disk.configurations.len(), 5);
}

#[test]
fn test_fleet_unknown_raid_level_under_strict_mode() {
    let inventory = FleetInventory::from_json_str(
        r#"{
            "time_period_hours": 1000,
            "weibull_shape": 1.5,
            "servers": [
                { "id": 7, "server_repair_cost_PLN": 100, "raid_level": 4,
                  "disks": [ { "repair_cost_PLN": 10, "lost_revenue_per_hour_PLN": 1 } ] }
            ]
        }"#,
    )
    .unwrap();
    let sweep = inventory
        .to_sweep(&FleetOptions {
            trials: 5,
            ..FleetOptions::default()
        })
        .unwrap();

    let permissive = MonteCarloAggregator::default()
        .run_sweep(&sweep.configurations)
        .unwrap();
    assert!(permissive[0].is_completed());
    assert_eq!(
        permissive[0].warnings,
        vec![SimulationWarning::UnrecognizedRedundancyLevel { level: 4 }]
    );

    let strict = MonteCarloAggregator::new(SweepOptions {
        validation: ValidationMode::Strict,
        ..SweepOptions::default()
    })
    .run_sweep(&sweep.configurations)
    .unwrap();
    assert!(matches!(
        strict[0].status,
        ConfigurationStatus::Failed(SimulationError::Configuration(_))
    ));
}
