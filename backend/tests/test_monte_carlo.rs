//! Tests for MonteCarloAggregator and sweeps

use reliability_simulator_core_rs::models::{Component, ComponentId, ComponentKind};
use reliability_simulator_core_rs::{
    simulate_trial, CancellationToken, ConfigurationStatus, MonteCarloAggregator,
    RedundancyPolicy, RepairModel, RunResult, SimulationConfig, SimulationError, SlaTargets,
    SweepOptions, SystemModel, ValidationMode, WeibullLifetime,
};
use std::time::Duration;

fn disks(n: usize, shape: f64, scale: f64, repair_hours: f64) -> Vec<Component> {
    (0..n)
        .map(|i| Component {
            id: ComponentId(i),
            name: format!("D{}", i + 1),
            kind: ComponentKind::Disk,
            lifetime: WeibullLifetime { shape, scale },
            repair: RepairModel::Fixed {
                hours: repair_hours,
            },
            per_failure_cost: 300.0,
            downtime_loss_per_hour: 50.0,
        })
        .collect()
}

fn config(label: &str, level: u8, components: Vec<Component>, trials: usize) -> SimulationConfig {
    SimulationConfig {
        label: label.to_string(),
        redundancy_level: level,
        components,
        horizon_hours: 1000.0,
        trials,
        seed: 2024,
        sla: SlaTargets {
            availability_percent: 99.0,
            max_downtime_hours: 10.0,
        },
        downtime_loss_per_hour: None,
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn population_std(xs: &[f64]) -> f64 {
    let m = mean(xs);
    (xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64).sqrt()
}

#[test]
fn test_aggregate_matches_reference_formulas() {
    let cfg = config("raid1", 1, disks(2, 1.2, 150.0, 20.0), 200);
    let model = SystemModel::new(
        cfg.components.clone(),
        RedundancyPolicy::resolve(1, ValidationMode::Strict).unwrap().0,
        None,
    )
    .unwrap();

    let runs: Vec<RunResult> = (0..cfg.trials as u64)
        .map(|trial| simulate_trial(&model, cfg.horizon_hours, cfg.seed, trial).unwrap())
        .collect();

    let report = MonteCarloAggregator::default()
        .run_configuration(&cfg)
        .unwrap();
    let agg = report.result().unwrap();

    let downtime: Vec<f64> = runs.iter().map(|r| r.downtime_hours).collect();
    let availability: Vec<f64> = runs.iter().map(|r| r.availability_percent).collect();
    let failures: Vec<f64> = runs.iter().map(|r| r.failure_count as f64).collect();
    let cost: Vec<f64> = runs.iter().map(|r| r.repair_cost_total).collect();

    assert_eq!(agg.trials, 200);
    assert!((agg.downtime_hours.mean - mean(&downtime)).abs() < 1e-9);
    assert!((agg.downtime_hours.std_dev - population_std(&downtime)).abs() < 1e-9);
    assert!((agg.availability_percent.mean - mean(&availability)).abs() < 1e-9);
    assert!((agg.failure_count.mean - mean(&failures)).abs() < 1e-9);
    assert!((agg.repair_cost_total.std_dev - population_std(&cost)).abs() < 1e-6);

    let finite_mttf: Vec<f64> = runs
        .iter()
        .map(|r| r.mttf)
        .filter(|m| m.is_finite())
        .collect();
    assert_eq!(agg.failure_free_trials, runs.len() - finite_mttf.len());
    if !finite_mttf.is_empty() {
        assert!((agg.mttf.mean - mean(&finite_mttf)).abs() < 1e-9);
    }

    let expected_verdict = agg.availability_percent.mean >= 99.0 && agg.downtime_hours.mean <= 10.0;
    assert_eq!(agg.meets_sla, expected_verdict);
}

#[test]
fn test_availability_decreases_with_failure_scale() {
    let scales = [2000.0, 1000.0, 500.0, 250.0, 125.0];
    let configs: Vec<SimulationConfig> = scales
        .iter()
        .map(|scale| config(&format!("raid5-{}", scale), 5, disks(3, 1.5, *scale, 24.0), 500))
        .collect();

    let reports = MonteCarloAggregator::default().run_sweep(&configs).unwrap();
    let availability: Vec<f64> = reports
        .iter()
        .map(|r| r.result().unwrap().availability_percent.mean)
        .collect();

    for pair in availability.windows(2) {
        assert!(
            pair[0] > pair[1],
            "availability should drop as scale shrinks: {:?}",
            availability
        );
    }
}

#[test]
fn test_results_independent_of_thread_count() {
    let configs = vec![
        config("a", 5, disks(3, 1.5, 300.0, 24.0), 300),
        config("b", 0, disks(2, 1.1, 500.0, 8.0), 300),
    ];
    let with_threads = |threads| {
        MonteCarloAggregator::new(SweepOptions {
            threads: Some(threads),
            ..SweepOptions::default()
        })
        .run_sweep(&configs)
        .unwrap()
    };
    let single = with_threads(1);
    assert_eq!(single, with_threads(3));
    assert_eq!(single, with_threads(8));
}

#[test]
fn test_sweep_preserves_input_order() {
    let labels = ["zeta", "alpha", "mid"];
    let configs: Vec<_> = labels
        .iter()
        .map(|l| config(l, 1, disks(2, 1.0, 400.0, 5.0), 20))
        .collect();
    let reports = MonteCarloAggregator::default().run_sweep(&configs).unwrap();
    let got: Vec<&str> = reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(got, labels);
}

#[test]
fn test_invalid_configuration_does_not_stop_sweep() {
    let mut bad = config("bad", 0, disks(1, 1.0, 100.0, 2.0), 10);
    bad.components[0].lifetime.shape = -1.0;
    let configs = vec![bad, config("good", 0, disks(1, 1.0, 100.0, 2.0), 10)];

    let reports = MonteCarloAggregator::default().run_sweep(&configs).unwrap();
    assert!(matches!(
        reports[0].status,
        ConfigurationStatus::Failed(SimulationError::InvalidParameter { .. })
    ));
    assert!(reports[1].is_completed());
}

#[test]
fn test_strict_mode_rejects_unknown_level() {
    let cfg = config("raid3", 3, disks(3, 1.0, 100.0, 2.0), 10);

    let permissive = MonteCarloAggregator::default()
        .run_configuration(&cfg)
        .unwrap();
    assert!(permissive.is_completed());
    assert_eq!(permissive.warnings.len(), 1);

    let strict = MonteCarloAggregator::new(SweepOptions {
        validation: ValidationMode::Strict,
        ..SweepOptions::default()
    })
    .run_configuration(&cfg)
    .unwrap();
    assert!(matches!(
        strict.status,
        ConfigurationStatus::Failed(SimulationError::Configuration(_))
    ));
}

#[test]
fn test_zero_timeout_abandons_sweep() {
    let configs = vec![
        config("a", 5, disks(3, 1.5, 300.0, 24.0), 100),
        config("b", 5, disks(3, 1.5, 300.0, 24.0), 100),
    ];
    let reports = MonteCarloAggregator::new(SweepOptions {
        timeout: Some(Duration::ZERO),
        ..SweepOptions::default()
    })
    .run_sweep(&configs)
    .unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_abandoned()));
}

#[test]
fn test_timeout_keeps_completed_results() {
    let small = config("small", 5, disks(3, 1.5, 300.0, 24.0), 10);
    // Far more work than the deadline allows
    let huge = config("huge", 5, disks(8, 1.5, 50.0, 2.0), 20_000_000);
    let after = config("after", 0, disks(1, 1.0, 100.0, 2.0), 10);

    let reports = MonteCarloAggregator::new(SweepOptions {
        timeout: Some(Duration::from_millis(500)),
        ..SweepOptions::default()
    })
    .run_sweep(&[small.clone(), huge, after])
    .unwrap();

    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_completed());
    assert!(reports[1].is_abandoned());
    assert!(reports[2].is_abandoned());

    let alone = MonteCarloAggregator::default()
        .run_configuration(&small)
        .unwrap();
    assert_eq!(reports[0], alone);
}

#[test]
fn test_cancellation_token_is_shared() {
    let token = CancellationToken::new();
    let options = SweepOptions {
        cancellation: token.clone(),
        ..SweepOptions::default()
    };
    token.cancel();
    let reports = MonteCarloAggregator::new(options)
        .run_sweep(&[config("a", 0, disks(1, 1.0, 100.0, 2.0), 10)])
        .unwrap();
    assert!(reports[0].is_abandoned());
}

#[test]
fn test_aggregate_empty_is_configuration_error() {
    let err = MonteCarloAggregator::aggregate("none", &[], SlaTargets::default()).unwrap_err();
    assert!(matches!(err, SimulationError::Configuration(_)));
}
