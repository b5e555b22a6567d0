//! Property tests over randomly generated systems
//!
//! For any valid system and seed:
//! - outage intervals are ordered, disjoint and inside `[0, horizon]`
//! - downtime equals the summed intervals and never exceeds the horizon
//! - availability stays within `[0, 100]`
//! - the same seed reproduces the same trial

use proptest::prelude::*;
use reliability_simulator_core_rs::models::{Component, ComponentId, ComponentKind};
use reliability_simulator_core_rs::{
    RedundancyLevel, RedundancyPolicy, RepairModel, SingleRunSimulator, SystemModel,
    VariateSource, WeibullLifetime,
};

fn repair_strategy() -> impl Strategy<Value = RepairModel> {
    prop_oneof![
        (0.0..50.0f64).prop_map(|hours| RepairModel::Fixed { hours }),
        (0.1..10.0f64, 0.0..20.0f64).prop_map(|(min_hours, extra)| RepairModel::Uniform {
            min_hours,
            max_hours: min_hours + extra,
        }),
        (0.5..3.0f64, 0.5..30.0f64)
            .prop_map(|(shape, scale)| RepairModel::Weibull { shape, scale }),
        (0.5..30.0f64).prop_map(|mean_hours| RepairModel::Exponential { mean_hours }),
    ]
}

fn component_strategy() -> impl Strategy<Value = (bool, f64, f64, RepairModel)> {
    (
        prop::bool::weighted(0.2),
        0.3..4.0f64,
        1.0..2000.0f64,
        repair_strategy(),
    )
}

fn system_strategy() -> impl Strategy<Value = (Vec<Component>, u8)> {
    (
        prop::collection::vec(component_strategy(), 1..8),
        prop::sample::select(vec![0u8, 1, 5, 6, 3]),
    )
        .prop_map(|(specs, level)| {
            let mut components: Vec<Component> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (is_server, shape, scale, repair))| Component {
                    id: ComponentId(i),
                    name: format!("C{}", i),
                    kind: if is_server {
                        ComponentKind::Server
                    } else {
                        ComponentKind::Disk
                    },
                    lifetime: WeibullLifetime { shape, scale },
                    repair,
                    per_failure_cost: 10.0,
                    downtime_loss_per_hour: 1.0,
                })
                .collect();
            // At least one disk behind the policy
            components[0].kind = ComponentKind::Disk;
            (components, level)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_outages_stay_inside_horizon(
        (components, level) in system_strategy(),
        horizon in 1.0..5000.0f64,
        seed in any::<u64>(),
    ) {
        let model = SystemModel::new(
            components,
            RedundancyPolicy::new(RedundancyLevel::from_level(level)),
            None,
        ).unwrap();
        let outcome = SingleRunSimulator::new(&model, horizon, VariateSource::new(seed))
            .unwrap()
            .run()
            .unwrap();

        let mut previous_end = 0.0;
        let mut total = 0.0;
        for interval in &outcome.outages {
            prop_assert!(interval.start >= previous_end);
            prop_assert!(interval.start <= interval.end);
            prop_assert!(interval.end <= horizon);
            previous_end = interval.end;
            total += interval.duration();
        }

        let r = outcome.result;
        prop_assert!(r.downtime_hours <= horizon);
        prop_assert!((r.downtime_hours - total.min(horizon)).abs() < 1e-6);
        prop_assert!((0.0..=100.0).contains(&r.availability_percent));
        prop_assert!(!r.mttf.is_nan());
        prop_assert!(!r.mttr.is_nan());
        if r.failure_count == 0 {
            prop_assert_eq!(r.downtime_hours, 0.0);
        }
    }

    #[test]
    fn prop_same_seed_same_trial(
        (components, level) in system_strategy(),
        seed in any::<u64>(),
        trial in 0u64..1000,
    ) {
        let model = SystemModel::new(
            components,
            RedundancyPolicy::new(RedundancyLevel::from_level(level)),
            None,
        ).unwrap();
        let run = || {
            SingleRunSimulator::new(&model, 1000.0, VariateSource::for_trial(seed, trial))
                .unwrap()
                .with_event_log()
                .run()
                .unwrap()
        };
        let a = run();
        let b = run();
        prop_assert_eq!(a.result, b.result);
        prop_assert_eq!(a.event_log, b.event_log);
    }

    #[test]
    fn prop_state_counters_consistent(
        (components, level) in system_strategy(),
        seed in any::<u64>(),
    ) {
        let model = SystemModel::new(
            components,
            RedundancyPolicy::new(RedundancyLevel::from_level(level)),
            None,
        ).unwrap();
        let mut sim = SingleRunSimulator::new(&model, 2000.0, VariateSource::new(seed)).unwrap();
        let mut last = 0.0;
        while let Some(event) = sim.step().unwrap() {
            prop_assert!(event.time >= last);
            last = event.time;
            prop_assert!(sim.state().invariants_hold());
            let up = model.policy().system_up(sim.state());
            prop_assert_eq!(up, !sim.state().is_system_down());
        }
    }
}
