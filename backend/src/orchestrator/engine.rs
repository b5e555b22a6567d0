//! Single-Run Engine
//!
//! Drives one randomized failure/repair trial from time 0 to the horizon.
//!
//! # Architecture
//!
//! ```text
//! start:
//!   all components up, schedule each first failure (if within horizon)
//! while next event time <= horizon:
//!   1. Pop earliest event, advance clock (monotonic)
//!   2. Failure: mark down, charge repair cost, evaluate policy,
//!      open outage on up -> down, schedule repair (clipped to horizon)
//!   3. Repair: mark up, evaluate policy, close outage on down -> up,
//!      schedule next failure if within horizon
//! finish:
//!   close any open outage at the horizon, compute metrics
//! ```
//!
//! Each component also keeps its own ledger of down time and failures,
//! independent of whether the system went down with it.
//!
//! # Example
//!
//! ```rust
//! use reliability_simulator_core_rs::distributions::{RepairModel, VariateSource, WeibullLifetime};
//! use reliability_simulator_core_rs::models::{Component, ComponentId, ComponentKind};
//! use reliability_simulator_core_rs::orchestrator::{SingleRunSimulator, SystemModel};
//! use reliability_simulator_core_rs::policy::{RedundancyLevel, RedundancyPolicy};
//!
//! let disk = Component {
//!     id: ComponentId(0),
//!     name: "D1".to_string(),
//!     kind: ComponentKind::Disk,
//!     lifetime: WeibullLifetime { shape: 1.5, scale: 50.0 },
//!     repair: RepairModel::Fixed { hours: 2.0 },
//!     per_failure_cost: 100.0,
//!     downtime_loss_per_hour: 10.0,
//! };
//! let policy = RedundancyPolicy::new(RedundancyLevel::Raid0);
//! let model = SystemModel::new(vec![disk], policy, None).unwrap();
//!
//! let sim = SingleRunSimulator::new(&model, 100.0, VariateSource::new(42)).unwrap();
//! let outcome = sim.run().unwrap();
//! assert!(outcome.result.availability_percent <= 100.0);
//! ```

use crate::core::clock::SimClock;
use crate::distributions::VariateSource;
use crate::error::{require_non_negative, SimulationError};
use crate::events::{EventKind, EventQueue, ScheduledEvent};
use crate::models::{Component, ComponentId, Event, EventLog, OutageInterval, SystemState};
use crate::policy::RedundancyPolicy;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ============================================================================
// System Model
// ============================================================================

/// Validated set of components plus the redundancy rule they run under
///
/// Immutable and shared (by reference) across every trial of a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemModel {
    components: Vec<Component>,
    policy: RedundancyPolicy,
    /// Revenue lost per hour of system outage
    downtime_loss_per_hour: f64,
}

impl SystemModel {
    /// Build a model, validating every component
    ///
    /// The outage loss rate is `loss_override` when given, otherwise the sum
    /// of every component's `downtime_loss_per_hour`.
    ///
    /// # Errors
    /// * `Configuration` - no components, no disks, or ids not matching positions
    /// * `InvalidParameter` - any component or the override is out of range
    pub fn new(
        components: Vec<Component>,
        policy: RedundancyPolicy,
        loss_override: Option<f64>,
    ) -> Result<Self, SimulationError> {
        if components.is_empty() {
            return Err(SimulationError::Configuration(
                "Must have at least one component".to_string(),
            ));
        }

        if !components.iter().any(Component::is_disk) {
            return Err(SimulationError::Configuration(
                "Must have at least one disk behind the redundancy policy".to_string(),
            ));
        }

        for (index, component) in components.iter().enumerate() {
            if component.id != ComponentId(index) {
                return Err(SimulationError::Configuration(format!(
                    "Component {} has id {} but sits at position {}",
                    component.name, component.id, index
                )));
            }
            component.validate()?;
        }

        let downtime_loss_per_hour = match loss_override {
            Some(rate) => require_non_negative("downtime_loss_per_hour", rate)?,
            None => components.iter().map(|c| c.downtime_loss_per_hour).sum(),
        };

        Ok(Self {
            components,
            policy,
            downtime_loss_per_hour,
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0]
    }

    pub fn policy(&self) -> RedundancyPolicy {
        self.policy
    }

    pub fn downtime_loss_per_hour(&self) -> f64 {
        self.downtime_loss_per_hour
    }
}

// ============================================================================
// Results
// ============================================================================

/// Metrics of one completed trial
///
/// Used both for the whole system and for a single component; for a
/// component, downtime is the time that component itself was down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Total system outage time within the horizon
    pub downtime_hours: f64,

    /// Number of component failures
    pub failure_count: u64,

    /// Sum of per-failure costs
    pub repair_cost_total: f64,

    /// Outage time multiplied by the system loss rate
    pub lost_revenue_total: f64,

    /// Downtime per failure; 0 when nothing failed
    pub mttr: f64,

    /// Uptime per failure (MTBF); +inf when nothing failed
    pub mttf: f64,

    /// Share of the horizon the system was up, in percent
    pub availability_percent: f64,
}

impl RunResult {
    /// Result of a trial over an empty window
    pub fn empty() -> Self {
        Self {
            downtime_hours: 0.0,
            failure_count: 0,
            repair_cost_total: 0.0,
            lost_revenue_total: 0.0,
            mttr: 0.0,
            mttf: f64::INFINITY,
            availability_percent: 100.0,
        }
    }

    /// Derive MTTR, MTBF and availability from raw totals
    fn from_totals(
        horizon: f64,
        downtime: f64,
        failures: u64,
        repair_cost: f64,
        lost_revenue: f64,
    ) -> Self {
        if horizon <= 0.0 {
            return Self::empty();
        }

        // Disjoint intervals inside [0, horizon]; the clamp only absorbs rounding.
        let downtime = downtime.clamp(0.0, horizon);
        let (mttr, mttf) = if failures > 0 {
            let n = failures as f64;
            (downtime / n, (horizon - downtime) / n)
        } else {
            (0.0, f64::INFINITY)
        };

        Self {
            downtime_hours: downtime,
            failure_count: failures,
            repair_cost_total: repair_cost,
            lost_revenue_total: lost_revenue,
            mttr,
            mttf,
            availability_percent: ((1.0 - downtime / horizon) * 100.0).clamp(0.0, 100.0),
        }
    }
}

/// Everything a trial produced
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub result: RunResult,
    /// One result per component, indexed by component id
    pub components: Vec<RunResult>,
    /// Closed outages in chronological order
    pub outages: Vec<OutageInterval>,
    /// Present when event recording was enabled
    pub event_log: Option<EventLog>,
}

/// Lifecycle of a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Running,
    Completed,
}

/// Running totals for the trial
#[derive(Debug, Clone, Default)]
struct TrialAccumulator {
    downtime: f64,
    failures: u64,
    repair_cost: f64,
    lost_revenue: f64,
}

/// Running totals for one component
#[derive(Debug, Clone, Default)]
struct ComponentLedger {
    down_since: Option<f64>,
    downtime: f64,
    failures: u64,
    repair_cost: f64,
}

impl ComponentLedger {
    fn close(&mut self, time: f64) {
        if let Some(since) = self.down_since.take() {
            self.downtime += time - since;
        }
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// One trial's private state machine
///
/// Owns its event queue, system state and random stream; shares only the
/// immutable [`SystemModel`].
pub struct SingleRunSimulator<'m> {
    model: &'m SystemModel,
    state: SystemState,
    queue: EventQueue,
    clock: SimClock,
    source: VariateSource,
    phase: RunPhase,
    totals: TrialAccumulator,
    ledgers: Vec<ComponentLedger>,
    outages: Vec<OutageInterval>,
    event_log: Option<EventLog>,
}

impl<'m> SingleRunSimulator<'m> {
    /// Create a trial over `[0, horizon]`
    ///
    /// # Errors
    /// `InvalidParameter` if the horizon is negative or not finite.
    pub fn new(
        model: &'m SystemModel,
        horizon: f64,
        source: VariateSource,
    ) -> Result<Self, SimulationError> {
        require_non_negative("horizon_hours", horizon)?;

        Ok(Self {
            model,
            state: SystemState::new(model.components()),
            queue: EventQueue::new(),
            clock: SimClock::new(horizon),
            source,
            phase: RunPhase::NotStarted,
            totals: TrialAccumulator::default(),
            ledgers: vec![ComponentLedger::default(); model.components().len()],
            outages: Vec::new(),
            event_log: None,
        })
    }

    /// Record every state change into an [`EventLog`]
    pub fn with_event_log(mut self) -> Self {
        self.event_log = Some(EventLog::new());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn horizon(&self) -> f64 {
        self.clock.horizon()
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn outages(&self) -> &[OutageInterval] {
        &self.outages
    }

    pub fn event_log(&self) -> Option<&EventLog> {
        self.event_log.as_ref()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Metrics, available once the trial has completed
    pub fn result(&self) -> Option<RunResult> {
        (self.phase == RunPhase::Completed).then(|| self.compute_result())
    }

    /// Per-component metrics, indexed by component id, once completed
    pub fn component_results(&self) -> Option<Vec<RunResult>> {
        (self.phase == RunPhase::Completed).then(|| self.compute_component_results())
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Process one event
    ///
    /// Returns the processed event, or `None` once the trial has completed.
    /// The first call schedules the initial failures.
    pub fn step(&mut self) -> Result<Option<ScheduledEvent>, SimulationError> {
        match self.phase {
            RunPhase::NotStarted => self.start(),
            RunPhase::Running => {}
            RunPhase::Completed => return Ok(None),
        }

        let due = match self.queue.peek_min_time() {
            Some(time) => self.clock.within_horizon(time),
            None => false,
        };
        if !due {
            self.finish();
            return Ok(None);
        }

        let event = self.queue.pop_min()?;
        self.clock.advance_to(event.time)?;
        trace!(
            time = event.time,
            kind = ?event.kind,
            component = event.component.0,
            "processing event"
        );

        match event.kind {
            EventKind::Failure => self.handle_failure(event.component),
            EventKind::Repair => self.handle_repair(event.component),
        }

        Ok(Some(event))
    }

    /// Run until the horizon or until no events remain
    pub fn run_to_completion(&mut self) -> Result<RunResult, SimulationError> {
        while self.step()?.is_some() {}
        Ok(self.compute_result())
    }

    /// Run the trial and hand back everything it produced
    pub fn run(mut self) -> Result<TrialOutcome, SimulationError> {
        let result = self.run_to_completion()?;
        Ok(TrialOutcome {
            result,
            components: self.compute_component_results(),
            outages: self.outages,
            event_log: self.event_log,
        })
    }

    fn start(&mut self) {
        self.phase = RunPhase::Running;

        // An empty window has nothing to observe.
        if self.clock.horizon() <= 0.0 {
            return;
        }

        for component in self.model.components() {
            let first = component.draw_failure_interval(&mut self.source);
            if self.clock.within_horizon(first) {
                self.queue.push(first, EventKind::Failure, component.id);
            }
        }
    }

    fn handle_failure(&mut self, id: ComponentId) {
        let now = self.clock.now();
        let model = self.model;
        let component = model.component(id);

        let was_up = !self.state.is_system_down();
        if !self.state.mark_down(id) {
            return;
        }

        self.totals.failures += 1;
        self.totals.repair_cost += component.per_failure_cost;
        let ledger = &mut self.ledgers[id.0];
        ledger.down_since = Some(now);
        ledger.failures += 1;
        ledger.repair_cost += component.per_failure_cost;
        self.log(Event::ComponentFailed {
            time: now,
            component: id,
            failed_count: self.state.failed_count(),
        });

        if was_up && !model.policy().system_up(&self.state) {
            self.state.open_outage(now);
            self.log(Event::OutageOpened {
                time: now,
                failed_count: self.state.failed_count(),
            });
        }

        let completes_at = now + component.draw_repair_duration(&mut self.source);
        let scheduled = self.clock.clip(completes_at);
        self.queue.push(scheduled, EventKind::Repair, id);
        self.log(Event::RepairScheduled {
            time: now,
            component: id,
            completes_at: scheduled,
            clipped: scheduled < completes_at,
        });
    }

    fn handle_repair(&mut self, id: ComponentId) {
        let now = self.clock.now();
        let model = self.model;
        let component = model.component(id);

        if !self.state.mark_up(id) {
            return;
        }
        self.ledgers[id.0].close(now);
        self.log(Event::ComponentRepaired {
            time: now,
            component: id,
            failed_count: self.state.failed_count(),
        });

        if self.state.is_system_down() && model.policy().system_up(&self.state) {
            self.close_outage(now);
        }

        let next_failure = now + component.draw_failure_interval(&mut self.source);
        if self.clock.within_horizon(next_failure) {
            self.queue.push(next_failure, EventKind::Failure, id);
        }
    }

    fn close_outage(&mut self, time: f64) {
        if let Some(interval) = self.state.close_outage(time) {
            let duration = interval.duration();
            self.totals.downtime += duration;
            self.totals.lost_revenue += duration * self.model.downtime_loss_per_hour();
            self.outages.push(interval);
            self.log(Event::OutageClosed {
                time,
                started_at: interval.start,
            });
        }
    }

    fn finish(&mut self) {
        if self.state.is_system_down() {
            self.close_outage(self.clock.horizon());
        }
        let horizon = self.clock.horizon();
        for ledger in &mut self.ledgers {
            ledger.close(horizon);
        }
        self.phase = RunPhase::Completed;
        debug!(
            failures = self.totals.failures,
            downtime = self.totals.downtime,
            outages = self.outages.len(),
            "trial completed"
        );
    }

    fn log(&mut self, event: Event) {
        if let Some(log) = self.event_log.as_mut() {
            log.log(event);
        }
    }

    fn compute_result(&self) -> RunResult {
        RunResult::from_totals(
            self.clock.horizon(),
            self.totals.downtime,
            self.totals.failures,
            self.totals.repair_cost,
            self.totals.lost_revenue,
        )
    }

    fn compute_component_results(&self) -> Vec<RunResult> {
        let horizon = self.clock.horizon();
        self.model
            .components()
            .iter()
            .zip(&self.ledgers)
            .map(|(component, ledger)| {
                let downtime = ledger.downtime.clamp(0.0, horizon.max(0.0));
                RunResult::from_totals(
                    horizon,
                    downtime,
                    ledger.failures,
                    ledger.repair_cost,
                    downtime * component.downtime_loss_per_hour,
                )
            })
            .collect()
    }
}

/// Run trial `trial` of a model with the stream derived from `seed`
///
/// Only the system-level result; see [`simulate_trial_outcome`] for the
/// per-component results as well.
pub fn simulate_trial(
    model: &SystemModel,
    horizon: f64,
    seed: u64,
    trial: u64,
) -> Result<RunResult, SimulationError> {
    SingleRunSimulator::new(model, horizon, VariateSource::for_trial(seed, trial))?
        .run_to_completion()
}

/// Run trial `trial` and keep the per-component results and outages
pub fn simulate_trial_outcome(
    model: &SystemModel,
    horizon: f64,
    seed: u64,
    trial: u64,
) -> Result<TrialOutcome, SimulationError> {
    SingleRunSimulator::new(model, horizon, VariateSource::for_trial(seed, trial))?.run()
}
