//! Monte-Carlo trials, aggregation and sweeps

pub mod aggregator;
pub mod configuration;
pub mod stats;

pub use aggregator::{
    CancellationToken, ConfigurationReport, ConfigurationStatus, MonteCarloAggregator,
    SweepOptions,
};
pub use configuration::{PreparedConfiguration, SimulationConfig};
pub use stats::{AggregatedResult, ComponentSummary, MetricSummary, SlaTargets};
