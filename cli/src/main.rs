//! Reliability Simulator CLI
//!
//! Runs Monte-Carlo sweeps from a sweep file or a fleet inventory, prints a
//! summary table and optionally exports CSV / JSON.

mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use reliability_simulator_core_rs::{
    ConfigurationStatus, FleetInventory, FleetOptions, MonteCarloAggregator, SlaTargets, Sweep,
    SweepFile, SweepOptions, ValidationMode,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "reliability-sim")]
#[command(about = "Monte-Carlo reliability simulator for storage systems")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configuration of a sweep file
    Run {
        /// Sweep file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Override the trial count of every configuration
        #[arg(long)]
        trials: Option<usize>,

        /// Override the sweep seed (configurations with their own seed keep it)
        #[arg(long)]
        seed: Option<u64>,

        /// Reject unrecognized redundancy levels
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Check a sweep file without running it
    Validate {
        /// Sweep file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Reject unrecognized redundancy levels
        #[arg(long)]
        strict: bool,
    },

    /// Simulate a fleet inventory (servers and their disks)
    Fleet {
        /// Inventory file (JSON)
        #[arg(short, long)]
        inventory: PathBuf,

        /// Trials per configuration
        #[arg(long, default_value = "1000")]
        trials: usize,

        /// Base seed
        #[arg(long, default_value = "105")]
        seed: u64,

        /// One configuration per disk instead of per server
        #[arg(long)]
        per_disk: bool,

        /// Reject unrecognized RAID levels
        #[arg(long)]
        strict: bool,

        /// Minimum mean availability, in percent
        #[arg(long, default_value = "99.9")]
        sla_availability: f64,

        /// Maximum mean downtime, in hours
        #[arg(long)]
        sla_max_downtime: Option<f64>,

        #[command(flatten)]
        exec: ExecArgs,
    },
}

/// Execution and export options shared by `run` and `fleet`
#[derive(Args)]
struct ExecArgs {
    /// Write results as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Abandon unfinished configurations after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn validation_mode(strict: bool, file_mode: ValidationMode) -> ValidationMode {
    if strict {
        ValidationMode::Strict
    } else {
        file_mode
    }
}

fn execute(sweep: &Sweep, validation: ValidationMode, exec: &ExecArgs) -> Result<()> {
    if exec.threads == Some(0) {
        bail!("--threads must be at least 1");
    }

    let options = SweepOptions {
        validation,
        threads: exec.threads,
        timeout: exec.timeout_secs.map(Duration::from_secs),
        ..SweepOptions::default()
    };

    let reports = MonteCarloAggregator::new(options)
        .run_sweep(&sweep.configurations)
        .context("sweep failed")?;

    let currency = sweep.currency.as_deref();
    print!("{}", report::summary_table(&reports, currency));

    if let Some(path) = &exec.output {
        report::write_csv(path, &reports, currency)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "CSV written");
    }
    if let Some(path) = &exec.json {
        report::write_json(path, &reports, currency)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "JSON written");
    }

    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| matches!(r.status, ConfigurationStatus::Failed(_)))
        .map(|r| r.label.as_str())
        .collect();
    let abandoned = reports.iter().filter(|r| r.is_abandoned()).count();
    if abandoned > 0 {
        warn!(abandoned, "some configurations did not finish before the timeout");
    }
    if !failed.is_empty() {
        bail!("{} configuration(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Run {
            config,
            trials,
            seed,
            strict,
            exec,
        } => {
            let mut file = SweepFile::load_from_path(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            if let Some(trials) = trials {
                file.override_trials(trials);
            }
            if let Some(seed) = seed {
                file.seed = seed;
            }
            let sweep = file.resolve()?;
            let mode = validation_mode(strict, sweep.validation);
            execute(&sweep, mode, &exec)?;
        }

        Commands::Validate { config, strict } => {
            let sweep = Sweep::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let mode = validation_mode(strict, sweep.validation);
            let warnings = sweep.validate(Some(mode))?;
            for (label, warning) in &warnings {
                warn!(configuration = %label, "{}", warning);
            }
            println!(
                "{}: {} configuration(s) valid, {} warning(s)",
                config.display(),
                sweep.configurations.len(),
                warnings.len()
            );
        }

        Commands::Fleet {
            inventory,
            trials,
            seed,
            per_disk,
            strict,
            sla_availability,
            sla_max_downtime,
            exec,
        } => {
            let fleet = FleetInventory::load_from_path(&inventory)
                .with_context(|| format!("loading {}", inventory.display()))?;
            let options = FleetOptions {
                trials,
                seed,
                sla: SlaTargets {
                    availability_percent: sla_availability,
                    max_downtime_hours: sla_max_downtime.unwrap_or(f64::INFINITY),
                },
                per_disk,
            };
            let sweep = fleet.to_sweep(&options)?;
            execute(&sweep, validation_mode(strict, sweep.validation), &exec)?;
        }
    }

    Ok(())
}
