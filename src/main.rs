//! Railsim - command line runner
//!
//! Loads a configuration (or the built-in sample), runs the simulation to
//! completion and prints a statistics summary.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use railsim::core::config::SeedSetting;
use railsim::core::error::Result;
use railsim::{Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

/// Discrete-time train network simulation
#[derive(Parser, Debug)]
#[command(name = "railsim")]
#[command(about = "Simulate passengers travelling on a train route")]
struct Args {
    /// TOML configuration file (defaults to the built-in sample)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the number of ticks to run
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the seed: -1 for wall clock, 0 for unseeded
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Write the statistics report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log a full snapshot of the route before and after the run
    #[arg(long)]
    snapshots: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("railsim=info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = SeedSetting::from(seed);
    }

    let mut simulation = Simulation::new(config)?;
    if args.snapshots {
        tracing::info!("\n{}", simulation.snapshot("Start"));
    }

    let stats = simulation.run()?;
    if args.snapshots {
        tracing::info!("\n{}", simulation.snapshot("End"));
    }

    println!("{}", stats.summary());
    if let Some(path) = &args.json {
        fs::write(path, stats.to_json()?)?;
        tracing::info!("Wrote statistics to {}", path.display());
    }
    Ok(())
}
