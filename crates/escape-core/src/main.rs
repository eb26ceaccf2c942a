//! Escape Simulation Runner
//!
//! Runs a seeded batch from a TOML configuration and reports the outcome
//! counts.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use escape_core::output::{write_stats, EventLogger, StatsCollector};
use escape_core::{run_seeded, RunConfig, DEFAULT_CONFIG_PATH};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "escape_sim")]
#[command(about = "Pursuit-evasion grid simulation")]
struct Args {
    /// Configuration file; defaults are used if it is missing
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed of the first run; run i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of runs
    #[arg(long, default_value_t = 10)]
    runs: u64,

    /// Tick cap per run; runs reaching it end as timeouts
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write every run's events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write batch statistics to this JSON file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Print statistics as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        RunConfig::load(&args.config)?
    } else {
        RunConfig::load_or_default(&args.config)
    };
    config.validate()?;

    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)?,
        None => EventLogger::null(),
    };
    let mut collector = StatsCollector::new();

    info!(seed = args.seed, runs = args.runs, "starting batch");
    for i in 0..args.runs {
        let report = run_seeded(&config, args.seed.wrapping_add(i), args.max_ticks)?;
        logger.log_batch(&report.events)?;
        collector.record(&report);
    }
    logger.flush()?;

    let stats = collector.generate_stats();
    if let Some(path) = &args.stats {
        write_stats(path, &stats)?;
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", stats.render());
    }
    Ok(())
}
