//! Telco Simulator CLI
//!
//! Runs the queueing-network simulation and prints every station's finished
//! jobs.
//!
//! # Example
//!
//! ```bash
//! # Reference topology, 10 hours, seed 543210
//! telco-sim
//!
//! # 24 hours with another seed
//! telco-sim --end-time 24 --seed 7
//!
//! # Custom topology as JSON, report as JSON
//! telco-sim --config network.json --json
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use telco_simulator_core_rs::orchestrator::{Orchestrator, SimulationConfig, SimulationReport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Telco Simulator
///
/// Discrete-event simulation of a queueing network. Reproducible when the
/// same seed is used.
#[derive(Parser, Debug)]
#[command(name = "telco-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Simulation end time (hours); overrides the configuration
    #[arg(short = 'e', long)]
    end_time: Option<f64>,

    /// Random seed; overrides the configuration
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Ignore any configured seed and use a random one
    #[arg(long, conflicts_with = "seed")]
    random_seed: bool,

    /// JSON topology file; defaults to the reference telco network
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,telco_simulator_core_rs=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::telco_default(),
    };
    if let Some(end_time) = args.end_time {
        config = config.with_end_time(end_time);
    }
    if args.random_seed {
        config = config.with_seed(None);
    } else if let Some(seed) = args.seed {
        config = config.with_seed(Some(seed));
    }

    info!(end_time = config.end_time, seed = ?config.rng_seed, "Beginning simulation");

    let mut orchestrator = Orchestrator::new(config).map_err(|e| e.to_string())?;
    let report = orchestrator.run().map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<SimulationConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

fn print_report(report: &SimulationReport) {
    println!(
        "Seed {}; last event at {:.3} of {:.1}; {} events, {} jobs created",
        report.seed,
        report.final_time,
        report.end_time,
        report.events_processed,
        report.jobs_created
    );

    for station in &report.stations {
        if station.finished_jobs.is_empty() {
            continue;
        }
        println!("{} Finished Jobs", station.name);
        for job in &station.finished_jobs {
            println!(
                "\tArrival time: {}, Start time: {}, End time: {}",
                fmt_time(job.arrival_time),
                fmt_time(job.start_time),
                fmt_time(job.completion_time)
            );
        }
        if !station.is_sink {
            println!(
                "\tPeak busy servers: {} of {}, peak queue length: {}",
                station.peak_busy_servers, station.servers, station.peak_queue_len
            );
        }
    }
    println!("\nSIMULATION COMPLETE");
}

fn fmt_time(time: Option<f64>) -> String {
    time.map(|t| format!("{:.6}", t))
        .unwrap_or_else(|| "-".to_string())
}
