//! Procsim CLI
//!
//! Sweeps the number of jobs for one arrival interval and prints the average
//! time in system (with its spread) for each population.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use procsim_core::SimConfig;
use procsim_simulation_engine::{run_experiment, ExperimentPoint};

#[derive(Parser, Debug)]
#[command(name = "procsim")]
#[command(about = "Simulate jobs competing for a CPU and report time in system", long_about = None)]
struct Args {
    /// Population sizes to sweep (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "25,50,100,150,200")]
    populations: Vec<usize>,

    /// Time units between arrivals
    #[arg(short, long, env = "PROCSIM_INTERVAL")]
    interval: Option<f64>,

    /// Memory pool capacity
    #[arg(long, env = "PROCSIM_MEMORY")]
    memory: Option<u64>,

    /// Instructions executed per tick
    #[arg(long, env = "PROCSIM_CPU_RATE")]
    cpu_rate: Option<f64>,

    /// Number of jobs that may run at once
    #[arg(long, env = "PROCSIM_CPUS")]
    cpus: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long, env = "PROCSIM_SEED")]
    seed: Option<u64>,

    /// JSON file with base configuration (flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file path (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    /// Defaults, then the config file, then individual flags
    fn base_config(&self) -> anyhow::Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if let Some(interval) = self.interval {
            config.arrival_interval = interval;
        }
        if let Some(memory) = self.memory {
            config.memory_capacity = memory;
        }
        if let Some(cpu_rate) = self.cpu_rate {
            config.cpu_rate = cpu_rate;
        }
        if let Some(cpus) = self.cpus {
            config.cpu_capacity = cpus;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "procsim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.base_config()?;

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Procsim: time in system vs. number of jobs              ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("Configuration:");
    println!("  Arrival interval: {}", config.arrival_interval);
    println!("  CPUs: {} at {} instructions/tick", config.cpu_capacity, config.cpu_rate);
    println!("  Memory: {}", config.memory_capacity);
    println!(
        "  Instructions per job: {}..={}",
        config.min_instructions, config.max_instructions
    );
    match args.seed {
        Some(seed) => println!("  Seed: {}\n", seed),
        None => println!("  Seed: random\n"),
    }

    info!(points = args.populations.len(), "starting sweep");
    let points = run_experiment(&config, &args.populations, args.seed)?;

    print_table(&points);

    if let Some(output_path) = &args.output {
        let json = serde_json::to_string_pretty(&points)?;
        fs::write(output_path, json)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("\nResults saved to {}", output_path.display());
    }

    Ok(())
}

fn print_table(points: &[ExperimentPoint]) {
    println!(
        "{:>10} {:>14} {:>14} {:>14}",
        "Jobs", "Avg Time", "Std Dev", "Std Dev (pop)"
    );
    println!("{}", "-".repeat(55));

    for point in points {
        match &point.summary {
            Some(summary) => println!(
                "{:>10} {:>14.2} {:>14.2} {:>14.2}",
                point.population, summary.mean, summary.std_dev, summary.population_std_dev
            ),
            None => println!("{:>10} {:>14} {:>14} {:>14}", point.population, "no data", "-", "-"),
        }
    }
}
