//! Population sweeps
//!
//! Runs one independent simulation per population size, all sharing the rest
//! of the configuration, and keeps the summary of each.

use serde::{Deserialize, Serialize};
use tracing::info;

use procsim_core::{Result, SimConfig, SimTime, Summary};

use crate::simulator::simulate;
use crate::workload::RandomWorkload;

/// Outcome of one run in a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPoint {
    pub population: usize,
    pub arrival_interval: SimTime,
    /// `None` when the run completed no job
    pub summary: Option<Summary>,
    pub end_time: SimTime,
}

/// Run `base` once per entry of `populations`.
///
/// With a seed, point `i` uses `seed + i`, so the whole sweep is reproducible;
/// without one each point draws from fresh entropy.
pub fn run_experiment(
    base: &SimConfig,
    populations: &[usize],
    seed: Option<u64>,
) -> Result<Vec<ExperimentPoint>> {
    // Reject a bad base config even when the sweep is empty
    base.validate()?;

    let mut points = Vec::with_capacity(populations.len());

    for (index, &population) in populations.iter().enumerate() {
        let config = base.clone().with_population(population);
        let workload = match seed {
            Some(seed) => RandomWorkload::seeded(&config, seed.wrapping_add(index as u64))?,
            None => RandomWorkload::from_entropy(&config)?,
        };

        let report = simulate(config, workload)?;
        match &report.summary {
            Some(summary) => info!(
                population,
                interval = base.arrival_interval,
                mean = summary.mean,
                std_dev = summary.std_dev,
                "sweep point"
            ),
            None => info!(population, interval = base.arrival_interval, "sweep point: no data"),
        }

        points.push(ExperimentPoint {
            population,
            arrival_interval: base.arrival_interval,
            summary: report.summary,
            end_time: report.end_time,
        });
    }

    Ok(points)
}
