//! Core types shared across Procsim components

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Simulated time, in abstract time units
pub type SimTime = f64;

/// Sequential job index, assigned in arrival order
pub type JobId = usize;

/// Parameters of a single simulation run
///
/// Every field has a default matching the classic experiment (one CPU
/// executing 3 instructions per tick, a 200-unit memory pool, jobs arriving
/// every 10 time units with 50..=200 instructions each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of jobs the arrival generator spawns
    pub population: usize,
    /// Time between two consecutive arrivals
    pub arrival_interval: SimTime,
    /// Capacity (and initial level) of the memory pool
    pub memory_capacity: u64,
    /// Instructions executed per tick
    pub cpu_rate: f64,
    /// Number of jobs that may hold the CPU at once
    pub cpu_capacity: usize,
    /// Smallest instruction budget a job can draw (inclusive)
    pub min_instructions: u32,
    /// Largest instruction budget a job can draw (inclusive)
    pub max_instructions: u32,
    /// Length of one execution tick
    pub tick: SimTime,
    /// Length of one I/O wait
    pub io_wait: SimTime,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            population: 25,
            arrival_interval: 10.0,
            memory_capacity: 200,
            cpu_rate: 3.0,
            cpu_capacity: 1,
            min_instructions: 50,
            max_instructions: 200,
            tick: 1.0,
            io_wait: 5.0,
        }
    }
}

impl SimConfig {
    /// Default configuration for `population` jobs arriving every `arrival_interval`
    pub fn new(population: usize, arrival_interval: SimTime) -> Self {
        SimConfig {
            population,
            arrival_interval,
            ..SimConfig::default()
        }
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_cpu(mut self, cpu_rate: f64, cpu_capacity: usize) -> Self {
        self.cpu_rate = cpu_rate;
        self.cpu_capacity = cpu_capacity;
        self
    }

    pub fn with_memory(mut self, memory_capacity: u64) -> Self {
        self.memory_capacity = memory_capacity;
        self
    }

    /// Check every parameter; the first offending field is reported.
    ///
    /// A population of zero is accepted and describes an empty run.
    pub fn validate(&self) -> Result<()> {
        positive_time("arrival_interval", self.arrival_interval)?;
        positive_time("cpu_rate", self.cpu_rate)?;
        positive_time("tick", self.tick)?;

        if self.cpu_capacity == 0 {
            return Err(SimError::invalid("cpu_capacity", "must be at least 1"));
        }
        if self.memory_capacity == 0 {
            return Err(SimError::invalid("memory_capacity", "must be at least 1"));
        }
        if self.min_instructions == 0 {
            return Err(SimError::invalid("min_instructions", "must be at least 1"));
        }
        if self.min_instructions > self.max_instructions {
            return Err(SimError::invalid(
                "max_instructions",
                format!(
                    "must not be below min_instructions ({} > {})",
                    self.min_instructions, self.max_instructions
                ),
            ));
        }
        if !self.io_wait.is_finite() || self.io_wait < 0.0 {
            return Err(SimError::invalid(
                "io_wait",
                format!("must be finite and non-negative, got {}", self.io_wait),
            ));
        }

        Ok(())
    }

    /// Fewest ticks a job with `budget` instructions can run for
    pub fn min_ticks(&self, budget: u32) -> u64 {
        (budget as f64 / self.cpu_rate).ceil() as u64
    }
}

fn positive_time(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(
            field,
            format!("must be finite and positive, got {}", value),
        ))
    }
}
