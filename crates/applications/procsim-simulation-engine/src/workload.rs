//! Sources of per-job randomness
//!
//! Every random draw in a run goes through a [`WorkloadSource`]:
//! - [`RandomWorkload`]: uniform budgets and fair I/O coin flips from any `Rng`
//! - [`ScriptedWorkload`]: fixed draws, for reproducing exact scenarios

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use procsim_core::{Result, SimConfig};

/// Supplies the random draws a run needs
pub trait WorkloadSource {
    /// Instruction budget for a job being spawned now
    fn instruction_budget(&mut self) -> u32;

    /// Whether the job that just finished a tick blocks on I/O
    fn io_wait(&mut self) -> bool;
}

impl<W: WorkloadSource + ?Sized> WorkloadSource for &mut W {
    fn instruction_budget(&mut self) -> u32 {
        (**self).instruction_budget()
    }

    fn io_wait(&mut self) -> bool {
        (**self).io_wait()
    }
}

/// Budgets drawn uniformly from the configured inclusive range; I/O when a
/// draw from {1, 2} comes up 1
pub struct RandomWorkload<R: Rng> {
    budget: Uniform<u32>,
    rng: R,
}

impl<R: Rng> RandomWorkload<R> {
    /// Fails with the config's validation error, e.g. an inverted
    /// instruction range
    pub fn new(config: &SimConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(RandomWorkload {
            budget: Uniform::new_inclusive(config.min_instructions, config.max_instructions),
            rng,
        })
    }
}

impl RandomWorkload<StdRng> {
    /// Reproducible workload: the same seed yields the same draws
    pub fn seeded(config: &SimConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: &SimConfig) -> Result<Self> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> WorkloadSource for RandomWorkload<R> {
    fn instruction_budget(&mut self) -> u32 {
        self.budget.sample(&mut self.rng)
    }

    fn io_wait(&mut self) -> bool {
        self.rng.gen_range(1..=2) == 1
    }
}

/// Replays fixed draws: budgets in order (the last one repeats), and an I/O
/// pattern that cycles
#[derive(Debug, Clone)]
pub struct ScriptedWorkload {
    // Never empty
    budgets: Vec<u32>,
    next_budget: usize,
    io_pattern: Vec<bool>,
    next_io: usize,
}

impl ScriptedWorkload {
    /// Jobs get `first`, then each of `then` in order
    pub fn new(first: u32, then: Vec<u32>, io_pattern: Vec<bool>) -> Self {
        let mut budgets = Vec::with_capacity(then.len() + 1);
        budgets.push(first);
        budgets.extend(then);

        ScriptedWorkload {
            budgets,
            next_budget: 0,
            io_pattern,
            next_io: 0,
        }
    }

    /// Every job gets `budget` instructions and never waits on I/O
    pub fn constant(budget: u32) -> Self {
        Self::new(budget, Vec::new(), Vec::new())
    }
}

impl WorkloadSource for ScriptedWorkload {
    fn instruction_budget(&mut self) -> u32 {
        let index = self.next_budget.min(self.budgets.len() - 1);
        self.next_budget += 1;
        self.budgets[index]
    }

    fn io_wait(&mut self) -> bool {
        if self.io_pattern.is_empty() {
            return false;
        }
        let hit = self.io_pattern[self.next_io % self.io_pattern.len()];
        self.next_io += 1;
        hit
    }
}
