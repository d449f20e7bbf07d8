//! Arrival generator: spawns jobs at a fixed interval

use procsim_core::{JobId, SimTime};

/// One step of the arrival generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalStep {
    /// Index of the job to spawn now
    pub spawn: JobId,
    /// Delay until the generator wants to run again, if it has more to spawn
    pub next_in: Option<SimTime>,
}

/// Spawns `population` jobs, one every `interval` time units, starting at once
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    population: usize,
    interval: SimTime,
    spawned: usize,
}

impl ArrivalGenerator {
    pub fn new(population: usize, interval: SimTime) -> Self {
        ArrivalGenerator {
            population,
            interval,
            spawned: 0,
        }
    }

    /// Spawn the next job, or `None` once the population is reached.
    ///
    /// No trailing wait is requested after the last spawn.
    pub fn resume(&mut self) -> Option<ArrivalStep> {
        if self.is_exhausted() {
            return None;
        }

        let spawn = self.spawned;
        self.spawned += 1;

        Some(ArrivalStep {
            spawn,
            next_in: (!self.is_exhausted()).then_some(self.interval),
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.population
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_population_then_stops() {
        let mut arrivals = ArrivalGenerator::new(3, 10.0);

        assert_eq!(
            arrivals.resume(),
            Some(ArrivalStep { spawn: 0, next_in: Some(10.0) })
        );
        assert_eq!(
            arrivals.resume(),
            Some(ArrivalStep { spawn: 1, next_in: Some(10.0) })
        );
        assert_eq!(
            arrivals.resume(),
            Some(ArrivalStep { spawn: 2, next_in: None })
        );
        assert_eq!(arrivals.resume(), None);
        assert!(arrivals.is_exhausted());
    }

    #[test]
    fn test_empty_population() {
        let mut arrivals = ArrivalGenerator::new(0, 10.0);
        assert!(arrivals.is_exhausted());
        assert_eq!(arrivals.resume(), None);
    }
}
