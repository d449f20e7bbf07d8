//! Outputs of a simulation run

use serde::{Deserialize, Serialize};

use procsim_core::{SimConfig, SimTime, Summary};

use crate::job::JobRecord;

/// Sojourn times in completion order, one per completed job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    sojourn_times: Vec<SimTime>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sojourn: SimTime) {
        debug_assert!(
            sojourn.is_finite() && sojourn >= 0.0,
            "sojourn time must be finite and non-negative, got {sojourn}"
        );
        self.sojourn_times.push(sojourn);
    }

    pub fn as_slice(&self) -> &[SimTime] {
        &self.sojourn_times
    }

    pub fn len(&self) -> usize {
        self.sojourn_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sojourn_times.is_empty()
    }

    /// Mean and standard deviation, or `None` when no job completed
    pub fn summary(&self) -> Option<Summary> {
        Summary::from_samples(&self.sojourn_times)
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimConfig,
    pub results: ResultSet,
    /// Completed jobs, in completion order
    pub jobs: Vec<JobRecord>,
    pub summary: Option<Summary>,
    /// Clock value when the last event fired
    pub end_time: SimTime,
    /// Longest CPU wait queue seen during the run
    pub max_queue_len: usize,
}
