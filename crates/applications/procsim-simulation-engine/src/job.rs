//! Per-job lifecycle
//!
//! A job is a resumable state machine:
//!
//! ```text
//! Arrived -> WaitingForCpu -> (Running <-> IoWait)* -> Done
//! ```
//!
//! Each call to [`Job::resume`] runs the job up to its next suspension point
//! and tells the simulator what it is waiting for. I/O waits keep the CPU slot.

use serde::{Deserialize, Serialize};

use procsim_core::{JobId, SimConfig, SimTime};

use crate::workload::WorkloadSource;

/// State of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Arrived,
    WaitingForCpu,
    Running,
    IoWait,
    Done,
}

/// What a job suspended on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Needs a CPU slot before it can continue
    Acquire,
    /// Resume after this many time units
    Timeout(SimTime),
    /// Budget exhausted; the CPU slot must be released
    Finished,
}

/// Timing parameters a job needs while running
#[derive(Debug, Clone, Copy)]
pub struct JobTiming {
    pub cpu_rate: f64,
    pub tick: SimTime,
    pub io_wait: SimTime,
}

impl From<&SimConfig> for JobTiming {
    fn from(config: &SimConfig) -> Self {
        JobTiming {
            cpu_rate: config.cpu_rate,
            tick: config.tick,
            io_wait: config.io_wait,
        }
    }
}

/// A job in flight
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub state: JobState,
    pub instructions: u32,
    /// May end below zero: the last tick is never billed partially
    pub remaining: f64,
    pub arrival_time: SimTime,
    pub cpu_granted_at: Option<SimTime>,
    pub completion_time: Option<SimTime>,
    pub ticks: u64,
    pub io_waits: u64,
}

impl Job {
    pub fn new(id: JobId, instructions: u32, arrival_time: SimTime) -> Self {
        Job {
            id,
            state: JobState::Arrived,
            instructions,
            remaining: instructions as f64,
            arrival_time,
            cpu_granted_at: None,
            completion_time: None,
            ticks: 0,
            io_waits: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Done
    }

    /// Run from the current state to the next suspension point.
    ///
    /// `now` is the time of the event that woke the job. A job resumed in
    /// `WaitingForCpu` has just been granted the CPU.
    pub fn resume<W: WorkloadSource + ?Sized>(
        &mut self,
        now: SimTime,
        timing: &JobTiming,
        workload: &mut W,
    ) -> Suspend {
        match self.state {
            JobState::Arrived => {
                self.state = JobState::WaitingForCpu;
                Suspend::Acquire
            }
            JobState::WaitingForCpu => {
                self.cpu_granted_at = Some(now);
                self.next_tick(now, timing)
            }
            JobState::Running => {
                self.ticks += 1;
                self.remaining -= timing.cpu_rate;

                // The I/O draw happens after every tick, the last one included
                if workload.io_wait() {
                    self.io_waits += 1;
                    self.state = JobState::IoWait;
                    Suspend::Timeout(timing.io_wait)
                } else {
                    self.next_tick(now, timing)
                }
            }
            JobState::IoWait => self.next_tick(now, timing),
            JobState::Done => Suspend::Finished,
        }
    }

    fn next_tick(&mut self, now: SimTime, timing: &JobTiming) -> Suspend {
        if self.remaining > 0.0 {
            self.state = JobState::Running;
            Suspend::Timeout(timing.tick)
        } else {
            self.state = JobState::Done;
            self.completion_time = Some(now);
            Suspend::Finished
        }
    }

    /// Archive a completed job
    pub fn record(&self) -> Option<JobRecord> {
        Some(JobRecord {
            id: self.id,
            instructions: self.instructions,
            arrival_time: self.arrival_time,
            cpu_granted_at: self.cpu_granted_at?,
            completion_time: self.completion_time?,
            ticks: self.ticks,
            io_waits: self.io_waits,
        })
    }
}

/// Immutable history of a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub instructions: u32,
    pub arrival_time: SimTime,
    pub cpu_granted_at: SimTime,
    pub completion_time: SimTime,
    pub ticks: u64,
    pub io_waits: u64,
}

impl JobRecord {
    /// Time spent in the system, from arrival to completion
    pub fn sojourn(&self) -> SimTime {
        self.completion_time - self.arrival_time
    }

    /// Time spent queued for the CPU
    pub fn wait_time(&self) -> SimTime {
        self.cpu_granted_at - self.arrival_time
    }
}
