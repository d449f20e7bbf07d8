//! Discrete-event simulator for jobs sharing a CPU
//!
//! Wires the arrival generator, the per-job state machines and the CPU
//! resource to a single event queue. Only one continuation runs at a time;
//! every mutation of shared state happens inside one dispatched event.

use tracing::{debug, info, trace};

use procsim_core::{JobId, Result, SimConfig, SimTime};

use crate::arrival::ArrivalGenerator;
use crate::clock::EventQueue;
use crate::job::{Job, JobRecord, JobTiming, Suspend};
use crate::resource::{Container, Grant, Resource};
use crate::results::{ResultSet, SimulationReport};
use crate::workload::WorkloadSource;

/// Resumption target of a pending event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wakeup {
    Arrival,
    Job(JobId),
}

/// Discrete-event simulator
pub struct Simulator<W: WorkloadSource> {
    config: SimConfig,
    timing: JobTiming,
    clock: EventQueue<Wakeup>,
    cpu: Resource,
    memory: Container,
    arrivals: ArrivalGenerator,
    jobs: Vec<Job>,
    workload: W,

    // Outputs
    results: ResultSet,
    records: Vec<JobRecord>,
    max_queue_len: usize,
}

impl<W: WorkloadSource> Simulator<W> {
    /// Validate `config` and prepare a run. Nothing is simulated until
    /// [`Simulator::run`] or [`Simulator::step`] is called.
    pub fn new(config: SimConfig, workload: W) -> Result<Self> {
        config.validate()?;

        let mut clock = EventQueue::new();
        if config.population > 0 {
            clock.schedule_after(0.0, Wakeup::Arrival);
        }

        Ok(Simulator {
            timing: JobTiming::from(&config),
            clock,
            cpu: Resource::new(config.cpu_capacity),
            memory: Container::full(config.memory_capacity),
            arrivals: ArrivalGenerator::new(config.population, config.arrival_interval),
            jobs: Vec::with_capacity(config.population),
            workload,
            results: ResultSet::new(),
            records: Vec::with_capacity(config.population),
            max_queue_len: 0,
            config,
        })
    }

    /// Dispatch events until none remain
    pub fn run(&mut self) -> &ResultSet {
        while self.step() {}

        info!(
            jobs = self.results.len(),
            end_time = self.clock.now(),
            max_queue_len = self.max_queue_len,
            "simulation finished"
        );
        &self.results
    }

    /// Dispatch a single event. Returns false once the event set is empty.
    pub fn step(&mut self) -> bool {
        let Some((time, wakeup)) = self.clock.pop() else {
            return false;
        };

        trace!(time, ?wakeup, "dispatch");
        match wakeup {
            Wakeup::Arrival => self.handle_arrival(),
            Wakeup::Job(id) => self.resume_job(id),
        }
        true
    }

    /// Spawn the next job and re-arm the generator
    fn handle_arrival(&mut self) {
        let Some(step) = self.arrivals.resume() else {
            return;
        };

        let instructions = self.workload.instruction_budget();
        debug_assert_eq!(self.jobs.len(), step.spawn, "JobId must match Vec index");
        self.jobs
            .push(Job::new(step.spawn, instructions, self.clock.now()));
        debug!(job = step.spawn, instructions, time = self.clock.now(), "job arrived");

        // The new job starts after the generator suspends, at the same instant
        self.clock.schedule_after(0.0, Wakeup::Job(step.spawn));
        if let Some(delay) = step.next_in {
            self.clock.schedule_after(delay, Wakeup::Arrival);
        }
    }

    /// Run a job until it suspends again
    fn resume_job(&mut self, id: JobId) {
        let now = self.clock.now();

        loop {
            let suspend = self.jobs[id].resume(now, &self.timing, &mut self.workload);
            match suspend {
                Suspend::Acquire => match self.cpu.request(id) {
                    // Granted on the spot: keep running in this step
                    Grant::Immediate => {
                        debug!(job = id, time = now, "cpu granted");
                    }
                    Grant::Queued(position) => {
                        self.max_queue_len = self.max_queue_len.max(self.cpu.queue_len());
                        debug!(job = id, position, time = now, "waiting for cpu");
                        return;
                    }
                },
                Suspend::Timeout(delay) => {
                    self.clock.schedule_after(delay, Wakeup::Job(id));
                    return;
                }
                Suspend::Finished => {
                    self.finish_job(id);
                    return;
                }
            }
        }
    }

    /// Release the CPU and archive the job
    fn finish_job(&mut self, id: JobId) {
        if let Some(next) = self.cpu.release(id) {
            debug!(job = next, from = id, time = self.clock.now(), "cpu handed over");
            self.clock.schedule_after(0.0, Wakeup::Job(next));
        }

        let Some(record) = self.jobs[id].record() else {
            debug_assert!(false, "finished job {id} has no completion record");
            return;
        };

        debug!(
            job = id,
            sojourn = record.sojourn(),
            wait = record.wait_time(),
            ticks = record.ticks,
            io_waits = record.io_waits,
            "job completed"
        );
        self.results.push(record.sojourn());
        self.records.push(record);
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Completed jobs, in completion order
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// All jobs spawned so far, indexed by id
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn cpu(&self) -> &Resource {
        &self.cpu
    }

    pub fn memory(&self) -> &Container {
        &self.memory
    }

    /// True once every job has been spawned and no event is pending
    pub fn is_finished(&self) -> bool {
        self.arrivals.is_exhausted() && self.clock.is_empty()
    }

    /// Snapshot of the outputs so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            config: self.config.clone(),
            results: self.results.clone(),
            jobs: self.records.clone(),
            summary: self.results.summary(),
            end_time: self.clock.now(),
            max_queue_len: self.max_queue_len,
        }
    }
}

/// Validate, run to completion and report
pub fn simulate<W: WorkloadSource>(config: SimConfig, workload: W) -> Result<SimulationReport> {
    let mut simulator = Simulator::new(config, workload)?;
    simulator.run();
    Ok(simulator.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobState;
    use crate::workload::{RandomWorkload, ScriptedWorkload};
    use procsim_core::SimError;

    fn seeded_run(config: SimConfig, seed: u64) -> SimulationReport {
        let workload = RandomWorkload::seeded(&config, seed).unwrap();
        simulate(config, workload).unwrap()
    }

    #[test]
    fn test_single_job_exact_sojourn() {
        let report = simulate(SimConfig::new(1, 10.0), ScriptedWorkload::constant(60)).unwrap();

        assert_eq!(report.results.as_slice(), &[20.0]);
        assert_eq!(report.jobs[0].ticks, 20);
        assert_eq!(report.jobs[0].wait_time(), 0.0);
        assert_eq!(report.end_time, 20.0);
    }

    #[test]
    fn test_second_job_waits_for_first() {
        // Job 0 needs 20 ticks, job 1 arrives at 10 and must queue
        let workload = ScriptedWorkload::new(60, vec![30], Vec::new());
        let report = simulate(SimConfig::new(2, 10.0), workload).unwrap();

        let second = &report.jobs[1];
        assert_eq!(second.id, 1);
        assert_eq!(second.arrival_time, 10.0);
        assert_eq!(second.cpu_granted_at, 20.0);
        assert!(second.wait_time() > 0.0);
        assert_eq!(report.results.as_slice(), &[20.0, 20.0]);
        assert_eq!(report.max_queue_len, 1);
    }

    #[test]
    fn test_io_wait_keeps_cpu() {
        // Job 0 blocks on I/O after its only tick; job 1 (arriving during
        // that wait) still cannot run
        let workload = ScriptedWorkload::new(3, vec![3], vec![true, false]);
        let report = simulate(SimConfig::new(2, 2.0), workload).unwrap();

        assert_eq!(report.jobs[0].completion_time, 6.0);
        assert_eq!(report.jobs[1].cpu_granted_at, 6.0);
        assert_eq!(report.jobs[1].completion_time, 7.0);
        assert_eq!(report.results.as_slice(), &[6.0, 5.0]);
    }

    #[test]
    fn test_fifo_grants() {
        let workload = ScriptedWorkload::new(30, vec![3, 3, 3], Vec::new());
        let report = simulate(SimConfig::new(4, 1.0), workload).unwrap();

        let grants: Vec<(JobId, SimTime)> = report
            .jobs
            .iter()
            .map(|r| (r.id, r.cpu_granted_at))
            .collect();
        assert_eq!(grants, vec![(0, 0.0), (1, 10.0), (2, 11.0), (3, 12.0)]);
        assert_eq!(report.max_queue_len, 3);
    }

    #[test]
    fn test_result_count_matches_population() {
        for population in [1, 2, 7, 25, 60] {
            for interval in [0.5, 1.0, 10.0, 50.0] {
                let report = seeded_run(SimConfig::new(population, interval), population as u64);
                assert_eq!(report.results.len(), population);
                assert_eq!(report.jobs.len(), population);
            }
        }
    }

    #[test]
    fn test_sojourn_lower_bound() {
        let config = SimConfig::new(100, 3.0);
        let report = seeded_run(config.clone(), 3);

        for record in &report.jobs {
            let lower = config.min_ticks(record.instructions) as f64 * config.tick;
            assert!(record.sojourn().is_finite());
            assert!(
                record.sojourn() >= lower,
                "job {} sojourn {} below {}",
                record.id,
                record.sojourn(),
                lower
            );
            assert_eq!(record.ticks, config.min_ticks(record.instructions));
        }
    }

    #[test]
    fn test_single_cpu_mutual_exclusion() {
        let report = seeded_run(SimConfig::new(80, 4.0), 9);

        let mut intervals: Vec<(SimTime, SimTime)> = report
            .jobs
            .iter()
            .map(|r| (r.cpu_granted_at, r.completion_time))
            .collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in intervals.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "overlapping holds: {:?}", pair);
        }
    }

    #[test]
    fn test_grants_follow_arrival_order() {
        let report = seeded_run(SimConfig::new(80, 2.0), 21);

        let mut by_id = report.jobs.clone();
        by_id.sort_by_key(|r| r.id);
        for pair in by_id.windows(2) {
            assert!(pair[0].cpu_granted_at <= pair[1].cpu_granted_at);
        }
    }

    #[test]
    fn test_multi_cpu_respects_capacity() {
        let config = SimConfig::new(60, 1.0).with_cpu(3.0, 3);
        let report = seeded_run(config, 5);

        for record in &report.jobs {
            let t = record.cpu_granted_at;
            let holding = report
                .jobs
                .iter()
                .filter(|r| r.cpu_granted_at <= t && t < r.completion_time)
                .count();
            assert!(holding <= 3, "{holding} jobs hold the cpu at t={t}");
        }
    }

    #[test]
    fn test_same_seed_same_results() {
        let config = SimConfig::new(50, 10.0);
        let a = seeded_run(config.clone(), 1234);
        let b = seeded_run(config, 1234);

        assert_eq!(a.results, b.results);
        assert_eq!(a.jobs, b.jobs);
        assert_eq!(a.end_time, b.end_time);
    }

    #[test]
    fn test_completion_order_can_differ_from_arrival_order() {
        // Two CPUs: a long job arrives first, a short one overtakes it
        let workload = ScriptedWorkload::new(90, vec![3], Vec::new());
        let config = SimConfig::new(2, 1.0).with_cpu(3.0, 2);
        let report = simulate(config, workload).unwrap();

        let order: Vec<JobId> = report.jobs.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![1, 0]);
        assert_eq!(report.results.as_slice(), &[1.0, 30.0]);
    }

    #[test]
    fn test_empty_population() {
        let report = seeded_run(SimConfig::new(0, 10.0), 0);

        assert!(report.results.is_empty());
        assert!(report.summary.is_none());
        assert_eq!(report.end_time, 0.0);
    }

    #[test]
    fn test_inverted_instruction_range_is_an_error() {
        let config = SimConfig {
            min_instructions: 100,
            max_instructions: 10,
            ..SimConfig::new(5, 10.0)
        };

        // Both the workload and the simulator refuse it instead of panicking
        assert!(matches!(
            RandomWorkload::seeded(&config, 1),
            Err(SimError::InvalidConfig { field: "max_instructions", .. })
        ));
        assert!(matches!(
            simulate(config, ScriptedWorkload::constant(60)),
            Err(SimError::InvalidConfig { field: "max_instructions", .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let config = SimConfig::new(5, 10.0).with_cpu(0.0, 1);
        let result = Simulator::new(config, ScriptedWorkload::constant(60));

        assert!(matches!(
            result,
            Err(SimError::InvalidConfig { field: "cpu_rate", .. })
        ));
    }

    #[test]
    fn test_step_by_step() {
        let mut simulator =
            Simulator::new(SimConfig::new(1, 10.0), ScriptedWorkload::constant(3)).unwrap();
        assert!(!simulator.is_finished());

        // arrival, start (granted + first tick scheduled), tick
        assert!(simulator.step());
        assert_eq!(simulator.jobs()[0].state, JobState::Arrived);
        assert!(simulator.step());
        assert_eq!(simulator.jobs()[0].state, JobState::Running);
        assert_eq!(simulator.cpu().held(), 1);
        assert!(simulator.step());
        assert_eq!(simulator.jobs()[0].state, JobState::Done);
        assert_eq!(simulator.cpu().held(), 0);

        assert!(!simulator.step());
        assert!(simulator.is_finished());
        assert_eq!(simulator.now(), 1.0);
    }

    #[test]
    fn test_memory_pool_untouched() {
        let config = SimConfig::new(20, 5.0).with_memory(200);
        let workload = RandomWorkload::seeded(&config, 8).unwrap();
        let mut simulator = Simulator::new(config, workload).unwrap();
        simulator.run();

        assert_eq!(simulator.results().len(), 20);
        assert_eq!(simulator.records().len(), 20);
        assert_eq!(simulator.memory().level(), 200);
        assert_eq!(simulator.memory().capacity(), 200);
    }
}
