//! Procsim Simulation Engine
//!
//! Discrete-event simulator of jobs arriving at a fixed interval and competing
//! for a shared CPU, measuring each job's time in the system.

pub mod clock;
pub mod resource;
pub mod workload;
pub mod job;
pub mod arrival;
pub mod results;
pub mod simulator;
pub mod experiment;

pub use experiment::{run_experiment, ExperimentPoint};
pub use results::{ResultSet, SimulationReport};
pub use simulator::{simulate, Simulator};
pub use workload::{RandomWorkload, ScriptedWorkload, WorkloadSource};
