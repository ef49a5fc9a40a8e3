/*!
 * Scheduling Simulator Library
 * Discrete-tick CPU scheduling under FCFS, SJF, and three-level MLFQ
 */

pub mod core;
pub mod process;
pub mod sim;

// Re-exports
pub use crate::core::errors::{DefinitionError, InvariantError, SimResult, SimulationError};
pub use crate::core::types::{Algorithm, Level, Pid, Tick};
pub use process::{demo_workload, ProcessMetrics, ProcessSpec, ProcessState};
pub use sim::{
    simulate, simulate_all, EventKind, RunReport, RunSummary, SchedEvent, TickSnapshot,
};
