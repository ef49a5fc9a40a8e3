/*!
 * Error Types
 * Centralized error handling with thiserror and serde support
 */

use crate::core::types::{Pid, Tick};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulation operation result
pub type SimResult<T> = Result<T, SimulationError>;

/// Rejected process definitions, reported before any simulation run begins
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum DefinitionError {
    #[error("process {name:?} has no CPU bursts")]
    EmptyCpuBursts { name: String },

    #[error("process {name:?} has non-positive burst duration {duration}")]
    NonPositiveBurst { name: String, duration: i64 },

    #[error("process {name:?} has {io} IO bursts but only {cpu} CPU bursts to alternate with")]
    TooManyIoBursts { name: String, cpu: usize, io: usize },

    #[error("process {name:?} has negative arrival tick {arrival}")]
    NegativeArrival { name: String, arrival: i64 },

    #[error("duplicate process name {name:?}")]
    DuplicateName { name: String },

    #[error("workload is empty")]
    EmptyWorkload,
}

/// Internal-consistency failures; these indicate an engine bug, not bad input
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum InvariantError {
    #[error("process {pid} is already queued at {location} and cannot be enqueued again")]
    DoubleQueued { pid: Pid, location: String },

    #[error("process {pid} is not in the IO-wait set")]
    NotWaitingOnIo { pid: Pid },

    #[error("completed process {pid} received a tick at {tick}")]
    CompletedProcessTicked { pid: Pid, tick: Tick },

    #[error("metrics requested for process {pid} before completion")]
    MetricsBeforeCompletion { pid: Pid },

    #[error(
        "process {pid} waiting metric is inconsistent: \
         turnaround {turnaround} minus bursts {burst_total} != accumulated {accumulated}"
    )]
    MetricMismatch {
        pid: Pid,
        turnaround: Tick,
        burst_total: Tick,
        accumulated: Tick,
    },

    #[error("engine stalled at tick {tick}: no runnable work but {incomplete} incomplete processes")]
    Stalled { tick: Tick, incomplete: usize },
}

/// Top-level simulation error
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("invalid process definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("scheduler invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}
