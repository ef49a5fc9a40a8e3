/*!
 * Process Model
 * Per-process burst state machine and finalized metrics
 */

use crate::core::errors::InvariantError;
use crate::core::types::{Level, Pid, Tick};
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Ready to run, sitting in a ready queue
    Ready,
    /// Currently holding the CPU
    Running,
    /// Waiting for an IO burst to finish
    Waiting,
    /// All bursts consumed; metrics are final
    Complete,
}

/// Result of advancing a CPU burst by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuOutcome {
    /// Burst still has time left
    InBurst,
    /// Burst finished and the next CPU burst begins (no IO burst at this index)
    NextBurst,
    /// Burst finished and the process entered its IO burst
    EnteredIo,
    /// Burst finished and no bursts remain
    Completed,
}

/// Result of advancing an IO burst by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOutcome {
    /// Burst still has time left
    InBurst,
    /// IO finished and the next CPU burst begins
    BackToReady,
    /// Trailing IO finished and no bursts remain
    Completed,
}

/// One simulated process.
///
/// Bursts alternate CPU, IO, CPU, IO, ... indexed by a single cursor: CPU
/// burst `i` is followed by IO burst `i` when one exists. The cursor only
/// moves forward and `remaining` refers to the CPU burst while READY/RUNNING
/// and to the IO burst while WAITING.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    cpu_bursts: Vec<Tick>,
    io_bursts: Vec<Tick>,

    state: ProcessState,
    cursor: usize,
    remaining: Tick,

    arrival: Tick,
    first_run: Option<Tick>,
    completion: Option<Tick>,
    /// Ticks spent sitting in a ready queue
    pub(crate) waited: Tick,
    /// Tick at which the current IO burst was entered
    pub(crate) io_entered_at: Option<Tick>,

    /// Current MLFQ level; stays at level one under FCFS/SJF
    pub(crate) level: Level,
    /// Remaining quantum in the current dispatch; None means unbounded
    pub(crate) quantum: Option<Tick>,
}

/// Finalized per-process metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub name: String,
    pub turnaround: Tick,
    pub waiting: Tick,
    pub response: Tick,
    pub completion: Tick,
}

impl Process {
    /// Build a process from validated burst sequences.
    ///
    /// Callers must guarantee non-empty CPU bursts, strictly positive
    /// durations, and `io_bursts.len() <= cpu_bursts.len()`; the workload
    /// loader enforces this before any run starts.
    pub(crate) fn new(
        pid: Pid,
        name: String,
        cpu_bursts: Vec<Tick>,
        io_bursts: Vec<Tick>,
        arrival: Tick,
    ) -> Self {
        let remaining = cpu_bursts[0];
        Self {
            pid,
            name,
            cpu_bursts,
            io_bursts,
            state: ProcessState::Ready,
            cursor: 0,
            remaining,
            arrival,
            first_run: None,
            completion: None,
            waited: 0,
            io_entered_at: None,
            level: Level::One,
            quantum: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    /// Remaining ticks in the active burst (CPU while READY/RUNNING, IO while WAITING)
    pub fn remaining(&self) -> Tick {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.state == ProcessState::Complete
    }

    pub fn total_cpu(&self) -> Tick {
        self.cpu_bursts.iter().sum()
    }

    pub fn total_io(&self) -> Tick {
        self.io_bursts.iter().sum()
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Record the first dispatch tick; returns true the first time
    pub(crate) fn record_first_run(&mut self, tick: Tick) -> bool {
        if self.first_run.is_none() {
            self.first_run = Some(tick);
            true
        } else {
            false
        }
    }

    /// Advance the active CPU burst by one tick during tick `now`.
    ///
    /// Completion is stamped `now + 1`: a burst that finishes during tick
    /// `now` releases the CPU at the following tick boundary.
    pub(crate) fn advance_cpu(&mut self, now: Tick) -> Result<CpuOutcome, InvariantError> {
        if self.state == ProcessState::Complete {
            return Err(InvariantError::CompletedProcessTicked {
                pid: self.pid,
                tick: now,
            });
        }
        debug_assert_eq!(self.state, ProcessState::Running);

        self.remaining -= 1;
        if self.remaining > 0 {
            return Ok(CpuOutcome::InBurst);
        }

        if let Some(&io) = self.io_bursts.get(self.cursor) {
            self.state = ProcessState::Waiting;
            self.remaining = io;
            self.io_entered_at = Some(now);
            Ok(CpuOutcome::EnteredIo)
        } else if self.cursor + 1 < self.cpu_bursts.len() {
            self.cursor += 1;
            self.remaining = self.cpu_bursts[self.cursor];
            self.state = ProcessState::Ready;
            Ok(CpuOutcome::NextBurst)
        } else {
            self.state = ProcessState::Complete;
            self.completion = Some(now + 1);
            Ok(CpuOutcome::Completed)
        }
    }

    /// Advance the active IO burst by one tick during tick `now`.
    pub(crate) fn advance_io(&mut self, now: Tick) -> Result<IoOutcome, InvariantError> {
        if self.state == ProcessState::Complete {
            return Err(InvariantError::CompletedProcessTicked {
                pid: self.pid,
                tick: now,
            });
        }
        debug_assert_eq!(self.state, ProcessState::Waiting);

        self.remaining -= 1;
        if self.remaining > 0 {
            return Ok(IoOutcome::InBurst);
        }

        self.io_entered_at = None;
        if self.cursor + 1 < self.cpu_bursts.len() {
            self.cursor += 1;
            self.remaining = self.cpu_bursts[self.cursor];
            self.state = ProcessState::Ready;
            Ok(IoOutcome::BackToReady)
        } else {
            // Trailing IO burst: the IO list is as long as the CPU list
            self.state = ProcessState::Complete;
            self.completion = Some(now + 1);
            Ok(IoOutcome::Completed)
        }
    }

    /// Finalize metrics once COMPLETE.
    ///
    /// The waiting metric is computed from the turnaround formula and
    /// cross-checked against the per-tick waiting counter; a mismatch means
    /// the engine double-charged or lost a tick somewhere.
    pub(crate) fn metrics(&self) -> Result<ProcessMetrics, InvariantError> {
        let completion = self
            .completion
            .ok_or(InvariantError::MetricsBeforeCompletion { pid: self.pid })?;
        let first_run = self.first_run.unwrap_or(self.arrival);

        let turnaround = completion - self.arrival;
        let burst_total = self.total_cpu() + self.total_io();
        let waiting = turnaround.checked_sub(burst_total);

        if waiting != Some(self.waited) {
            return Err(InvariantError::MetricMismatch {
                pid: self.pid,
                turnaround,
                burst_total,
                accumulated: self.waited,
            });
        }

        Ok(ProcessMetrics {
            pid: self.pid,
            name: self.name.clone(),
            turnaround,
            waiting: self.waited,
            response: first_run - self.arrival,
            completion,
        })
    }
}
