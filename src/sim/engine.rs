/*!
 * Tick Engine
 * Discrete-time simulation driver: admission, dispatch, burst advancement,
 * quantum enforcement, and termination
 */

use super::policy::{policy_for, Policy};
use super::queues::QueueManager;
use super::recorder::{Recorder, RunReport, TickSnapshot};
use crate::core::errors::{InvariantError, SimResult};
use crate::core::types::{Algorithm, Pid, Tick};
use crate::process::model::{CpuOutcome, IoOutcome};
use crate::process::workload::build_table;
use crate::process::{Process, ProcessSpec, ProcessState};
use log::{debug, info};

/// One algorithm's simulation run.
///
/// Owns the clock, the process table, and the queue set for the duration of
/// the run; every run is built fresh from the same definitions so runs never
/// share mutable state.
pub(crate) struct Engine {
    table: Vec<Process>,
    queues: QueueManager,
    policy: Box<dyn Policy>,
    recorder: Recorder,
    /// (arrival, pid) sorted by arrival then definition order
    arrivals: Vec<(Tick, Pid)>,
    next_arrival: usize,
    clock: Tick,
    running: Option<Pid>,
}

impl Engine {
    pub fn new(specs: &[ProcessSpec], algorithm: Algorithm) -> SimResult<Self> {
        let table = build_table(specs)?;

        let mut arrivals: Vec<(Tick, Pid)> =
            table.iter().map(|p| (p.arrival(), p.pid())).collect();
        arrivals.sort_by_key(|&(arrival, pid)| (arrival, pid));

        Ok(Self {
            queues: QueueManager::new(table.len()),
            table,
            policy: policy_for(algorithm),
            recorder: Recorder::new(),
            arrivals,
            next_arrival: 0,
            clock: 0,
            running: None,
        })
    }

    /// Drive the simulation to completion
    pub fn run(mut self) -> SimResult<RunReport> {
        let algorithm = self.policy.algorithm();
        info!(
            "{algorithm} run starting with {} processes",
            self.table.len()
        );

        let total = self.table.len();
        let mut completed = 0;
        while completed < total {
            self.tick(&mut completed)?;
        }

        Ok(self.recorder.finish(algorithm))
    }

    /// Advance the simulation by one tick.
    ///
    /// Order within the tick: admission, dispatch, snapshot and waiting
    /// accounting, CPU advance (with quantum enforcement), then IO advance.
    /// IO is advanced last and skips processes that entered IO this tick, so
    /// a tick is charged to exactly one of CPU, IO, or waiting per process;
    /// IO completers become eligible for dispatch on the following tick.
    fn tick(&mut self, completed: &mut usize) -> SimResult<()> {
        let now = self.clock;

        // Admit processes whose arrival tick has come
        while let Some(&(arrival, pid)) = self.arrivals.get(self.next_arrival) {
            if arrival > now {
                break;
            }
            let level = self.table[pid as usize].level();
            self.queues.enqueue_ready(pid, level)?;
            self.next_arrival += 1;
        }

        // Dispatch if the CPU is idle
        if self.running.is_none() {
            if let Some(pid) = self.policy.select_next(&mut self.queues, &self.table) {
                let process = &mut self.table[pid as usize];
                process.set_state(ProcessState::Running);
                self.policy.on_dispatch(process);
                debug!("P{pid} dispatched at tick {now} (level {})", process.level());
                if process.record_first_run(now) {
                    self.recorder.started(now, pid);
                }
                self.running = Some(pid);
            }
        }

        // State during this tick, before anything advances
        self.recorder.snapshot(TickSnapshot {
            tick: now,
            running: self.running,
            ready: self.queues.ready_snapshot(),
            io_wait: self.queues.io_wait().to_vec(),
        });

        // Everything still queued spends this tick waiting
        let queued: Vec<Pid> = self.queues.ready_pids().collect();
        for pid in queued {
            self.table[pid as usize].waited += 1;
        }

        // Advance the running process by one CPU tick
        if let Some(pid) = self.running {
            let process = &mut self.table[pid as usize];
            if let Some(quantum) = process.quantum.as_mut() {
                *quantum -= 1;
            }
            let outcome = process.advance_cpu(now)?;
            let quantum_expired = process.quantum == Some(0);

            match outcome {
                CpuOutcome::InBurst => {
                    if quantum_expired {
                        // Preempt and demote; the CPU is idle for the next
                        // tick's selection
                        self.running = None;
                        let process = &mut self.table[pid as usize];
                        let from = process.level;
                        self.policy.on_preempt(process);
                        let to = process.level;
                        process.quantum = None;
                        process.set_state(ProcessState::Ready);
                        self.queues.enqueue_ready(pid, to)?;
                        self.recorder.demoted(now + 1, pid, from, to);
                    }
                }
                CpuOutcome::NextBurst => {
                    // Burst boundary with no IO in between: back to the tail
                    // of the current level's queue, no demotion
                    self.running = None;
                    let process = &mut self.table[pid as usize];
                    process.quantum = None;
                    let level = process.level;
                    self.queues.enqueue_ready(pid, level)?;
                }
                CpuOutcome::EnteredIo => {
                    self.running = None;
                    self.table[pid as usize].quantum = None;
                    self.queues.move_to_io_wait(pid)?;
                }
                CpuOutcome::Completed => {
                    self.running = None;
                    self.queues.release(pid);
                    let metrics = self.table[pid as usize].metrics()?;
                    self.recorder.completed(now + 1, metrics);
                    *completed += 1;
                }
            }
        }

        // Advance IO for everyone that was already waiting at tick start
        let waiters: Vec<Pid> = self.queues.io_wait().to_vec();
        for pid in waiters {
            let process = &mut self.table[pid as usize];
            if process.io_entered_at == Some(now) {
                continue;
            }
            match process.advance_io(now)? {
                IoOutcome::InBurst => {}
                IoOutcome::BackToReady => {
                    let level = process.level;
                    self.queues.move_from_io_wait(pid)?;
                    self.queues.enqueue_ready(pid, level)?;
                }
                IoOutcome::Completed => {
                    self.queues.move_from_io_wait(pid)?;
                    let metrics = self.table[pid as usize].metrics()?;
                    self.recorder.completed(now + 1, metrics);
                    *completed += 1;
                }
            }
        }

        self.clock = now + 1;

        // A tick with nothing runnable, nothing waiting, and nothing still to
        // arrive cannot make progress
        if *completed < self.table.len()
            && self.running.is_none()
            && !self.queues.has_ready()
            && !self.queues.has_io_waiters()
            && self.next_arrival >= self.arrivals.len()
        {
            return Err(InvariantError::Stalled {
                tick: self.clock,
                incomplete: self.table.len() - *completed,
            }
            .into());
        }

        Ok(())
    }
}

/// Simulate one algorithm over a workload
pub fn simulate(specs: &[ProcessSpec], algorithm: Algorithm) -> SimResult<RunReport> {
    Engine::new(specs, algorithm)?.run()
}

/// Simulate all three algorithms over the same workload, each from a fresh
/// copy of the initial process set
pub fn simulate_all(specs: &[ProcessSpec]) -> SimResult<Vec<RunReport>> {
    Algorithm::ALL
        .iter()
        .map(|&algorithm| simulate(specs, algorithm))
        .collect()
}
