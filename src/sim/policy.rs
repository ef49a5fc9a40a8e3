/*!
 * Algorithm Policies
 * Pluggable selection, dispatch, and preemption rules for the tick engine
 */

use super::queues::QueueManager;
use crate::core::types::{Algorithm, Level, Pid, Tick};
use crate::process::Process;

/// Level-one time quantum for MLFQ
pub const MLFQ_L1_QUANTUM: Tick = 5;
/// Level-two time quantum for MLFQ
pub const MLFQ_L2_QUANTUM: Tick = 10;

/// Scheduling policy capability set.
///
/// The tick engine is written once against this trait; the three algorithms
/// differ only in how they pick the next process and what they do with the
/// quantum on dispatch and preemption.
pub(crate) trait Policy {
    fn algorithm(&self) -> Algorithm;

    /// Pick and dequeue the next process to run, or None if nothing is ready
    fn select_next(&self, queues: &mut QueueManager, table: &[Process]) -> Option<Pid>;

    /// Initialize the per-dispatch quantum on the freshly selected process
    fn on_dispatch(&self, process: &mut Process);

    /// React to quantum expiry before the engine re-enqueues the process
    fn on_preempt(&self, process: &mut Process);
}

pub(crate) fn policy_for(algorithm: Algorithm) -> Box<dyn Policy> {
    match algorithm {
        Algorithm::Fcfs => Box::new(Fcfs),
        Algorithm::Sjf => Box::new(Sjf),
        Algorithm::Mlfq => Box::new(Mlfq),
    }
}

/// First-come-first-serve: head of the flat queue, run to burst completion
pub(crate) struct Fcfs;

impl Policy for Fcfs {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn select_next(&self, queues: &mut QueueManager, _table: &[Process]) -> Option<Pid> {
        queues.pop_front(Level::One)
    }

    fn on_dispatch(&self, process: &mut Process) {
        process.quantum = None;
    }

    fn on_preempt(&self, _process: &mut Process) {
        // Unbounded quantum: the engine never preempts under FCFS
        debug_assert!(false, "FCFS dispatches are never preempted");
    }
}

/// Shortest job first: smallest remaining current CPU burst, non-preemptive,
/// ties broken by insertion order
pub(crate) struct Sjf;

impl Policy for Sjf {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sjf
    }

    fn select_next(&self, queues: &mut QueueManager, table: &[Process]) -> Option<Pid> {
        queues.pop_shortest(Level::One, table)
    }

    fn on_dispatch(&self, process: &mut Process) {
        process.quantum = None;
    }

    fn on_preempt(&self, _process: &mut Process) {
        debug_assert!(false, "SJF dispatches are never preempted");
    }
}

/// Three-level feedback queue: scan levels top-down, quantum-bounded round
/// robin on levels one and two, FCFS on level three, demotion on expiry
pub(crate) struct Mlfq;

impl Policy for Mlfq {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Mlfq
    }

    fn select_next(&self, queues: &mut QueueManager, _table: &[Process]) -> Option<Pid> {
        Level::ALL.iter().find_map(|&level| queues.pop_front(level))
    }

    fn on_dispatch(&self, process: &mut Process) {
        process.quantum = match process.level {
            Level::One => Some(MLFQ_L1_QUANTUM),
            Level::Two => Some(MLFQ_L2_QUANTUM),
            Level::Three => None,
        };
    }

    fn on_preempt(&self, process: &mut Process) {
        process.level = process.level.demoted();
    }
}
