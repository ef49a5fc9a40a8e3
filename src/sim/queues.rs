/*!
 * Queue Manager
 * Ready queues, IO-wait set, and per-process location tracking
 */

use crate::core::errors::InvariantError;
use crate::core::types::{Level, Pid};
use crate::process::Process;
use std::collections::VecDeque;
use std::fmt;

/// Location of a process within the queue set.
///
/// Every admitted process occupies exactly one location per tick; the index
/// makes double-queueing detectable in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueueLocation {
    /// In the ready queue of the given level
    Ready(Level),
    /// In the IO-wait set
    IoWait,
    /// Holding the CPU
    Current,
    /// Not yet admitted, or complete
    Unqueued,
}

impl fmt::Display for QueueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueLocation::Ready(level) => write!(f, "ready queue level {level}"),
            QueueLocation::IoWait => write!(f, "io-wait set"),
            QueueLocation::Current => write!(f, "cpu"),
            QueueLocation::Unqueued => write!(f, "unqueued"),
        }
    }
}

/// Ready queues (one per MLFQ level; FCFS/SJF only use level one) plus the
/// insertion-ordered IO-wait set.
#[derive(Debug)]
pub(crate) struct QueueManager {
    ready: [VecDeque<Pid>; 3],
    io_wait: Vec<Pid>,
    locations: Vec<QueueLocation>,
}

impl QueueManager {
    pub fn new(process_count: usize) -> Self {
        Self {
            ready: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
            io_wait: Vec::new(),
            locations: vec![QueueLocation::Unqueued; process_count],
        }
    }

    pub fn location(&self, pid: Pid) -> QueueLocation {
        self.locations[pid as usize]
    }

    /// Enqueue at the tail of the given level's ready queue.
    ///
    /// Only legal from `Unqueued` (admission, IO return) or `Current`
    /// (preemption, burst boundary); anything else is a double queue.
    pub fn enqueue_ready(&mut self, pid: Pid, level: Level) -> Result<(), InvariantError> {
        match self.location(pid) {
            QueueLocation::Unqueued | QueueLocation::Current => {
                self.ready[level.index()].push_back(pid);
                self.locations[pid as usize] = QueueLocation::Ready(level);
                Ok(())
            }
            location => Err(InvariantError::DoubleQueued {
                pid,
                location: location.to_string(),
            }),
        }
    }

    /// Dequeue the head of the given level's queue; the process becomes the
    /// current one.
    pub fn pop_front(&mut self, level: Level) -> Option<Pid> {
        let pid = self.ready[level.index()].pop_front()?;
        self.locations[pid as usize] = QueueLocation::Current;
        Some(pid)
    }

    /// Dequeue the process with the smallest remaining current CPU burst.
    ///
    /// The scan is stable, so exact ties resolve in insertion order.
    pub fn pop_shortest(&mut self, level: Level, table: &[Process]) -> Option<Pid> {
        let queue = &mut self.ready[level.index()];
        let best = queue
            .iter()
            .enumerate()
            .min_by_key(|&(_, &pid)| table[pid as usize].remaining())?
            .0;
        let pid = queue.remove(best)?;
        self.locations[pid as usize] = QueueLocation::Current;
        Some(pid)
    }

    /// Move the current process into the IO-wait set
    pub fn move_to_io_wait(&mut self, pid: Pid) -> Result<(), InvariantError> {
        match self.location(pid) {
            QueueLocation::Current => {
                self.io_wait.push(pid);
                self.locations[pid as usize] = QueueLocation::IoWait;
                Ok(())
            }
            location => Err(InvariantError::DoubleQueued {
                pid,
                location: location.to_string(),
            }),
        }
    }

    /// Remove a process from the IO-wait set; the caller re-enqueues it
    pub fn move_from_io_wait(&mut self, pid: Pid) -> Result<(), InvariantError> {
        let pos = self
            .io_wait
            .iter()
            .position(|&p| p == pid)
            .ok_or(InvariantError::NotWaitingOnIo { pid })?;
        self.io_wait.remove(pos);
        self.locations[pid as usize] = QueueLocation::Unqueued;
        Ok(())
    }

    /// Release the current process entirely (completion)
    pub fn release(&mut self, pid: Pid) {
        debug_assert_eq!(self.location(pid), QueueLocation::Current);
        self.locations[pid as usize] = QueueLocation::Unqueued;
    }

    /// Pids currently in the IO-wait set, in insertion order
    pub fn io_wait(&self) -> &[Pid] {
        &self.io_wait
    }

    /// Iterate over every queued READY pid across all levels
    pub fn ready_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.ready.iter().flat_map(|q| q.iter().copied())
    }

    /// Snapshot of each level's ready queue contents
    pub fn ready_snapshot(&self) -> [Vec<Pid>; 3] {
        [
            self.ready[0].iter().copied().collect(),
            self.ready[1].iter().copied().collect(),
            self.ready[2].iter().copied().collect(),
        ]
    }

    pub fn has_ready(&self) -> bool {
        self.ready.iter().any(|q| !q.is_empty())
    }

    pub fn has_io_waiters(&self) -> bool {
        !self.io_wait.is_empty()
    }
}
