/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID type
pub type Pid = u32;

/// Simulated clock value in ticks
pub type Tick = u64;

/// Scheduling algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// First-come-first-serve: arrival order, run to burst completion
    Fcfs,
    /// Shortest job first: smallest next CPU burst, non-preemptive
    Sjf,
    /// Three-level multi-level feedback queue with quantum-based demotion
    Mlfq,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Fcfs, Algorithm::Sjf, Algorithm::Mlfq];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fcfs => write!(f, "FCFS"),
            Algorithm::Sjf => write!(f, "SJF"),
            Algorithm::Mlfq => write!(f, "MLFQ"),
        }
    }
}

/// MLFQ queue level, carried on the process as a tagged variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    One,
    Two,
    Three,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    /// Queue index for this level
    pub fn index(self) -> usize {
        match self {
            Level::One => 0,
            Level::Two => 1,
            Level::Three => 2,
        }
    }

    /// Level reached after one demotion; level three never demotes further
    pub fn demoted(self) -> Level {
        match self {
            Level::One => Level::Two,
            Level::Two | Level::Three => Level::Three,
        }
    }

    /// Human-facing level number (1-3)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_demotion_chain() {
        assert_eq!(Level::One.demoted(), Level::Two);
        assert_eq!(Level::Two.demoted(), Level::Three);
        assert_eq!(Level::Three.demoted(), Level::Three);
    }

    #[test]
    fn test_level_indices() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
            assert_eq!(level.number() as usize, i + 1);
        }
    }
}
