/*!
 * Workload Definitions
 * Process definitions supplied by loaders, validation, and the built-in demo set
 */

use super::model::Process;
use crate::core::errors::DefinitionError;
use crate::core::types::{Pid, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One process definition as supplied by an external loader.
///
/// Durations are signed so that bad input (negative bursts) can be reported
/// instead of silently wrapping; validation converts to tick counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    pub name: String,
    pub cpu_bursts: Vec<i64>,
    #[serde(default)]
    pub io_bursts: Vec<i64>,
    #[serde(default)]
    pub arrival: i64,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, cpu_bursts: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            cpu_bursts,
            io_bursts: vec![],
            arrival: 0,
        }
    }

    pub fn with_io_bursts(mut self, io_bursts: Vec<i64>) -> Self {
        self.io_bursts = io_bursts;
        self
    }

    pub fn with_arrival(mut self, arrival: i64) -> Self {
        self.arrival = arrival;
        self
    }

    /// Fail-fast validation, run before any simulation starts
    fn validate(&self) -> Result<(), DefinitionError> {
        if self.cpu_bursts.is_empty() {
            return Err(DefinitionError::EmptyCpuBursts {
                name: self.name.clone(),
            });
        }
        if self.io_bursts.len() > self.cpu_bursts.len() {
            return Err(DefinitionError::TooManyIoBursts {
                name: self.name.clone(),
                cpu: self.cpu_bursts.len(),
                io: self.io_bursts.len(),
            });
        }
        for &duration in self.cpu_bursts.iter().chain(self.io_bursts.iter()) {
            if duration <= 0 {
                return Err(DefinitionError::NonPositiveBurst {
                    name: self.name.clone(),
                    duration,
                });
            }
        }
        if self.arrival < 0 {
            return Err(DefinitionError::NegativeArrival {
                name: self.name.clone(),
                arrival: self.arrival,
            });
        }
        Ok(())
    }
}

/// Validate a workload and build the process table for one run.
///
/// Pids are assigned in definition order and double as table indices, so
/// each algorithm run gets a fresh table from the same definitions.
pub(crate) fn build_table(specs: &[ProcessSpec]) -> Result<Vec<Process>, DefinitionError> {
    if specs.is_empty() {
        return Err(DefinitionError::EmptyWorkload);
    }

    let mut seen = HashSet::new();
    let mut table = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        spec.validate()?;
        if !seen.insert(spec.name.as_str()) {
            return Err(DefinitionError::DuplicateName {
                name: spec.name.clone(),
            });
        }

        let cpu = spec.cpu_bursts.iter().map(|&d| d as Tick).collect();
        let io = spec.io_bursts.iter().map(|&d| d as Tick).collect();
        table.push(Process::new(
            index as Pid,
            spec.name.clone(),
            cpu,
            io,
            spec.arrival as Tick,
        ));
    }
    Ok(table)
}

/// The preloaded eight-process demo workload.
///
/// Every process starts at tick 0 and alternates CPU and IO bursts; the IO
/// list is one shorter than the CPU list, so the final CPU burst runs to
/// completion without a trailing wait.
pub fn demo_workload() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("P1", vec![5, 3, 5, 4, 6, 4, 3, 4])
            .with_io_bursts(vec![27, 31, 43, 18, 22, 26, 24]),
        ProcessSpec::new("P2", vec![4, 5, 7, 12, 9, 4, 9, 7, 8])
            .with_io_bursts(vec![48, 44, 42, 37, 76, 41, 31, 43]),
        ProcessSpec::new("P3", vec![8, 12, 18, 14, 4, 15, 14, 5, 6])
            .with_io_bursts(vec![33, 41, 65, 21, 61, 18, 26, 31]),
        ProcessSpec::new("P4", vec![3, 4, 5, 3, 4, 5, 6, 5, 3])
            .with_io_bursts(vec![35, 41, 45, 51, 61, 54, 82, 77]),
        ProcessSpec::new("P5", vec![16, 17, 5, 16, 7, 13, 11, 6, 3, 4])
            .with_io_bursts(vec![24, 21, 36, 26, 31, 28, 21, 13, 11]),
        ProcessSpec::new("P6", vec![11, 4, 5, 6, 7, 9, 12, 15, 8])
            .with_io_bursts(vec![22, 8, 10, 12, 14, 18, 24, 30]),
        ProcessSpec::new("P7", vec![14, 17, 11, 15, 4, 7, 16, 10])
            .with_io_bursts(vec![46, 41, 42, 21, 32, 19, 33]),
        ProcessSpec::new("P8", vec![4, 5, 6, 14, 16, 6]).with_io_bursts(vec![14, 33, 51, 73, 87]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_workload_is_valid() {
        let table = build_table(&demo_workload()).unwrap();
        assert_eq!(table.len(), 8);
        assert_eq!(table[0].name(), "P1");
        assert_eq!(table[0].pid(), 0);
    }

    #[test]
    fn test_empty_cpu_bursts_rejected() {
        let spec = ProcessSpec::new("bad", vec![]);
        assert_eq!(
            build_table(&[spec]).unwrap_err(),
            DefinitionError::EmptyCpuBursts { name: "bad".into() }
        );
    }

    #[test]
    fn test_negative_duration_rejected() {
        let spec = ProcessSpec::new("bad", vec![4, -2]);
        assert!(matches!(
            build_table(&[spec]).unwrap_err(),
            DefinitionError::NonPositiveBurst { duration: -2, .. }
        ));
    }

    #[test]
    fn test_io_longer_than_cpu_rejected() {
        let spec = ProcessSpec::new("bad", vec![4]).with_io_bursts(vec![1, 2]);
        assert!(matches!(
            build_table(&[spec]).unwrap_err(),
            DefinitionError::TooManyIoBursts { cpu: 1, io: 2, .. }
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let specs = vec![
            ProcessSpec::new("a", vec![1]),
            ProcessSpec::new("a", vec![2]),
        ];
        assert_eq!(
            build_table(&specs).unwrap_err(),
            DefinitionError::DuplicateName { name: "a".into() }
        );
    }

    #[test]
    fn test_empty_workload_rejected() {
        assert_eq!(
            build_table(&[]).unwrap_err(),
            DefinitionError::EmptyWorkload
        );
    }
}
