/*!
 * Metrics & Timeline Recorder
 * Per-tick snapshots, lifecycle events, and run-level summaries
 */

use crate::core::types::{Algorithm, Level, Pid, Tick};
use crate::process::ProcessMetrics;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// State of the machine during one tick, for external visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TickSnapshot {
    pub tick: Tick,
    /// Pid holding the CPU this tick, or None for an idle tick
    pub running: Option<Pid>,
    /// Ready queue contents per MLFQ level (FCFS/SJF only populate the first)
    pub ready: [Vec<Pid>; 3],
    /// IO-wait set contents, in insertion order
    pub io_wait: Vec<Pid>,
}

/// Lifecycle event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// First dispatch of the process
    Started,
    /// Quantum expiry demoted the process one level
    Demoted { from: Level, to: Level },
    /// All bursts consumed
    Completed,
}

/// One lifecycle event on the shared timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedEvent {
    pub tick: Tick,
    pub pid: Pid,
    pub kind: EventKind,
}

/// Run-level summary across all processes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub total_ticks: Tick,
    pub busy_ticks: Tick,
    pub idle_ticks: Tick,
    /// Fraction of elapsed ticks with a process on the CPU, in [0, 1]
    pub cpu_utilization: f64,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub processes: Vec<ProcessMetrics>,
}

/// Full output of one algorithm's run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunReport {
    pub summary: RunSummary,
    pub timeline: Vec<TickSnapshot>,
    pub events: Vec<SchedEvent>,
}

/// Accumulates timeline and events while the engine runs
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    timeline: Vec<TickSnapshot>,
    events: Vec<SchedEvent>,
    metrics: Vec<ProcessMetrics>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&mut self, snapshot: TickSnapshot) {
        self.timeline.push(snapshot);
    }

    pub fn started(&mut self, tick: Tick, pid: Pid) {
        debug!("P{pid} first scheduled at tick {tick}");
        self.events.push(SchedEvent {
            tick,
            pid,
            kind: EventKind::Started,
        });
    }

    pub fn demoted(&mut self, tick: Tick, pid: Pid, from: Level, to: Level) {
        info!("P{pid} demoted from level {from} to level {to} at tick {tick}");
        self.events.push(SchedEvent {
            tick,
            pid,
            kind: EventKind::Demoted { from, to },
        });
    }

    pub fn completed(&mut self, tick: Tick, metrics: ProcessMetrics) {
        info!(
            "P{} completed at tick {tick}: turnaround={}, waiting={}, response={}",
            metrics.pid, metrics.turnaround, metrics.waiting, metrics.response
        );
        self.events.push(SchedEvent {
            tick,
            pid: metrics.pid,
            kind: EventKind::Completed,
        });
        self.metrics.push(metrics);
    }

    /// Close the run and compute averages and utilization
    pub fn finish(mut self, algorithm: Algorithm) -> RunReport {
        self.metrics.sort_by_key(|m| m.pid);

        let total_ticks = self.timeline.len() as Tick;
        let busy_ticks = self.timeline.iter().filter(|s| s.running.is_some()).count() as Tick;

        let summary = RunSummary {
            algorithm,
            total_ticks,
            busy_ticks,
            idle_ticks: total_ticks - busy_ticks,
            cpu_utilization: if total_ticks == 0 {
                0.0
            } else {
                busy_ticks as f64 / total_ticks as f64
            },
            avg_turnaround: average(&self.metrics, |m| m.turnaround),
            avg_waiting: average(&self.metrics, |m| m.waiting),
            avg_response: average(&self.metrics, |m| m.response),
            processes: self.metrics,
        };

        info!(
            "{algorithm} run complete: {} ticks, utilization {:.2}%",
            summary.total_ticks,
            summary.cpu_utilization * 100.0
        );

        RunReport {
            summary,
            timeline: self.timeline,
            events: self.events,
        }
    }
}

fn average(metrics: &[ProcessMetrics], f: fn(&ProcessMetrics) -> Tick) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.iter().map(|m| f(m) as f64).sum::<f64>() / metrics.len() as f64
}
