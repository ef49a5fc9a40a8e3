/*!
 * Property Tests
 * Cross-algorithm invariants over randomized workloads
 */

use proptest::prelude::*;
use schedsim::{simulate, Algorithm, Pid, ProcessSpec, RunReport, Tick};
use std::collections::HashSet;

fn arb_workload() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec(
        (
            prop::collection::vec(1i64..10, 1..4),
            prop::collection::vec(1i64..10, 0..4),
            0i64..6,
        ),
        1..6,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (cpu, mut io, arrival))| {
                io.truncate(cpu.len());
                ProcessSpec::new(format!("P{}", i + 1), cpu)
                    .with_io_bursts(io)
                    .with_arrival(arrival)
            })
            .collect()
    })
}

/// Every pid appears in at most one place per tick: the CPU, one ready
/// queue, or the IO-wait set
fn assert_exclusive_membership(report: &RunReport) {
    for snapshot in &report.timeline {
        let mut seen: HashSet<Pid> = HashSet::new();
        let members = snapshot
            .running
            .iter()
            .copied()
            .chain(snapshot.ready.iter().flatten().copied())
            .chain(snapshot.io_wait.iter().copied());
        for pid in members {
            assert!(
                seen.insert(pid),
                "pid {pid} appears twice at tick {}",
                snapshot.tick
            );
        }
    }
}

fn assert_metrics_consistent(specs: &[ProcessSpec], report: &RunReport) {
    for (spec, metrics) in specs.iter().zip(&report.summary.processes) {
        let cpu_total: i64 = spec.cpu_bursts.iter().sum();
        let io_total: i64 = spec.io_bursts.iter().sum();
        let burst_total = (cpu_total + io_total) as Tick;

        assert!(metrics.turnaround >= burst_total);
        assert_eq!(metrics.turnaround, burst_total + metrics.waiting);
        assert!(metrics.response <= metrics.turnaround);
    }
}

proptest! {
    #[test]
    fn prop_invariants_hold_for_every_algorithm(specs in arb_workload()) {
        for algorithm in Algorithm::ALL {
            let report = simulate(&specs, algorithm).unwrap();
            let summary = &report.summary;

            // Every process finished and was reported exactly once
            prop_assert_eq!(summary.processes.len(), specs.len());

            // Utilization is a fraction of elapsed ticks
            prop_assert!(summary.cpu_utilization >= 0.0);
            prop_assert!(summary.cpu_utilization <= 1.0);
            prop_assert_eq!(summary.busy_ticks + summary.idle_ticks, summary.total_ticks);

            // Every CPU tick of every process was served exactly once
            let cpu_total: i64 = specs.iter().flat_map(|s| &s.cpu_bursts).sum();
            prop_assert_eq!(summary.busy_ticks, cpu_total as Tick);

            prop_assert_eq!(report.timeline.len() as Tick, summary.total_ticks);
            assert_exclusive_membership(&report);
            assert_metrics_consistent(&specs, &report);
        }
    }

    #[test]
    fn prop_no_io_workload_with_zero_arrivals_is_fully_utilized(
        bursts in prop::collection::vec(prop::collection::vec(1i64..10, 1..4), 1..5)
    ) {
        let specs: Vec<ProcessSpec> = bursts
            .into_iter()
            .enumerate()
            .map(|(i, cpu)| ProcessSpec::new(format!("P{}", i + 1), cpu))
            .collect();

        for algorithm in Algorithm::ALL {
            let report = simulate(&specs, algorithm).unwrap();
            prop_assert_eq!(report.summary.cpu_utilization, 1.0);
            prop_assert_eq!(report.summary.idle_ticks, 0);
        }
    }

    #[test]
    fn prop_fcfs_and_sjf_never_preempt(specs in arb_workload()) {
        for algorithm in [Algorithm::Fcfs, Algorithm::Sjf] {
            let report = simulate(&specs, algorithm).unwrap();
            let no_demotions = report
                .events
                .iter()
                .all(|e| !matches!(e.kind, schedsim::EventKind::Demoted { .. }));
            prop_assert!(no_demotions, "{algorithm} demoted a process");
        }
    }
}
