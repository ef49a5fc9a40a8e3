/*!
 * Scheduling Simulator - Demo Entry Point
 *
 * Runs the preloaded workload under all three algorithms and prints a
 * comparative report. Pass `--json` for a machine-readable report including
 * the full per-tick timeline.
 */

use anyhow::Result;
use log::info;
use schedsim::{demo_workload, simulate_all, RunReport};

fn print_report(report: &RunReport) {
    let summary = &report.summary;
    println!("=== {} ===", summary.algorithm);

    for process in &summary.processes {
        println!(
            "{}: turnaround={}, waiting={}, response={}, completed at tick {}",
            process.name, process.turnaround, process.waiting, process.response,
            process.completion
        );
    }

    println!("Total time: {}", summary.total_ticks);
    println!("Turnaround Time: {:.2}", summary.avg_turnaround);
    println!("Waiting Time: {:.2}", summary.avg_waiting);
    println!("Response Time: {:.2}", summary.avg_response);
    println!("CPU Utilization: {:.2}%", summary.cpu_utilization * 100.0);
    println!();
}

fn main() -> Result<()> {
    env_logger::init();

    let workload = demo_workload();
    info!("Simulating {} processes", workload.len());

    let reports = simulate_all(&workload)?;

    if std::env::args().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    Ok(())
}
