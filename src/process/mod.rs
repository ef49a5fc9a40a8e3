/*!
 * Process Module
 * Process definitions, burst state machine, and metrics
 */

pub mod model;
pub mod workload;

// Re-export for convenience
pub use model::{Process, ProcessMetrics, ProcessState};
pub use workload::{demo_workload, ProcessSpec};
