/*!
 * Simulation Module
 * Tick engine, queue management, policies, and the recorder
 */

mod engine;
mod policy;
mod queues;
mod recorder;

pub use engine::{simulate, simulate_all};
pub use policy::{MLFQ_L1_QUANTUM, MLFQ_L2_QUANTUM};
pub use recorder::{EventKind, RunReport, RunSummary, SchedEvent, TickSnapshot};
