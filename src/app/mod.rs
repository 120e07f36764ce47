//! Application layer: cycle orchestration and scheduling.

mod coordinator;
mod runner;

pub use coordinator::{Coordinator, CycleReport, TrackingPlan};
pub use runner::Runner;
