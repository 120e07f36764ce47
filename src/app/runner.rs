//! Fixed-interval scheduling with single-flight cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use super::{Coordinator, CycleReport, TrackingPlan};

/// Drives the coordinator on a fixed interval.
///
/// Cycles never overlap: if a tick fires while the previous cycle is still
/// running, the tick is dropped, not queued. The next cycle simply sees a
/// larger delta.
pub struct Runner {
    coordinator: Arc<Mutex<Coordinator>>,
    plan: TrackingPlan,
    poll_interval: Duration,
}

impl Runner {
    #[must_use]
    pub fn new(coordinator: Coordinator, plan: TrackingPlan, poll_interval: Duration) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
            plan,
            poll_interval,
        }
    }

    /// Run a single cycle, waiting for any in-flight cycle to finish.
    pub async fn run_once(&self) -> CycleReport {
        self.coordinator.lock().await.run_cycle(&self.plan).await
    }

    /// Poll forever. Runs until the surrounding task is cancelled.
    pub async fn run(&self) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            collections = self.plan.len(),
            "Starting poll loop"
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.coordinator.try_lock() {
                Ok(mut coordinator) => {
                    coordinator.run_cycle(&self.plan).await;
                }
                Err(_) => {
                    warn!("Previous poll cycle still in flight, dropping tick");
                }
            }
        }
    }
}
