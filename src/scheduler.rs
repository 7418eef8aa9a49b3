use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cycle::Orchestrator;

/// Drives the orchestrator on a fixed interval. The first cycle runs at once.
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Runs until the surrounding task is dropped.
    pub async fn run(&self, orchestrator: Arc<Orchestrator>) {
        let mut ticker = tokio::time::interval(self.period);
        // A slow cycle pushes the next one back instead of bursting to catch up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = self.period.as_secs(), "Scheduler started");

        loop {
            ticker.tick().await;
            let outcome = orchestrator.run_cycle().await;
            debug!(outcome = outcome.label(), summary = %outcome, "Scheduled cycle finished");
        }
    }
}
