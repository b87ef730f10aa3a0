use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::orchestrator::Orchestrator;

/// Runs cycles back to back on a fixed cadence. Cycles never overlap;
/// the wait for the next one starts only after the current one finishes.
pub struct CycleScheduler {
    orchestrator: Orchestrator,
    interval: Duration,
}

impl CycleScheduler {
    pub fn new(orchestrator: Orchestrator, config: &SchedulerConfig) -> Self {
        CycleScheduler {
            orchestrator,
            interval: Duration::from_secs(config.check_interval_hours * 3600),
        }
    }

    /// Loops until a shutdown signal arrives between cycles. The first
    /// cycle runs immediately on startup.
    pub async fn run(&self) {
        info!(
            "Scheduler started, running a cycle every {} hours",
            self.interval.as_secs() / 3600
        );

        loop {
            let outcome = self.orchestrator.run_cycle().await;
            info!("{}", outcome);

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping scheduler");
                    break;
                }
            }
        }
    }
}
