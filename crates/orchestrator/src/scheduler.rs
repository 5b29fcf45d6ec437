//! Cron-driven settlement scheduling.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use tipster_core::config::SettlementJobConfig;

use crate::orchestrator::{SettlementOrchestrator, SettlementRunReport};

/// Runs the settlement batch on a cron cadence.
///
/// The host deployment is expected to run a single scheduler instance;
/// concurrent batches racing on the same pending positions are not safe.
pub struct SettlementScheduler {
    config: SettlementJobConfig,
    orchestrator: Arc<SettlementOrchestrator>,
}

impl SettlementScheduler {
    /// Creates a new settlement scheduler.
    #[must_use]
    pub fn new(config: SettlementJobConfig, orchestrator: Arc<SettlementOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// Starts the scheduler and runs according to the cron schedule.
    ///
    /// # Errors
    /// Returns an error if the scheduler fails to start or if job
    /// scheduling fails.
    pub async fn start(self) -> Result<()> {
        if !self.config.enabled {
            info!("Settlement scheduler is disabled");
            return Ok(());
        }

        info!(
            "Starting settlement scheduler with cron: {}",
            self.config.cron_schedule
        );

        let scheduler = JobScheduler::new().await?;
        let orchestrator = self.orchestrator.clone();
        let max_attempts = self.config.max_attempts.max(1);

        let job = Job::new_async(self.config.cron_schedule.as_str(), move |_uuid, _lock| {
            let orchestrator = orchestrator.clone();
            Box::pin(async move {
                if let Err(e) = run_with_retries(&orchestrator, max_attempts).await {
                    error!("Settlement batch failed after {max_attempts} attempts: {e}");
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Settlement scheduler started successfully");

        // Keep scheduler running
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
        }
    }

    /// Runs one settlement batch manually (one-time execution).
    ///
    /// # Errors
    /// Returns an error if discovery or persistence fails.
    pub async fn run_once(&self) -> Result<SettlementRunReport> {
        self.orchestrator.run_once(Utc::now()).await
    }
}

/// Bounded retry around one batch firing.
///
/// Safe to repeat: candidates are selected pending-only and the batch
/// persist is transactional, so a failed attempt leaves no partial state.
async fn run_with_retries(
    orchestrator: &SettlementOrchestrator,
    max_attempts: u32,
) -> Result<SettlementRunReport> {
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match orchestrator.run_once(Utc::now()).await {
            Ok(report) => {
                info!(
                    attempt,
                    settled = report.total_settled(),
                    experts = report.experts_recalculated,
                    "Settlement batch finished"
                );
                return Ok(report);
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "Settlement batch attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("settlement batch was never attempted")))
}
