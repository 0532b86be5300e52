use chrono::{DateTime, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::scan_service::{self, ScanContext};

/// Owned scheduler instance driving the periodic scan.
///
/// Constructed once at startup and held in the application state, so the
/// health endpoint can ask for the next run and tests can run the
/// orchestrator without a live timer.
pub struct ScanScheduler {
    scheduler: JobScheduler,
    scan_job_id: Uuid,
}

impl ScanScheduler {
    /// Schedule the scan on `schedule` (cron, `sec min hour day month
    /// weekday`) and kick off an immediate first run.
    pub async fn start(ctx: ScanContext, schedule: &str) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        let job_ctx = ctx.clone();
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let ctx = job_ctx.clone();
            Box::pin(async move {
                run_scan(&ctx, "Scheduled").await;
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create scan job: {}", e)))?;

        let scan_job_id = scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add scan job: {}", e)))?;

        scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("📅 Scan scheduled [cron: {}], running first scan now", schedule);

        tokio::spawn(async move {
            run_scan(&ctx, "Startup").await;
        });

        Ok(Self {
            scheduler,
            scan_job_id,
        })
    }

    /// Next scheduled run, None while the scheduler is idle.
    pub async fn next_scan_time(&self) -> Option<DateTime<Utc>> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .next_tick_for_job(self.scan_job_id)
            .await
            .ok()
            .flatten()
    }

    #[allow(dead_code)]
    pub async fn stop(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::External(format!("Failed to stop scheduler: {}", e)))
    }
}

async fn run_scan(ctx: &ScanContext, trigger: &str) {
    match scan_service::scan_all(ctx).await {
        Ok(summary) => info!(
            "{} scan finished: {} scanned, {} dips found",
            trigger, summary.scanned, summary.dips_found
        ),
        Err(AppError::ScanInProgress) => {
            warn!("{} scan skipped, previous scan still in flight", trigger)
        }
        Err(e) => error!("{} scan failed: {}", trigger, e),
    }
}
