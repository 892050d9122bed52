//! Cron scheduler for the sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use socialhub_core::error::AppError;

use crate::jobs::SweepJob;

/// Runs registered [`SweepJob`]s on their cron schedules.
pub struct CronScheduler {
    scheduler: JobScheduler,
    registered: Vec<&'static str>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("registered", &self.registered)
            .finish()
    }
}

impl CronScheduler {
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self {
            scheduler,
            registered: Vec::new(),
        })
    }

    /// Schedule one sweep. An invalid cron expression is a configuration error.
    pub async fn register(&mut self, job: Arc<dyn SweepJob>) -> Result<(), AppError> {
        let name = job.name();
        let schedule = job.schedule().to_string();
        let task = Arc::clone(&job);
        let cron = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let task = Arc::clone(&task);
            Box::pin(async move {
                run_sweep(task.as_ref()).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{schedule}' for {name}: {e}"))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))?;

        self.registered.push(name);
        tracing::info!(job = name, schedule = %schedule, "Registered sweep");
        Ok(())
    }

    /// Schedule every sweep in `jobs`.
    pub async fn register_all(&mut self, jobs: Vec<Arc<dyn SweepJob>>) -> Result<(), AppError> {
        for job in jobs {
            self.register(job).await?;
        }
        Ok(())
    }

    pub fn registered(&self) -> &[&'static str] {
        &self.registered
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        tracing::info!(jobs = self.registered.len(), "Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

/// Run a sweep once, logging the outcome. Errors do not stop the schedule.
pub async fn run_sweep(job: &dyn SweepJob) {
    match job.run_once().await {
        Ok(0) => tracing::debug!(job = job.name(), "Sweep found nothing to remove"),
        Ok(removed) => tracing::info!(job = job.name(), removed, "Sweep completed"),
        Err(e) => tracing::warn!(job = job.name(), error = %e, "Sweep failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{OtpSweepJob, TokenSweepJob};
    use async_trait::async_trait;
    use socialhub_auth::{OtpService, TokenService};
    use socialhub_core::config::AuthConfig;
    use socialhub_core::result::AppResult;
    use socialhub_database::memory::{MemoryOtpRepository, MemoryTokenRepository};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct Counting {
        runs: AtomicU64,
    }

    #[async_trait]
    impl SweepJob for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn schedule(&self) -> &str {
            "* * * * * *"
        }

        async fn run_once(&self) -> AppResult<u64> {
            Ok(self.runs.fetch_add(1, Ordering::SeqCst))
        }
    }

    struct Broken;

    #[async_trait]
    impl SweepJob for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn schedule(&self) -> &str {
            "not a cron"
        }

        async fn run_once(&self) -> AppResult<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_configuration_error() {
        let mut scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler.register(Arc::new(Broken)).await.unwrap_err();
        assert_eq!(err.kind, socialhub_core::error::ErrorKind::Configuration);
        assert!(scheduler.registered().is_empty());
    }

    #[tokio::test]
    async fn test_registers_default_sweeps() {
        let config = AuthConfig::default();
        let tokens = TokenService::new(Arc::new(MemoryTokenRepository::new()), &config);
        let otps = OtpService::new(Arc::new(MemoryOtpRepository::new()), &config);

        let mut scheduler = CronScheduler::new().await.unwrap();
        scheduler
            .register_all(vec![
                Arc::new(TokenSweepJob::new(tokens, "0 0 * * * *")),
                Arc::new(OtpSweepJob::new(otps, "0 */15 * * * *")),
            ])
            .await
            .unwrap();
        assert_eq!(scheduler.registered(), ["token_cleanup", "otp_cleanup"]);
    }

    #[tokio::test]
    async fn test_run_sweep_invokes_job() {
        let job = Counting {
            runs: AtomicU64::new(0),
        };
        run_sweep(&job).await;
        run_sweep(&job).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 2);
    }
}
