//! Hosted background services.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use cronhost_config::SchedulerSettings;
use cronhost_engine::LocalScheduler;

use crate::error::HostError;

/// A service started with the [`App`](crate::App) and stopped with it.
#[async_trait]
pub trait HostedService: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self) -> Result<(), HostError>;

    async fn stop(&self) -> Result<(), HostError>;

    /// Higher starts earlier and stops later.
    fn priority(&self) -> i32 {
        priority::DEFAULT
    }
}

/// Priority levels for hosted services (higher = starts earlier, stops later).
pub mod priority {
    pub const INFRASTRUCTURE: i32 = 1000;
    pub const SCHEDULER: i32 = 600;
    pub const DEFAULT: i32 = 0;
}

/// Runs the [`LocalScheduler`] for the lifetime of the app.
///
/// On stop the scheduler stops firing and waits for running executions to
/// finish. Running executions are never cancelled. With
/// `shutdown_timeout_secs` a warning is logged every time that much time
/// passes while executions are still running; the wait continues.
pub struct SchedulerHostedService {
    scheduler: Arc<LocalScheduler>,
    settings: SchedulerSettings,
}

impl SchedulerHostedService {
    pub fn new(scheduler: Arc<LocalScheduler>, settings: SchedulerSettings) -> Self {
        Self {
            scheduler,
            settings,
        }
    }

    pub fn scheduler(&self) -> &Arc<LocalScheduler> {
        &self.scheduler
    }
}

#[async_trait]
impl HostedService for SchedulerHostedService {
    fn name(&self) -> &str {
        "scheduler"
    }

    async fn start(&self) -> Result<(), HostError> {
        debug!("Starting scheduler...");
        self.scheduler.start()?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), HostError> {
        debug!("Stopping scheduler...");

        let timeout = self
            .settings
            .shutdown_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let shutdown = self.scheduler.shutdown(true);
        tokio::pin!(shutdown);

        match timeout {
            Some(timeout) => loop {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(timeout) => {
                        warn!(
                            running = self.scheduler.running_count(),
                            "Scheduler still waiting for running jobs after {:?}", timeout
                        );
                    }
                }
            },
            None => shutdown.await,
        }

        info!("Scheduler stopped");
        Ok(())
    }

    fn priority(&self) -> i32 {
        priority::SCHEDULER
    }
}
