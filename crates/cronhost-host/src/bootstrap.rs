//! Scheduling of registered recurring jobs.

use cronhost_core::{
    JobKey, ListenerMatcher, Recurring, Result, Scheduler, SchedulerError, Trigger,
};
use tracing::{info, warn};

use crate::registry::JobRegistry;
use crate::services::ServiceProvider;

/// Outcome of [`schedule_recurring_jobs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Jobs handed to the scheduler.
    pub scheduled: Vec<JobKey>,
    /// Jobs left alone because they have no triggers.
    pub skipped: Vec<JobKey>,
    /// Jobs the scheduler could not take.
    pub failed: Vec<JobKey>,
}

impl ScheduleReport {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Schedule every job in `registry` with its configured and manual triggers.
///
/// Existing registrations under the same key are replaced. Jobs without
/// triggers are skipped. Without a reachable scheduler nothing happens.
///
/// # Errors
///
/// Fails on the first job that cannot be instantiated, has an invalid cron
/// expression configured, or is rejected by the scheduler for a reason other
/// than being unavailable.
pub async fn schedule_recurring_jobs(
    services: &ServiceProvider,
    registry: &JobRegistry,
) -> Result<ScheduleReport> {
    let mut report = ScheduleReport::default();

    let Some(factory) = services.scheduler_factory() else {
        warn!("No scheduler registered, recurring jobs not scheduled");
        return Ok(report);
    };
    let scheduler = match factory.get_scheduler().await {
        Ok(scheduler) => scheduler,
        Err(SchedulerError::EngineUnavailable(reason)) => {
            warn!("Scheduler unavailable, recurring jobs not scheduled: {}", reason);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };

    let config = services.config_source();
    for (id, _) in registry.iter() {
        let job = registry.instantiate(id, services)?;
        let recurring = Recurring::new(job, config.clone());
        let key = recurring.key().clone();

        let triggers = recurring.all_triggers()?;
        if triggers.is_empty() {
            info!(job = %key, path = %recurring.config_path(), "No triggers, job not scheduled");
            report.skipped.push(key);
            continue;
        }

        match register(scheduler.as_ref(), &recurring, triggers).await {
            Ok(count) => {
                info!(job = %key, triggers = count, "Recurring job scheduled");
                report.scheduled.push(key);
            }
            Err(e @ (SchedulerError::EngineUnavailable(_) | SchedulerError::Shutdown)) => {
                warn!(job = %key, "Recurring job not scheduled: {}", e);
                report.failed.push(key);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

async fn register(
    scheduler: &dyn Scheduler,
    recurring: &Recurring,
    triggers: Vec<Trigger>,
) -> Result<usize> {
    let count = triggers.len();
    scheduler
        .schedule_job(recurring.build(None), triggers, true)
        .await?;
    for listener in recurring.listeners() {
        scheduler
            .add_job_listener(listener, ListenerMatcher::KeyEquals(recurring.key().clone()))
            .await?;
    }
    Ok(count)
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
