//! Jobs started on demand with an immediate trigger.

use std::sync::Arc;

use tracing::{debug, info};

use crate::data::JobDataMap;
use crate::detail::{ConcurrencyPolicy, DefinitionCell, JobDetail};
use crate::error::{Result, SchedulerError};
use crate::job::Job;
use crate::key::{JobKey, TriggerKey};
use crate::listener::ListenerMatcher;
use crate::scheduler::SchedulerFactory;
use crate::trigger::Trigger;

/// A job started imperatively through [`OneTimeJob::start_now`].
///
/// The overlap policy is chosen by the caller; there is no default. With
/// [`ConcurrencyPolicy::Disallow`] a second start while the first execution
/// is still running waits for it instead of overlapping.
pub struct OneTimeJob<J: Job> {
    job: Arc<J>,
    factory: Arc<dyn SchedulerFactory>,
    policy: ConcurrencyPolicy,
    key: JobKey,
    definition: DefinitionCell,
}

impl<J: Job> OneTimeJob<J> {
    pub fn new(job: J, factory: Arc<dyn SchedulerFactory>, policy: ConcurrencyPolicy) -> Self {
        Self::from_arc(Arc::new(job), factory, policy)
    }

    pub fn from_arc(
        job: Arc<J>,
        factory: Arc<dyn SchedulerFactory>,
        policy: ConcurrencyPolicy,
    ) -> Self {
        let key = job.key();
        Self {
            job,
            factory,
            policy,
            key,
            definition: DefinitionCell::new(),
        }
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn job(&self) -> &Arc<J> {
        &self.job
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    /// The job definition, built on first call. Later `data` is ignored.
    pub fn build(&self, data: Option<JobDataMap>) -> Arc<JobDetail> {
        self.definition.get_or_build(|| {
            debug!(job = %self.key, "building one-time job definition");
            JobDetail::new(self.key.clone(), self.job.clone(), data, self.policy)
        })
    }

    /// Fire the job once, now. `data` travels on the trigger.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::EngineUnavailable`] when no started scheduler can be obtained
    /// - [`SchedulerError::InvalidJobKey`] when the job's key is empty
    pub async fn start_now(&self, data: Option<JobDataMap>) -> Result<TriggerKey> {
        let scheduler = self.factory.get_scheduler().await?;
        if !scheduler.is_started() {
            return Err(SchedulerError::EngineUnavailable(
                "scheduler is not started".to_string(),
            ));
        }
        self.key.validate()?;

        let detail = self.build(None);
        let trigger = Trigger::now(&self.key, data);

        for listener in self.job.listeners() {
            scheduler
                .add_job_listener(listener, ListenerMatcher::KeyEquals(self.key.clone()))
                .await?;
        }

        let trigger_key = scheduler.schedule_trigger(detail, trigger).await?;
        info!(job = %self.key, trigger = %trigger_key, "one-time job submitted");
        Ok(trigger_key)
    }
}

#[cfg(test)]
#[path = "one_time_tests.rs"]
mod tests;
