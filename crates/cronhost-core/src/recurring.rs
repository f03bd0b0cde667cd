//! Recurring jobs: cron triggers from configuration plus programmatic triggers.
//!
//! The cron list for a job lives at `ScheduledTasks:Quartz:<group>:<name>`:
//!
//! ```toml
//! [ScheduledTasks.Quartz.Reports]
//! DailyReport = ["0 0 * * * ?", "0 30 12 * * ?"]
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use cronhost_config::{job_section_path, ConfigSource};
use tracing::debug;

use crate::context::JobExecutionContext;
use crate::cron_expr::CronExpression;
use crate::data::JobDataMap;
use crate::detail::{ConcurrencyPolicy, DefinitionCell, JobDetail};
use crate::error::{JobExecutionError, Result, SchedulerError};
use crate::job::Job;
use crate::key::JobKey;
use crate::listener::JobListener;
use crate::trigger::{Trigger, TriggerSchedule};

/// A job scheduled at bootstrap.
pub trait RecurringJob: Job {
    /// Triggers that cannot be expressed as configured cron, such as
    /// intervals or one-off instants. Return an empty list when there are none.
    fn manual_triggers(&self, key: &JobKey) -> Vec<Trigger>;
}

/// A recurring job bound to the configuration it reads its cron list from.
pub struct Recurring {
    job: Arc<dyn RecurringJob>,
    config: Arc<dyn ConfigSource>,
    key: JobKey,
    definition: DefinitionCell,
}

impl Recurring {
    pub fn new(job: Arc<dyn RecurringJob>, config: Arc<dyn ConfigSource>) -> Self {
        let key = job.key();
        Self {
            job,
            config,
            key,
            definition: DefinitionCell::new(),
        }
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn job(&self) -> &Arc<dyn RecurringJob> {
        &self.job
    }

    /// Where this job's cron list is configured.
    pub fn config_path(&self) -> String {
        job_section_path(&self.key.group, &self.key.name)
    }

    /// One cron trigger per configured expression, in configured order.
    ///
    /// A missing section yields no triggers. Any invalid expression fails the
    /// whole call.
    pub fn crontab_triggers_from_config(&self) -> Result<Vec<Trigger>> {
        let path = self.config_path();
        let expressions = self.config.string_list(&path)?;

        let mut parsed = Vec::with_capacity(expressions.len());
        for (index, expression) in expressions.iter().enumerate() {
            let cron = CronExpression::parse(expression).map_err(|e| {
                SchedulerError::InvalidConfiguration {
                    path: format!("{path}:{index}"),
                    reason: e.to_string(),
                }
            })?;
            parsed.push(cron);
        }

        debug!(job = %self.key, count = parsed.len(), "cron triggers from configuration");
        Ok(parsed
            .into_iter()
            .map(|cron| {
                Trigger::builder(self.key.clone())
                    .with_schedule(TriggerSchedule::Cron(cron))
                    .build()
            })
            .collect())
    }

    pub fn manual_triggers(&self) -> Vec<Trigger> {
        self.job.manual_triggers(&self.key)
    }

    /// Configured cron triggers followed by manual triggers.
    pub fn all_triggers(&self) -> Result<Vec<Trigger>> {
        let mut triggers = self.crontab_triggers_from_config()?;
        triggers.extend(self.manual_triggers());
        Ok(triggers)
    }

    /// The job definition, built on first call. Later `data` is ignored.
    pub fn build(&self, data: Option<JobDataMap>) -> Arc<JobDetail> {
        self.definition.get_or_build(|| {
            let policy = self.job.concurrency();
            JobDetail::new(
                self.key.clone(),
                Arc::new(RecurringJobHandle(self.job.clone())),
                data,
                policy,
            )
        })
    }

    pub fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        self.job.listeners()
    }
}

/// Runs a recurring job where a plain [`Job`] is expected.
struct RecurringJobHandle(Arc<dyn RecurringJob>);

#[async_trait]
impl Job for RecurringJobHandle {
    fn key(&self) -> JobKey {
        self.0.key()
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        self.0.listeners()
    }

    async fn execute(&self, ctx: &JobExecutionContext) -> std::result::Result<(), JobExecutionError> {
        self.0.execute(ctx).await
    }

    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn description(&self) -> Option<String> {
        self.0.description()
    }

    fn concurrency(&self) -> ConcurrencyPolicy {
        self.0.concurrency()
    }

    fn report_error(&self, message: &str) {
        self.0.report_error(message)
    }
}

#[cfg(test)]
#[path = "recurring_tests.rs"]
mod tests;
