//! Job listeners.
//!
//! Listeners observe three points of a fire: vetoed, about to run, and done.
//! The default hooks log at info level and do nothing else.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::context::JobExecutionContext;
use crate::error::JobExecutionError;
use crate::key::JobKey;
use crate::logging::{log_job_error, log_job_information};

/// Observer of job lifecycle events.
#[async_trait]
pub trait JobListener: Send + Sync {
    /// Registration name. Registering another listener under the same name
    /// replaces this one.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// A trigger guard stopped an otherwise due fire.
    async fn job_execution_vetoed(&self, ctx: &JobExecutionContext, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }
        log_job_information(ctx.job_key(), "Job execution vetoed");
    }

    /// Called right before the job runs.
    async fn job_to_be_executed(&self, ctx: &JobExecutionContext, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }
        log_job_information(ctx.job_key(), "Job to be executed");
    }

    /// Called after the job ran, with its error if it failed.
    async fn job_was_executed(
        &self,
        ctx: &JobExecutionContext,
        error: Option<&JobExecutionError>,
        cancel: &CancellationToken,
    ) {
        if cancel.is_cancelled() {
            return;
        }
        match error {
            None => log_job_information(ctx.job_key(), "Job was executed"),
            Some(err) => log_job_error(ctx.job_key(), &format!("Job was executed with error: {err}")),
        }
    }
}

/// Which jobs a listener registration observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerMatcher {
    Everything,
    KeyEquals(JobKey),
    GroupEquals(String),
}

impl ListenerMatcher {
    pub fn matches(&self, key: &JobKey) -> bool {
        match self {
            ListenerMatcher::Everything => true,
            ListenerMatcher::KeyEquals(expected) => expected == key,
            ListenerMatcher::GroupEquals(group) => &key.group == group,
        }
    }
}

/// Listener that only logs, registered under a chosen name.
#[derive(Debug, Clone)]
pub struct LoggingJobListener {
    name: String,
}

impl LoggingJobListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LoggingJobListener {
    fn default() -> Self {
        Self::new(std::any::type_name::<Self>())
    }
}

#[async_trait]
impl JobListener for LoggingJobListener {
    fn name(&self) -> String {
        self.name.clone()
    }
}
