//! Jobs shipped with the cronhost binary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use cronhost_core::logging::log_job_information;
use cronhost_core::{
    CancellationToken, ConcurrencyPolicy, Job, JobExecutionContext, JobExecutionError, JobKey,
    JobListener, RecurringJob, Trigger,
};
use cronhost_host::{FromServices, HostError, ServiceProvider};

/// Per-job execution counters shared by the bundled jobs.
#[derive(Default)]
pub(crate) struct JobStats {
    runs: DashMap<JobKey, u64>,
    completions: DashMap<JobKey, u64>,
    failures: DashMap<JobKey, u64>,
}

impl JobStats {
    pub fn record_run(&self, key: &JobKey) -> u64 {
        let mut runs = self.runs.entry(key.clone()).or_insert(0);
        *runs += 1;
        *runs
    }

    /// Record a finished execution as seen by a listener.
    pub fn record_completion(&self, key: &JobKey, failed: bool) {
        *self.completions.entry(key.clone()).or_insert(0) += 1;
        if failed {
            *self.failures.entry(key.clone()).or_insert(0) += 1;
        }
    }

    pub fn runs(&self, key: &JobKey) -> u64 {
        self.runs.get(key).map(|r| *r).unwrap_or(0)
    }

    pub fn completions(&self, key: &JobKey) -> u64 {
        self.completions.get(key).map(|c| *c).unwrap_or(0)
    }

    pub fn failures(&self, key: &JobKey) -> u64 {
        self.failures.get(key).map(|f| *f).unwrap_or(0)
    }
}

/// Counts finished and failed executions of one job.
///
/// Named after the job it serves, so each job keeps its own registration.
pub(crate) struct StatsListener {
    name: String,
    stats: Arc<JobStats>,
}

impl StatsListener {
    pub fn for_job(key: &JobKey, stats: Arc<JobStats>) -> Self {
        Self {
            name: format!("stats:{key}"),
            stats,
        }
    }
}

#[async_trait]
impl JobListener for StatsListener {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn job_was_executed(
        &self,
        ctx: &JobExecutionContext,
        error: Option<&JobExecutionError>,
        cancel: &CancellationToken,
    ) {
        if cancel.is_cancelled() {
            return;
        }
        let key = ctx.job_key();
        self.stats.record_completion(key, error.is_some());
        info!(
            job = %key,
            runs = self.stats.runs(key),
            failures = self.stats.failures(key),
            "execution finished"
        );
    }
}

/// Activity report. Runs on the cron expressions configured at
/// `ScheduledTasks:Quartz:Reports:DailyReport`.
pub(crate) struct DailyReport {
    stats: Arc<JobStats>,
}

#[async_trait]
impl Job for DailyReport {
    fn key(&self) -> JobKey {
        JobKey::new("DailyReport", "Reports")
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        vec![Arc::new(StatsListener::for_job(&self.key(), self.stats.clone()))]
    }

    fn description(&self) -> Option<String> {
        Some("Summarizes job activity".to_string())
    }

    fn concurrency(&self) -> ConcurrencyPolicy {
        ConcurrencyPolicy::Disallow
    }

    async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobExecutionError> {
        let run = self.stats.record_run(ctx.job_key());
        log_job_information(ctx.job_key(), &format!("Report #{run} generated"));
        Ok(())
    }
}

impl RecurringJob for DailyReport {
    fn manual_triggers(&self, _key: &JobKey) -> Vec<Trigger> {
        Vec::new()
    }
}

impl FromServices for DailyReport {
    fn from_services(services: &ServiceProvider) -> Result<Self, HostError> {
        Ok(Self {
            stats: services.require::<JobStats>()?,
        })
    }
}

/// Liveness beat every minute, plus any cron configured for `System:Heartbeat`.
pub(crate) struct Heartbeat {
    stats: Arc<JobStats>,
}

impl Heartbeat {
    const EVERY: Duration = Duration::from_secs(60);
}

#[async_trait]
impl Job for Heartbeat {
    fn key(&self) -> JobKey {
        JobKey::new("Heartbeat", "System")
    }

    async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobExecutionError> {
        let beats = self.stats.record_run(ctx.job_key());
        info!(job = %ctx.job_key(), beats, "heartbeat");
        Ok(())
    }
}

impl RecurringJob for Heartbeat {
    fn manual_triggers(&self, key: &JobKey) -> Vec<Trigger> {
        vec![
            Trigger::builder(key.clone())
                .with_interval(Self::EVERY, None)
                .with_description("every minute")
                .build(),
        ]
    }
}

impl FromServices for Heartbeat {
    fn from_services(services: &ServiceProvider) -> Result<Self, HostError> {
        Ok(Self {
            stats: services.require::<JobStats>()?,
        })
    }
}

/// Started once at boot through a one-time job.
pub(crate) struct WarmUp {
    stats: Arc<JobStats>,
}

impl WarmUp {
    pub fn new(stats: Arc<JobStats>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Job for WarmUp {
    fn key(&self) -> JobKey {
        JobKey::new("WarmUp", "System")
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        vec![Arc::new(StatsListener::for_job(&self.key(), self.stats.clone()))]
    }

    async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobExecutionError> {
        self.stats.record_run(ctx.job_key());
        let reason = ctx.merged_data.get_str("reason").unwrap_or("manual");
        log_job_information(ctx.job_key(), &format!("Warm-up done ({reason})"));
        Ok(())
    }
}
