//! Job definitions and the build-once cell that holds them.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::data::JobDataMap;
use crate::job::Job;
use crate::key::JobKey;

/// Whether executions of one job key may overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Executions may run side by side.
    #[default]
    Allow,
    /// At most one execution per job key is in flight; later fires wait.
    Disallow,
}

/// What the engine stores for a job: identity, payload and the instance to run.
pub struct JobDetail {
    pub key: JobKey,
    pub job_type: String,
    pub description: Option<String>,
    pub data: JobDataMap,
    pub concurrency: ConcurrencyPolicy,
    job: Arc<dyn Job>,
}

impl JobDetail {
    pub fn new(
        key: JobKey,
        job: Arc<dyn Job>,
        data: Option<JobDataMap>,
        concurrency: ConcurrencyPolicy,
    ) -> Self {
        Self {
            key,
            job_type: job.type_name().to_string(),
            description: job.description(),
            data: data.unwrap_or_default(),
            concurrency,
            job,
        }
    }

    /// The job instance executed on fire.
    pub fn job(&self) -> &Arc<dyn Job> {
        &self.job
    }

    pub fn allows_concurrent_execution(&self) -> bool {
        self.concurrency == ConcurrencyPolicy::Allow
    }
}

impl fmt::Debug for JobDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobDetail")
            .field("key", &self.key)
            .field("job_type", &self.job_type)
            .field("description", &self.description)
            .field("data", &self.data)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

/// Build-once holder for a job definition.
///
/// The first build wins; later calls return the same definition and ignore
/// their data. Per-fire data belongs on the trigger.
#[derive(Debug, Default)]
pub struct DefinitionCell {
    inner: OnceLock<Arc<JobDetail>>,
}

impl DefinitionCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build<F>(&self, build: F) -> Arc<JobDetail>
    where
        F: FnOnce() -> JobDetail,
    {
        self.inner.get_or_init(|| Arc::new(build())).clone()
    }

    pub fn is_built(&self) -> bool {
        self.inner.get().is_some()
    }
}
