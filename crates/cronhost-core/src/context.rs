//! Execution context handed to jobs and listeners.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::data::JobDataMap;
use crate::detail::JobDetail;
use crate::key::JobKey;
use crate::trigger::Trigger;

/// Everything known about one fire of a trigger.
#[derive(Debug, Clone)]
pub struct JobExecutionContext {
    pub job_detail: Arc<JobDetail>,
    pub trigger: Trigger,
    pub fire_time: DateTime<Utc>,
    pub scheduled_fire_time: Option<DateTime<Utc>>,
    /// Definition data overlaid with trigger data.
    pub merged_data: JobDataMap,
    pub refire_count: u32,
    pub fire_instance_id: String,
    cancel: CancellationToken,
}

impl JobExecutionContext {
    pub fn new(
        job_detail: Arc<JobDetail>,
        trigger: Trigger,
        scheduled_fire_time: Option<DateTime<Utc>>,
        cancel: CancellationToken,
    ) -> Self {
        let merged_data = job_detail.data.merged(&trigger.data);
        Self {
            job_detail,
            trigger,
            fire_time: Utc::now(),
            scheduled_fire_time,
            merged_data,
            refire_count: 0,
            fire_instance_id: Uuid::new_v4().to_string(),
            cancel,
        }
    }

    pub fn job_key(&self) -> &JobKey {
        &self.job_detail.key
    }

    /// Cancellation signal of the engine that fired this job.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Context for an immediate re-run of the same fire.
    pub fn refired(&self) -> Self {
        Self {
            fire_time: Utc::now(),
            refire_count: self.refire_count + 1,
            ..self.clone()
        }
    }
}
