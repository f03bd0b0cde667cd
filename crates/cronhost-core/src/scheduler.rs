//! The engine boundary.
//!
//! Job variants and the host bootstrap only talk to an engine through these
//! traits. `cronhost-engine` provides the in-process implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::JobExecutionContext;
use crate::detail::JobDetail;
use crate::error::Result;
use crate::key::TriggerKey;
use crate::listener::{JobListener, ListenerMatcher};
use crate::trigger::Trigger;

/// A running scheduling engine.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Store a job with its triggers. With `replace` an existing job under
    /// the same key is swapped out together with its triggers; without it an
    /// existing key is an error.
    async fn schedule_job(
        &self,
        detail: Arc<JobDetail>,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> Result<()>;

    /// Add one trigger, storing the job first when the engine does not know it.
    async fn schedule_trigger(&self, detail: Arc<JobDetail>, trigger: Trigger)
        -> Result<TriggerKey>;

    /// Register a listener. A listener with the same name is replaced.
    async fn add_job_listener(
        &self,
        listener: Arc<dyn JobListener>,
        matcher: ListenerMatcher,
    ) -> Result<()>;

    fn is_started(&self) -> bool;
}

/// Hands out the scheduler to use.
#[async_trait]
pub trait SchedulerFactory: Send + Sync {
    async fn get_scheduler(&self) -> Result<Arc<dyn Scheduler>>;
}

/// Scheduler-level guard consulted before each fire.
#[async_trait]
pub trait TriggerGuard: Send + Sync {
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Return true to stop this fire. Vetoed fires are reported through
    /// [`JobListener::job_execution_vetoed`].
    async fn veto_job_execution(&self, ctx: &JobExecutionContext) -> bool;
}
