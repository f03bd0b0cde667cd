//! The job capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::JobExecutionContext;
use crate::detail::ConcurrencyPolicy;
use crate::error::JobExecutionError;
use crate::key::JobKey;
use crate::listener::JobListener;
use crate::logging::log_job_error;

/// A unit of schedulable work with a stable identity.
///
/// Implementors supply a fixed [`JobKey`] and the work itself. The engine
/// calls [`Job::execute`] once per fire; returned errors are logged and
/// reported to listeners.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Fixed identity. Must be deterministic and non-empty.
    fn key(&self) -> JobKey;

    /// Listeners to register scoped to this job's key.
    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        Vec::new()
    }

    /// The job's work.
    async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobExecutionError>;

    /// Type name recorded on the job definition.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn description(&self) -> Option<String> {
        None
    }

    /// Overlap policy used when the definition is built without an explicit one.
    fn concurrency(&self) -> ConcurrencyPolicy {
        ConcurrencyPolicy::Allow
    }

    /// Log an error for this job.
    fn report_error(&self, message: &str) {
        log_job_error(&self.key(), message);
    }
}
