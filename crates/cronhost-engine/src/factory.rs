//! Factory handing out the shared [`LocalScheduler`].

use std::sync::Arc;

use async_trait::async_trait;
use cronhost_core::{Result, Scheduler, SchedulerError, SchedulerFactory};

use crate::local::LocalScheduler;

/// Hands out one shared [`LocalScheduler`] until it is shut down.
#[derive(Clone)]
pub struct LocalSchedulerFactory {
    scheduler: Arc<LocalScheduler>,
}

impl LocalSchedulerFactory {
    pub fn new(scheduler: Arc<LocalScheduler>) -> Self {
        Self { scheduler }
    }

    /// The concrete scheduler, for lifecycle control.
    pub fn scheduler(&self) -> &Arc<LocalScheduler> {
        &self.scheduler
    }
}

#[async_trait]
impl SchedulerFactory for LocalSchedulerFactory {
    async fn get_scheduler(&self) -> Result<Arc<dyn Scheduler>> {
        if self.scheduler.is_shutdown() {
            return Err(SchedulerError::EngineUnavailable(format!(
                "scheduler '{}' has been shut down",
                self.scheduler.name()
            )));
        }
        Ok(self.scheduler.clone() as Arc<dyn Scheduler>)
    }
}
