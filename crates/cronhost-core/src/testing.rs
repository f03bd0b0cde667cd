//! Recording engine double shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::detail::JobDetail;
use crate::error::{Result, SchedulerError};
use crate::key::TriggerKey;
use crate::listener::{JobListener, ListenerMatcher};
use crate::scheduler::{Scheduler, SchedulerFactory};
use crate::trigger::Trigger;

#[derive(Default)]
pub(crate) struct RecordingScheduler {
    pub started: bool,
    pub jobs: Mutex<Vec<(Arc<JobDetail>, Vec<Trigger>, bool)>>,
    pub triggers: Mutex<Vec<(Arc<JobDetail>, Trigger)>>,
    pub listeners: Mutex<Vec<(String, ListenerMatcher)>>,
}

impl RecordingScheduler {
    pub fn started() -> Arc<Self> {
        Arc::new(Self {
            started: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn schedule_job(
        &self,
        detail: Arc<JobDetail>,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> Result<()> {
        self.jobs.lock().push((detail, triggers, replace));
        Ok(())
    }

    async fn schedule_trigger(
        &self,
        detail: Arc<JobDetail>,
        trigger: Trigger,
    ) -> Result<TriggerKey> {
        let key = trigger.key.clone();
        self.triggers.lock().push((detail, trigger));
        Ok(key)
    }

    async fn add_job_listener(
        &self,
        listener: Arc<dyn JobListener>,
        matcher: ListenerMatcher,
    ) -> Result<()> {
        self.listeners.lock().push((listener.name(), matcher));
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.started
    }
}

/// Factory returning a fixed scheduler, or failing when there is none.
pub(crate) struct FixedFactory(pub Option<Arc<RecordingScheduler>>);

#[async_trait]
impl SchedulerFactory for FixedFactory {
    async fn get_scheduler(&self) -> Result<Arc<dyn Scheduler>> {
        match &self.0 {
            Some(scheduler) => Ok(scheduler.clone() as Arc<dyn Scheduler>),
            None => Err(SchedulerError::EngineUnavailable("no scheduler".to_string())),
        }
    }
}
