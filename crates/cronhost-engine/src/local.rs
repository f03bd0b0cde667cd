//! LocalScheduler - in-memory engine driven by a tick loop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use cronhost_config::SchedulerSettings;
use cronhost_core::logging::log_job_error;
use cronhost_core::{
    ConcurrencyPolicy, JobDetail, JobExecutionContext, JobExecutionError, JobKey, JobListener,
    ListenerMatcher, Result, Scheduler, SchedulerError, Trigger, TriggerGuard, TriggerKey,
};

use crate::state::SchedulerState;
use crate::store::{Fire, JobStore};

struct ListenerEntry {
    listener: Arc<dyn JobListener>,
    matcher: ListenerMatcher,
}

/// In-process scheduler.
///
/// Jobs and triggers live in memory. After [`LocalScheduler::start`] a tick
/// loop claims due triggers every tick interval and runs each execution on
/// its own tracked task. Jobs with [`ConcurrencyPolicy::Disallow`] never
/// overlap: a fire that finds the job running waits for a later tick.
pub struct LocalScheduler {
    name: String,
    tick_interval: Duration,
    state: AtomicU8,
    store: Mutex<JobStore>,
    listeners: RwLock<Vec<ListenerEntry>>,
    guards: RwLock<Vec<Arc<dyn TriggerGuard>>>,
    running: DashMap<JobKey, usize>,
    tracker: TaskTracker,
    /// Cancelled when shutdown does not wait for executions.
    cancel: CancellationToken,
    stop_ticking: CancellationToken,
    tick_handle: Mutex<Option<JoinHandle<()>>>,
}

impl LocalScheduler {
    pub fn new(name: impl Into<String>, tick_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            tick_interval,
            state: AtomicU8::new(SchedulerState::Created as u8),
            store: Mutex::new(JobStore::default()),
            listeners: RwLock::new(Vec::new()),
            guards: RwLock::new(Vec::new()),
            running: DashMap::new(),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            stop_ticking: CancellationToken::new(),
            tick_handle: Mutex::new(None),
        })
    }

    /// Scheduler configured from the `Scheduler` settings section.
    pub fn from_settings(name: impl Into<String>, settings: &SchedulerSettings) -> Arc<Self> {
        Self::new(name, Duration::from_millis(settings.tick_interval_ms.max(1)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn is_shutdown(&self) -> bool {
        self.state().is_shutdown()
    }

    /// Token cancelled when executions are abandoned at shutdown.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start firing triggers. Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if self
            .state
            .compare_exchange(
                SchedulerState::Created as u8,
                SchedulerState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return match self.state() {
                SchedulerState::Running => Ok(()),
                _ => Err(SchedulerError::Shutdown),
            };
        }

        let scheduler = Arc::clone(self);
        let handle = tokio::spawn(async move { scheduler.run().await });
        *self.tick_handle.lock() = Some(handle);
        info!(
            scheduler = %self.name,
            "Scheduler started (tick interval: {:?})", self.tick_interval
        );
        Ok(())
    }

    async fn run(self: Arc<Self>) {
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => self.tick(Utc::now()).await,
                _ = self.stop_ticking.cancelled() => {
                    debug!(scheduler = %self.name, "tick loop stopped");
                    break;
                }
            }
        }
    }

    /// Claim and dispatch everything due at `now`.
    async fn tick(self: &Arc<Self>, now: DateTime<Utc>) {
        let fires = {
            let mut store = self.store.lock();
            let fires = store.take_due(now, |detail| self.claim(detail));
            for key in store.prune_orphans() {
                debug!(job = %key, "job has no triggers left, removed");
            }
            fires
        };

        for fire in fires {
            self.dispatch(fire).await;
        }
    }

    /// Reserve an execution slot for the job. Refused while a non-concurrent
    /// job is already running.
    fn claim(&self, detail: &JobDetail) -> bool {
        let mut count = self.running.entry(detail.key.clone()).or_insert(0);
        if detail.concurrency == ConcurrencyPolicy::Disallow && *count > 0 {
            debug!(job = %detail.key, "job still running, fire deferred");
            return false;
        }
        *count += 1;
        true
    }

    fn release(&self, key: &JobKey) {
        if let Some(mut count) = self.running.get_mut(key) {
            *count = count.saturating_sub(1);
        }
        self.running.remove_if(key, |_, count| *count == 0);
    }

    async fn dispatch(self: &Arc<Self>, fire: Fire) {
        let ctx = JobExecutionContext::new(
            fire.detail,
            fire.trigger,
            Some(fire.scheduled),
            self.cancel.clone(),
        );

        let guards: Vec<_> = self.guards.read().clone();
        for guard in guards {
            if guard.veto_job_execution(&ctx).await {
                info!(
                    job = %ctx.job_key(),
                    trigger = %ctx.trigger.key,
                    guard = %guard.name(),
                    "job execution vetoed"
                );
                for listener in self.listeners_for(ctx.job_key()) {
                    listener.job_execution_vetoed(&ctx, &self.cancel).await;
                }
                self.release(ctx.job_key());
                return;
            }
        }

        let scheduler = Arc::clone(self);
        self.tracker.spawn(async move {
            scheduler.execute(ctx).await;
        });
    }

    async fn execute(&self, mut ctx: JobExecutionContext) {
        let key = ctx.job_key().clone();
        loop {
            let listeners = self.listeners_for(&key);
            for listener in &listeners {
                listener.job_to_be_executed(&ctx, &self.cancel).await;
            }

            let result = ctx.job_detail.job().clone().execute(&ctx).await;
            let error = result.err();
            if let Some(err) = &error {
                log_job_error(
                    &key,
                    &format!("Job failed (trigger {}): {}", ctx.trigger.key, err),
                );
            }

            for listener in &listeners {
                listener
                    .job_was_executed(&ctx, error.as_ref(), &self.cancel)
                    .await;
            }

            if !self.should_refire(error.as_ref()) {
                break;
            }
            debug!(job = %key, refire = ctx.refire_count + 1, "refiring job immediately");
            ctx = ctx.refired();
        }
        self.release(&key);
    }

    fn should_refire(&self, error: Option<&JobExecutionError>) -> bool {
        error.is_some_and(|e| e.refire_immediately) && !self.cancel.is_cancelled()
    }

    fn listeners_for(&self, key: &JobKey) -> Vec<Arc<dyn JobListener>> {
        self.listeners
            .read()
            .iter()
            .filter(|entry| entry.matcher.matches(key))
            .map(|entry| entry.listener.clone())
            .collect()
    }

    fn ensure_accepting(&self) -> Result<()> {
        if self.is_shutdown() {
            return Err(SchedulerError::Shutdown);
        }
        Ok(())
    }

    fn first_fire(trigger: &Trigger, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        trigger
            .schedule
            .first_fire_time(now)
            .ok_or_else(|| SchedulerError::InvalidTrigger {
                trigger: trigger.key.clone(),
                reason: "trigger will never fire".to_string(),
            })
    }

    fn check_target(detail: &JobDetail, trigger: &Trigger) -> Result<()> {
        if trigger.job_key != detail.key {
            return Err(SchedulerError::InvalidTrigger {
                trigger: trigger.key.clone(),
                reason: format!(
                    "targets job {} but was submitted with job {}",
                    trigger.job_key, detail.key
                ),
            });
        }
        Ok(())
    }

    /// Register a guard consulted before every fire.
    pub fn add_trigger_guard(&self, guard: Arc<dyn TriggerGuard>) {
        self.guards.write().push(guard);
    }

    /// Remove a job and its triggers.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::JobNotFound`] when no job is stored under `key`.
    pub fn unschedule_job(&self, key: &JobKey) -> Result<()> {
        if !self.store.lock().remove_job(key) {
            return Err(SchedulerError::JobNotFound(key.clone()));
        }
        info!(job = %key, "job unscheduled");
        Ok(())
    }

    pub fn job_keys(&self) -> Vec<JobKey> {
        self.store.lock().job_keys()
    }

    pub fn trigger_keys(&self, job: &JobKey) -> Vec<TriggerKey> {
        self.store.lock().trigger_keys(job)
    }

    pub fn next_fire_time(&self, trigger: &TriggerKey) -> Option<DateTime<Utc>> {
        self.store.lock().next_fire_time(trigger)
    }

    /// Jobs with an execution in flight.
    pub fn running_jobs(&self) -> Vec<JobKey> {
        let mut keys: Vec<_> = self
            .running
            .iter()
            .filter(|entry| *entry.value() > 0)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of executions in flight.
    pub fn running_count(&self) -> usize {
        self.tracker.len()
    }

    /// Stop firing. With `wait` in-flight executions run to completion
    /// before this returns; otherwise they are signalled to cancel.
    pub async fn shutdown(&self, wait: bool) {
        let transitioned = self
            .state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (!SchedulerState::from(current).is_shutdown())
                    .then_some(SchedulerState::ShuttingDown as u8)
            });
        if transitioned.is_err() {
            return;
        }
        info!(scheduler = %self.name, wait, "Scheduler shutting down");

        self.stop_ticking.cancel();
        let handle = self.tick_handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(scheduler = %self.name, "tick loop ended abnormally: {}", e);
            }
        }

        self.tracker.close();
        if wait {
            self.tracker.wait().await;
        } else {
            self.cancel.cancel();
        }

        self.state
            .store(SchedulerState::Stopped as u8, Ordering::SeqCst);
        info!(scheduler = %self.name, "Scheduler stopped");
    }
}

#[async_trait]
impl Scheduler for LocalScheduler {
    async fn schedule_job(
        &self,
        detail: Arc<JobDetail>,
        triggers: Vec<Trigger>,
        replace: bool,
    ) -> Result<()> {
        self.ensure_accepting()?;
        detail.key.validate()?;

        let now = Utc::now();
        let mut planned = Vec::with_capacity(triggers.len());
        for trigger in triggers {
            Self::check_target(&detail, &trigger)?;
            let first = Self::first_fire(&trigger, now)?;
            planned.push((trigger, first));
        }

        let mut store = self.store.lock();
        if store.contains_job(&detail.key) {
            if !replace {
                return Err(SchedulerError::JobAlreadyExists(detail.key.clone()));
            }
            store.remove_job(&detail.key);
        }
        for (trigger, _) in &planned {
            if let Some(owner) = store.trigger_owner(&trigger.key) {
                return Err(SchedulerError::InvalidTrigger {
                    trigger: trigger.key.clone(),
                    reason: format!("key already used by job {owner}"),
                });
            }
        }

        if planned.is_empty() {
            debug!(job = %detail.key, "no triggers, job not stored");
            return Ok(());
        }

        let count = planned.len();
        store.insert_job(detail.clone());
        for (trigger, first) in planned {
            store.insert_trigger(trigger, first);
        }
        info!(job = %detail.key, triggers = count, replace, "job scheduled");
        Ok(())
    }

    async fn schedule_trigger(
        &self,
        detail: Arc<JobDetail>,
        trigger: Trigger,
    ) -> Result<TriggerKey> {
        self.ensure_accepting()?;
        detail.key.validate()?;
        Self::check_target(&detail, &trigger)?;
        let first = Self::first_fire(&trigger, Utc::now())?;

        let mut store = self.store.lock();
        if let Some(owner) = store.trigger_owner(&trigger.key) {
            return Err(SchedulerError::InvalidTrigger {
                trigger: trigger.key.clone(),
                reason: format!("key already used by job {owner}"),
            });
        }
        if !store.contains_job(&detail.key) {
            store.insert_job(detail.clone());
        }
        let key = trigger.key.clone();
        store.insert_trigger(trigger, first);
        debug!(job = %detail.key, trigger = %key, "trigger scheduled");
        Ok(key)
    }

    async fn add_job_listener(
        &self,
        listener: Arc<dyn JobListener>,
        matcher: ListenerMatcher,
    ) -> Result<()> {
        let name = listener.name();
        let mut listeners = self.listeners.write();
        let entry = ListenerEntry { listener, matcher };
        match listeners.iter_mut().find(|e| e.listener.name() == name) {
            Some(existing) => *existing = entry,
            None => listeners.push(entry),
        }
        debug!(listener = %name, "job listener registered");
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.state() == SchedulerState::Running
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
