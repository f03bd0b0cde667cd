//! In-memory job and trigger store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cronhost_core::{JobDetail, JobKey, Trigger, TriggerKey, TriggerSchedule};

pub(crate) struct StoredTrigger {
    pub trigger: Trigger,
    pub next_fire: DateTime<Utc>,
    pub times_fired: u32,
}

/// A due trigger claimed for execution.
pub(crate) struct Fire {
    pub detail: Arc<JobDetail>,
    pub trigger: Trigger,
    pub scheduled: DateTime<Utc>,
}

#[derive(Default)]
pub(crate) struct JobStore {
    jobs: HashMap<JobKey, Arc<JobDetail>>,
    triggers: HashMap<TriggerKey, StoredTrigger>,
}

impl JobStore {
    pub fn contains_job(&self, key: &JobKey) -> bool {
        self.jobs.contains_key(key)
    }

    pub fn insert_job(&mut self, detail: Arc<JobDetail>) {
        self.jobs.insert(detail.key.clone(), detail);
    }

    /// Remove a job and every trigger pointing at it.
    pub fn remove_job(&mut self, key: &JobKey) -> bool {
        self.triggers.retain(|_, stored| &stored.trigger.job_key != key);
        self.jobs.remove(key).is_some()
    }

    /// Job the trigger with this key belongs to, if stored.
    pub fn trigger_owner(&self, key: &TriggerKey) -> Option<&JobKey> {
        self.triggers.get(key).map(|stored| &stored.trigger.job_key)
    }

    pub fn insert_trigger(&mut self, trigger: Trigger, next_fire: DateTime<Utc>) {
        self.triggers.insert(
            trigger.key.clone(),
            StoredTrigger {
                trigger,
                next_fire,
                times_fired: 0,
            },
        );
    }

    pub fn job_keys(&self) -> Vec<JobKey> {
        let mut keys: Vec<_> = self.jobs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn trigger_keys(&self, job: &JobKey) -> Vec<TriggerKey> {
        let mut keys: Vec<_> = self
            .triggers
            .values()
            .filter(|stored| &stored.trigger.job_key == job)
            .map(|stored| stored.trigger.key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn next_fire_time(&self, key: &TriggerKey) -> Option<DateTime<Utc>> {
        self.triggers.get(key).map(|stored| stored.next_fire)
    }

    /// Claim every trigger due at `now`, earliest first.
    ///
    /// `claim` decides per fire whether the job may run now; refused fires
    /// stay due and are retried on a later call. Claimed triggers advance to
    /// their next fire time or are dropped when exhausted.
    pub fn take_due<F>(&mut self, now: DateTime<Utc>, mut claim: F) -> Vec<Fire>
    where
        F: FnMut(&JobDetail) -> bool,
    {
        let mut due: Vec<(DateTime<Utc>, TriggerKey)> = self
            .triggers
            .iter()
            .filter(|(_, stored)| stored.next_fire <= now)
            .map(|(key, stored)| (stored.next_fire, key.clone()))
            .collect();
        due.sort();

        let mut fires = Vec::with_capacity(due.len());
        for (scheduled, key) in due {
            let Some(stored) = self.triggers.get_mut(&key) else {
                continue;
            };
            let Some(detail) = self.jobs.get(&stored.trigger.job_key).cloned() else {
                self.triggers.remove(&key);
                continue;
            };
            if !claim(&detail) {
                continue;
            }

            stored.times_fired += 1;
            let base = match stored.trigger.schedule {
                TriggerSchedule::Cron(_) => now,
                _ => scheduled,
            };
            let trigger = stored.trigger.clone();
            let next = trigger.schedule.next_fire_time(base, stored.times_fired);
            match next {
                Some(next) => stored.next_fire = next,
                None => {
                    self.triggers.remove(&key);
                }
            }
            fires.push(Fire {
                detail,
                trigger,
                scheduled,
            });
        }
        fires
    }

    /// Drop jobs that have no triggers left. Returns their keys.
    pub fn prune_orphans(&mut self) -> Vec<JobKey> {
        let orphans: Vec<JobKey> = self
            .jobs
            .keys()
            .filter(|key| !self.triggers.values().any(|s| &s.trigger.job_key == *key))
            .cloned()
            .collect();
        for key in &orphans {
            self.jobs.remove(key);
        }
        orphans
    }
}
