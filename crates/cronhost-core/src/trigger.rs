//! Triggers: when a job definition fires.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cron_expr::CronExpression;
use crate::data::JobDataMap;
use crate::error::Result;
use crate::key::{JobKey, TriggerKey};

/// Firing rule of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSchedule {
    /// Fires on every match of a cron expression.
    Cron(CronExpression),
    /// Fires once, as soon as the engine sees it.
    Now,
    /// Fires once at the given instant.
    At(DateTime<Utc>),
    /// Fires every `every`, starting immediately. `repeat` is the number of
    /// repetitions after the first fire; `None` repeats forever.
    Interval {
        every: Duration,
        repeat: Option<u32>,
    },
}

impl TriggerSchedule {
    /// First fire time for a trigger submitted at `now`.
    pub fn first_fire_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TriggerSchedule::Cron(expr) => expr.next_after(now),
            TriggerSchedule::Now | TriggerSchedule::Interval { .. } => Some(now),
            TriggerSchedule::At(at) => Some(*at),
        }
    }

    /// Fire time following `previous`, given how many times the trigger has
    /// fired so far (including `previous`). `None` when exhausted.
    pub fn next_fire_time(
        &self,
        previous: DateTime<Utc>,
        times_fired: u32,
    ) -> Option<DateTime<Utc>> {
        match self {
            TriggerSchedule::Cron(expr) => expr.next_after(previous),
            TriggerSchedule::Now | TriggerSchedule::At(_) => None,
            TriggerSchedule::Interval { every, repeat } => {
                if repeat.is_some_and(|r| times_fired > r) {
                    return None;
                }
                let step = chrono::Duration::from_std(*every).ok()?;
                previous.checked_add_signed(step)
            }
        }
    }

    /// Whether the schedule can fire more than once.
    pub fn is_repeating(&self) -> bool {
        match self {
            TriggerSchedule::Cron(_) => true,
            TriggerSchedule::Interval { repeat, .. } => repeat != &Some(0),
            TriggerSchedule::Now | TriggerSchedule::At(_) => false,
        }
    }
}

/// A trigger bound to a job key.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub key: TriggerKey,
    pub job_key: JobKey,
    pub schedule: TriggerSchedule,
    pub data: JobDataMap,
    pub description: Option<String>,
}

impl Trigger {
    /// Start building a trigger for `job_key`.
    pub fn builder(job_key: JobKey) -> TriggerBuilder {
        TriggerBuilder::new(job_key)
    }

    /// Cron trigger with a generated identity.
    pub fn cron(job_key: &JobKey, expression: &str) -> Result<Self> {
        Ok(Self::builder(job_key.clone())
            .with_cron_schedule(expression)?
            .build())
    }

    /// Immediate one-shot trigger with a generated identity.
    pub fn now(job_key: &JobKey, data: Option<JobDataMap>) -> Self {
        let mut builder = Self::builder(job_key.clone()).start_now();
        if let Some(data) = data {
            builder = builder.using_job_data(data);
        }
        builder.build()
    }

    /// Whether this trigger's cron expression, if any, equals `expression`.
    pub fn has_cron(&self, expression: &str) -> bool {
        matches!(&self.schedule, TriggerSchedule::Cron(expr) if expr.as_str() == expression.trim())
    }
}

/// Fluent builder for [`Trigger`].
///
/// Without an explicit identity the trigger gets one from
/// [`TriggerKey::generate_for`]. Without an explicit schedule it fires once,
/// immediately.
#[derive(Debug, Clone)]
pub struct TriggerBuilder {
    job_key: JobKey,
    key: Option<TriggerKey>,
    schedule: TriggerSchedule,
    data: JobDataMap,
    description: Option<String>,
}

impl TriggerBuilder {
    pub fn new(job_key: JobKey) -> Self {
        Self {
            job_key,
            key: None,
            schedule: TriggerSchedule::Now,
            data: JobDataMap::new(),
            description: None,
        }
    }

    /// Retarget the trigger at another job.
    pub fn for_job(mut self, job_key: JobKey) -> Self {
        self.job_key = job_key;
        self
    }

    pub fn with_identity(mut self, key: TriggerKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_schedule(mut self, schedule: TriggerSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Validate `expression` and use it as the schedule.
    pub fn with_cron_schedule(self, expression: &str) -> Result<Self> {
        let expr = CronExpression::parse(expression)?;
        Ok(self.with_schedule(TriggerSchedule::Cron(expr)))
    }

    pub fn start_now(self) -> Self {
        self.with_schedule(TriggerSchedule::Now)
    }

    pub fn start_at(self, at: DateTime<Utc>) -> Self {
        self.with_schedule(TriggerSchedule::At(at))
    }

    pub fn with_interval(self, every: Duration, repeat: Option<u32>) -> Self {
        self.with_schedule(TriggerSchedule::Interval { every, repeat })
    }

    pub fn using_job_data(mut self, data: JobDataMap) -> Self {
        self.data = data;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Trigger {
        let key = self
            .key
            .unwrap_or_else(|| TriggerKey::generate_for(&self.job_key));
        Trigger {
            key,
            job_key: self.job_key,
            schedule: self.schedule,
            data: self.data,
            description: self.description,
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
