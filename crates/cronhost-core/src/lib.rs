//! # cronhost Core
//!
//! Building blocks for scheduled jobs.
//!
//! ## Components
//!
//! - [`Job`] - the capability every job implements (key, listeners, execute)
//! - [`OneTimeJob`] - a job started imperatively with an immediate trigger
//! - [`RecurringJob`] / [`Recurring`] - a job whose triggers come from
//!   configured cron expressions plus programmatic triggers
//! - [`JobListener`] - observer of job lifecycle events
//! - [`Scheduler`] / [`SchedulerFactory`] - the engine boundary
//!
//! Building definitions and triggers never touches the engine. Only
//! [`OneTimeJob::start_now`] and the host bootstrap talk to a [`Scheduler`].

pub mod context;
pub mod cron_expr;
pub mod data;
pub mod detail;
pub mod error;
pub mod job;
pub mod key;
pub mod listener;
pub mod logging;
pub mod one_time;
pub mod recurring;
pub mod scheduler;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use context::JobExecutionContext;
pub use cron_expr::CronExpression;
pub use data::JobDataMap;
pub use detail::{ConcurrencyPolicy, DefinitionCell, JobDetail};
pub use error::{JobExecutionError, Result, SchedulerError};
pub use job::Job;
pub use key::{JobKey, TriggerKey, DEFAULT_GROUP};
pub use listener::{JobListener, ListenerMatcher, LoggingJobListener};
pub use one_time::OneTimeJob;
pub use recurring::{Recurring, RecurringJob};
pub use scheduler::{Scheduler, SchedulerFactory, TriggerGuard};
pub use trigger::{Trigger, TriggerBuilder, TriggerSchedule};

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
