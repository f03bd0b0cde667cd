//! # cronhost Config
//!
//! Configuration management for cronhost.
//!
//! Settings live in a TOML document. Sections are addressed with
//! colon-separated paths, so the cron schedules of the job
//! `{name: "DailyReport", group: "Reports"}` are read from
//! `ScheduledTasks:Quartz:Reports:DailyReport`:
//!
//! ```toml
//! [ScheduledTasks.Quartz.Reports]
//! DailyReport = ["0 0 * * * ?"]
//! ```

mod error;
mod loader;
mod section;
mod settings;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use section::{
    job_section_path, ConfigSource, Configuration, MemoryConfig, ScheduledTaskEntry,
    SCHEDULED_TASKS_ROOT,
};
pub use settings::{SchedulerSettings, SCHEDULER_SECTION, WAIT_FOR_JOBS_KEY};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
