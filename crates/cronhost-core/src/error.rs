//! Error types for job definition, trigger assembly and scheduling.

use thiserror::Error;

use cronhost_config::ConfigError;

use crate::key::{JobKey, TriggerKey};

/// Errors raised while building or scheduling jobs.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A cron expression failed validation.
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    /// A configured value could not be turned into a trigger.
    #[error("Invalid configuration at {path}: {reason}")]
    InvalidConfiguration { path: String, reason: String },

    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A job key has an empty name or group.
    #[error("Invalid job key: {0}")]
    InvalidJobKey(String),

    /// The scheduling engine cannot be reached or is not running.
    #[error("Scheduler unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine has been shut down and accepts no more work.
    #[error("Scheduler has been shut down")]
    Shutdown,

    /// A job with this key is already stored and replacement was not requested.
    #[error("Job already exists: {0}")]
    JobAlreadyExists(JobKey),

    /// No job with this key is stored.
    #[error("Job not found: {0}")]
    JobNotFound(JobKey),

    /// A trigger does not fit the job it was submitted with.
    #[error("Invalid trigger {trigger}: {reason}")]
    InvalidTrigger { trigger: TriggerKey, reason: String },

    /// A registry entry with the same id exists.
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// A job factory failed to produce an instance.
    #[error("Failed to instantiate job '{id}': {reason}")]
    Instantiation { id: String, reason: String },
}

/// Result type for scheduling operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Failure returned by a job's work.
///
/// The engine logs it, reports it to listeners through
/// `job_was_executed`, and refires the job right away when
/// `refire_immediately` is set.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct JobExecutionError {
    pub message: String,
    pub refire_immediately: bool,
}

impl JobExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            refire_immediately: false,
        }
    }

    /// Ask the engine to run the job again straight away.
    pub fn refire(mut self) -> Self {
        self.refire_immediately = true;
        self
    }
}

impl From<String> for JobExecutionError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for JobExecutionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
