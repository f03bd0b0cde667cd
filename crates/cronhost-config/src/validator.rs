//! Configuration validation.

use toml::Value;

use crate::error::ConfigError;
use crate::section::{Configuration, SCHEDULED_TASKS_ROOT};
use crate::settings::{SCHEDULER_SECTION, WAIT_FOR_JOBS_KEY};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
///
/// Checks the shape of the document only. Cron syntax is checked where the
/// triggers are built.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Configuration) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_scheduler(config, &mut result);
        Self::validate_scheduled_tasks(config, &mut result);

        Ok(result)
    }

    fn validate_scheduler(config: &Configuration, result: &mut ValidationResult) {
        let settings = match config.scheduler_settings() {
            Ok(settings) => settings,
            Err(e) => {
                result.add_error(ValidationError::new(SCHEDULER_SECTION, e.to_string()));
                return;
            }
        };

        if settings.tick_interval_ms == 0 {
            result.add_error(ValidationError::new(
                format!("{SCHEDULER_SECTION}:tick_interval_ms"),
                "tick_interval_ms must be greater than 0",
            ));
        }

        let wait_path = format!("{SCHEDULER_SECTION}:{WAIT_FOR_JOBS_KEY}");
        match config.section(&wait_path) {
            None | Some(Value::Boolean(true)) => {}
            Some(_) => result.add_error(ValidationError::new(
                wait_path,
                "running jobs are always drained on shutdown, only `true` is accepted",
            )),
        }

        if settings.shutdown_timeout_secs == Some(0) {
            result.add_warning(ValidationWarning::new(
                format!("{SCHEDULER_SECTION}:shutdown_timeout_secs"),
                "a zero timeout disables the still-waiting warnings",
            ));
        }
    }

    fn validate_scheduled_tasks(config: &Configuration, result: &mut ValidationResult) {
        let entries = match config.scheduled_task_entries() {
            Ok(entries) => entries,
            Err(ConfigError::InvalidValue { field, message }) => {
                result.add_error(ValidationError::new(field, message));
                return;
            }
            Err(e) => {
                result.add_error(ValidationError::new(SCHEDULED_TASKS_ROOT, e.to_string()));
                return;
            }
        };

        for entry in entries {
            if entry.expressions.is_empty() {
                result.add_warning(ValidationWarning::new(
                    entry.path(),
                    "no cron expressions configured",
                ));
            }
            for (index, expression) in entry.expressions.iter().enumerate() {
                if expression.trim().is_empty() {
                    result.add_error(ValidationError::new(
                        format!("{}:{}", entry.path(), index),
                        "cron expression cannot be empty",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
