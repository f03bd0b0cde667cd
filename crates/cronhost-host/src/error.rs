//! Host errors.

use thiserror::Error;

use cronhost_config::ConfigError;
use cronhost_core::SchedulerError;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Service not registered: {0}")]
    MissingService(String),

    #[error("Invalid host state: {0}")]
    InvalidState(String),

    #[error("Hosted service '{service}' failed: {message}")]
    ServiceFailed { service: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_service_display() {
        let err = HostError::MissingService("ReportStore".to_string());
        assert!(err.to_string().contains("ReportStore"));
    }

    #[test]
    fn test_service_failed_display() {
        let err = HostError::ServiceFailed {
            service: "scheduler".to_string(),
            message: "already stopped".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("scheduler"));
        assert!(msg.contains("already stopped"));
    }

    #[test]
    fn test_from_scheduler_error() {
        let err: HostError = SchedulerError::Shutdown.into();
        assert!(matches!(err, HostError::Scheduler(SchedulerError::Shutdown)));
    }
}
