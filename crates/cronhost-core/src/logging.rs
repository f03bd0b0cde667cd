//! Logging helpers for job events.
//!
//! Every job-related log line carries the job key and a numeric event id so
//! log pipelines can filter on it.

use tracing::{error, info};

use crate::key::JobKey;

/// Event id attached to informational job entries.
pub const JOB_INFORMATION_EVENT_ID: u32 = 2;

/// Event id attached to job error entries.
pub const JOB_ERROR_EVENT_ID: u32 = 4;

/// Log an informational job message.
pub fn log_job_information(key: &JobKey, message: &str) {
    info!(event_id = JOB_INFORMATION_EVENT_ID, job = %key, "{}", message);
}

/// Log a job error.
pub fn log_job_error(key: &JobKey, message: &str) {
    error!(event_id = JOB_ERROR_EVENT_ID, job = %key, "{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids() {
        assert_eq!(JOB_INFORMATION_EVENT_ID, 2);
        assert_eq!(JOB_ERROR_EVENT_ID, 4);
    }

    #[test]
    fn test_helpers_without_subscriber() {
        let key = JobKey::new("DailyReport", "Reports");
        log_job_information(&key, "started");
        log_job_error(&key, "failed");
    }
}
