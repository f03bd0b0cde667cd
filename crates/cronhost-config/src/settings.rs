//! Engine settings.

use serde::{Deserialize, Serialize};

/// Section holding [`SchedulerSettings`].
pub const SCHEDULER_SECTION: &str = "Scheduler";

/// Key kept for older configuration files. Only `true` is valid: running jobs
/// are always drained on shutdown.
pub const WAIT_FOR_JOBS_KEY: &str = "wait_for_jobs_to_complete";

fn default_tick_interval_ms() -> u64 {
    250
}

/// Settings for the in-process scheduler and its hosted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// How often the engine looks for due triggers.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Interval for "still waiting" warnings during a graceful shutdown.
    /// Waiting never stops because of it.
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            shutdown_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigLoader;

    #[test]
    fn test_default_settings() {
        let settings = SchedulerSettings::default();
        assert_eq!(settings.tick_interval_ms, 250);
        assert!(settings.shutdown_timeout_secs.is_none());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config = ConfigLoader::load_str(
            r#"
            [Scheduler]
            shutdown_timeout_secs = 30
            "#,
        )
        .unwrap();
        let settings = config.scheduler_settings().unwrap();
        assert_eq!(settings.tick_interval_ms, 250);
        assert_eq!(settings.shutdown_timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_section_is_reported() {
        let config = ConfigLoader::load_str(
            r#"
            [Scheduler]
            tick_interval_ms = "fast"
            "#,
        )
        .unwrap();
        let err = config.scheduler_settings().unwrap_err();
        assert!(err.to_string().contains("Scheduler"));
    }
}
