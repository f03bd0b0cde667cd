//! Job and trigger identities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SchedulerError};

/// Group used when none is given.
pub const DEFAULT_GROUP: &str = "DEFAULT";

/// Identity of a job definition: `(name, group)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey {
    pub name: String,
    pub group: String,
}

impl JobKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// A key in [`DEFAULT_GROUP`].
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_GROUP)
    }

    /// Reject keys with an empty name or group.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SchedulerError::InvalidJobKey(format!(
                "name is empty (group '{}')",
                self.group
            )));
        }
        if self.group.trim().is_empty() {
            return Err(SchedulerError::InvalidJobKey(format!(
                "group is empty (name '{}')",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}

/// Identity of a trigger: `(name, group)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerKey {
    pub name: String,
    pub group: String,
}

impl TriggerKey {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Fresh key for a trigger of `job`: `<job name>-<uuid>` in the job's group.
    pub fn generate_for(job: &JobKey) -> Self {
        Self::new(format!("{}-{}", job.name, Uuid::new_v4()), job.group.clone())
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}
