//! Colon-path access to configuration sections.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use toml::Value;

use crate::error::ConfigError;
use crate::settings::{SchedulerSettings, SCHEDULER_SECTION};

/// Root of the per-job cron schedule sections.
pub const SCHEDULED_TASKS_ROOT: &str = "ScheduledTasks:Quartz";

/// Path of the cron schedule list for a job: `ScheduledTasks:Quartz:<group>:<name>`.
pub fn job_section_path(group: &str, name: &str) -> String {
    format!("{SCHEDULED_TASKS_ROOT}:{group}:{name}")
}

/// A source of configuration values addressed by colon paths.
///
/// Implementations must treat a missing path as an empty list.
pub trait ConfigSource: Send + Sync {
    /// Read an ordered list of strings at `path`.
    fn string_list(&self, path: &str) -> Result<Vec<String>, ConfigError>;
}

/// One `group.name = [...]` entry under `ScheduledTasks.Quartz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTaskEntry {
    pub group: String,
    pub name: String,
    pub expressions: Vec<String>,
}

impl ScheduledTaskEntry {
    /// Colon path of this entry.
    pub fn path(&self) -> String {
        job_section_path(&self.group, &self.name)
    }
}

/// A loaded TOML configuration document.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    root: toml::Table,
}

impl Configuration {
    pub fn new(root: toml::Table) -> Self {
        Self { root }
    }

    /// Look up the value at a colon path. Segment matching is case-insensitive.
    pub fn section(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(':').filter(|s| !s.is_empty());
        let mut current = lookup(&self.root, segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Table(table) => lookup(table, segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Deserialize the section at `path`, or return `T::default()` when absent.
    pub fn bind<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        match self.section(path) {
            None => Ok(T::default()),
            Some(value) => value
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::invalid_value(path, e.message())),
        }
    }

    /// Scheduler settings bound from the `Scheduler` section.
    pub fn scheduler_settings(&self) -> Result<SchedulerSettings, ConfigError> {
        self.bind(SCHEDULER_SECTION)
    }

    /// Every job entry under `ScheduledTasks:Quartz`, ordered by group then name.
    pub fn scheduled_task_entries(&self) -> Result<Vec<ScheduledTaskEntry>, ConfigError> {
        let groups = match self.section(SCHEDULED_TASKS_ROOT) {
            None => return Ok(Vec::new()),
            Some(Value::Table(groups)) => groups,
            Some(other) => {
                return Err(ConfigError::invalid_value(
                    SCHEDULED_TASKS_ROOT,
                    format!("expected a table of job groups, found {}", other.type_str()),
                ))
            }
        };

        let mut entries = Vec::new();
        for (group, jobs) in groups {
            let Value::Table(jobs) = jobs else {
                return Err(ConfigError::invalid_value(
                    format!("{SCHEDULED_TASKS_ROOT}:{group}"),
                    format!("expected a table of jobs, found {}", jobs.type_str()),
                ));
            };
            for (name, value) in jobs {
                let path = job_section_path(group, name);
                entries.push(ScheduledTaskEntry {
                    group: group.clone(),
                    name: name.clone(),
                    expressions: strings_at(&path, value)?,
                });
            }
        }
        Ok(entries)
    }
}

impl ConfigSource for Configuration {
    fn string_list(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        match self.section(path) {
            None => Ok(Vec::new()),
            Some(value) => strings_at(path, value),
        }
    }
}

/// In-memory configuration source.
///
/// Handy for programmatic setups and tests. Paths are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    lists: HashMap<String, Vec<String>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`MemoryConfig::set_list`].
    pub fn with_list<I, S>(mut self, path: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_list(path, items);
        self
    }

    /// Set the list stored at `path`, replacing any previous value.
    pub fn set_list<I, S>(&mut self, path: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists.insert(
            path.to_ascii_lowercase(),
            items.into_iter().map(Into::into).collect(),
        );
    }
}

impl ConfigSource for MemoryConfig {
    fn string_list(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .lists
            .get(&path.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a Value> {
    table.get(key).or_else(|| {
        table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn strings_at(path: &str, value: &Value) -> Result<Vec<String>, ConfigError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ConfigError::invalid_value(
                    format!("{path}:{index}"),
                    format!("expected a string, found {}", other.type_str()),
                )),
            })
            .collect(),
        other => Err(ConfigError::invalid_value(
            path,
            format!("expected a list of strings, found {}", other.type_str()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigLoader;

    fn sample() -> Configuration {
        ConfigLoader::load_str(
            r#"
            [ScheduledTasks.Quartz.Reports]
            DailyReport = ["0 0 * * * ?", "0 30 12 * * ?"]
            Single = "0 0 6 * * ?"
            Empty = []

            [ScheduledTasks.Quartz.Maintenance]
            Purge = ["0 0 3 * * ?"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_job_section_path() {
        assert_eq!(
            job_section_path("Reports", "DailyReport"),
            "ScheduledTasks:Quartz:Reports:DailyReport"
        );
    }

    #[test]
    fn test_string_list_preserves_order() {
        let list = sample()
            .string_list("ScheduledTasks:Quartz:Reports:DailyReport")
            .unwrap();
        assert_eq!(list, vec!["0 0 * * * ?", "0 30 12 * * ?"]);
    }

    #[test]
    fn test_string_list_missing_is_empty() {
        let list = sample()
            .string_list("ScheduledTasks:Quartz:Reports:Missing")
            .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_string_list_single_string() {
        let list = sample()
            .string_list("ScheduledTasks:Quartz:Reports:Single")
            .unwrap();
        assert_eq!(list, vec!["0 0 6 * * ?"]);
    }

    #[test]
    fn test_section_lookup_is_case_insensitive() {
        let list = sample()
            .string_list("scheduledtasks:quartz:reports:dailyreport")
            .unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_string_list_rejects_non_string_items() {
        let config = ConfigLoader::load_str(
            r#"
            [ScheduledTasks.Quartz.Reports]
            Broken = ["0 0 * * * ?", 42]
            "#,
        )
        .unwrap();
        let err = config
            .string_list("ScheduledTasks:Quartz:Reports:Broken")
            .unwrap_err();
        assert!(err.to_string().contains("Broken:1"));
    }

    #[test]
    fn test_string_list_rejects_tables() {
        let config = sample();
        let result = config.string_list("ScheduledTasks:Quartz:Reports");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_scheduled_task_entries() {
        let entries = sample().scheduled_task_entries().unwrap();
        assert_eq!(entries.len(), 4);
        let purge = entries.iter().find(|e| e.name == "Purge").unwrap();
        assert_eq!(purge.group, "Maintenance");
        assert_eq!(purge.path(), "ScheduledTasks:Quartz:Maintenance:Purge");
    }

    #[test]
    fn test_scheduled_task_entries_absent() {
        let entries = Configuration::default().scheduled_task_entries().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_bind_absent_section_defaults() {
        let settings: SchedulerSettings = Configuration::default().bind("Scheduler").unwrap();
        assert_eq!(settings, SchedulerSettings::default());
    }

    #[test]
    fn test_memory_config() {
        let config = MemoryConfig::new().with_list(
            "ScheduledTasks:Quartz:Reports:DailyReport",
            ["0 0 * * * ?"],
        );
        assert_eq!(
            config
                .string_list("ScheduledTasks:Quartz:REPORTS:DailyReport")
                .unwrap(),
            vec!["0 0 * * * ?"]
        );
        assert!(config.string_list("ScheduledTasks:Quartz:Other:Job").unwrap().is_empty());
    }
}
