//! Configuration loader.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::section::Configuration;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;
        debug!(path = %path.display(), "loading configuration");
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Configuration, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let root: toml::Table = toml::from_str(&expanded)?;
        Ok(Configuration::new(root))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::ConfigSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert!(config.section("ScheduledTasks").is_none());
    }

    #[test]
    fn test_load_scheduled_tasks() {
        let content = r#"
            [ScheduledTasks.Quartz.ReportsGroup]
            DailyReportJob = ["0 0/1 * 1/1 * ? *"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        let list = config
            .string_list("ScheduledTasks:Quartz:ReportsGroup:DailyReportJob")
            .unwrap();
        assert_eq!(list, vec!["0 0/1 * 1/1 * ? *".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Scheduler]").unwrap();
        writeln!(file, "tick_interval_ms = 50").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.scheduler_settings().unwrap().tick_interval_ms, 50);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/cronhost.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("CRONHOST_TEST_CRON", "0 0 * * * ?");
        }
        let content = r#"
            [ScheduledTasks.Quartz.Reports]
            Nightly = ["${CRONHOST_TEST_CRON}"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(
            config
                .string_list("ScheduledTasks:Quartz:Reports:Nightly")
                .unwrap(),
            vec!["0 0 * * * ?".to_string()]
        );
        unsafe {
            std::env::remove_var("CRONHOST_TEST_CRON");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_CRONHOST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/etc/cronhost/cronhost.toml";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/cronhost.toml");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/cronhost.toml"));
    }
}
