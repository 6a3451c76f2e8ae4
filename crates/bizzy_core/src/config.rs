//! Environment-driven configuration for the core and its shells.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable names.
pub mod env_vars {
    /// SQLite database file. Unset means `defaults::DB_FILE_NAME` in the temp dir.
    pub const DB_PATH: &str = "BIZZY_DB_PATH";
    /// One of `trace|debug|info|warn|error`.
    pub const LOG_LEVEL: &str = "BIZZY_LOG_LEVEL";
    /// Absolute directory for rolling log files. Unset disables file logging.
    pub const LOG_DIR: &str = "BIZZY_LOG_DIR";
    /// Set to `1` or `true` to open a throwaway in-memory database.
    pub const IN_MEMORY: &str = "BIZZY_IN_MEMORY";
}

/// Default values.
pub mod defaults {
    pub const DB_FILE_NAME: &str = "bizzy.sqlite3";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageTarget,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidFlag { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFlag { name, value } => {
                write!(f, "invalid boolean `{value}` for {name}; expected true|false|1|0")
            }
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let in_memory = match get(env_vars::IN_MEMORY) {
            Some(value) => parse_flag(env_vars::IN_MEMORY, &value)?,
            None => false,
        };
        let storage = if in_memory {
            StorageTarget::Memory
        } else {
            let path = get(env_vars::DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(defaults::DB_FILE_NAME));
            StorageTarget::File(path)
        };

        Ok(Self {
            storage,
            log_level: get(env_vars::LOG_LEVEL)
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: get(env_vars::LOG_DIR).map(PathBuf::from),
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{env_vars, ConfigError, CoreConfig, StorageTarget};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CoreConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert!(matches!(config.storage, StorageTarget::File(ref path) if path.ends_with("bizzy.sqlite3")));
        assert!(config.log_dir.is_none());
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn explicit_values_win() {
        let config = config_from(&[
            (env_vars::DB_PATH, "/var/lib/bizzy/farm.db"),
            (env_vars::LOG_LEVEL, "warn"),
            (env_vars::LOG_DIR, " /var/log/bizzy "),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageTarget::File(PathBuf::from("/var/lib/bizzy/farm.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/bizzy")));
    }

    #[test]
    fn in_memory_flag_overrides_path() {
        let config = config_from(&[(env_vars::IN_MEMORY, "TRUE"), (env_vars::DB_PATH, "x.db")])
            .unwrap();
        assert_eq!(config.storage, StorageTarget::Memory);

        let err = config_from(&[(env_vars::IN_MEMORY, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));
    }
}
