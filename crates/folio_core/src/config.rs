//! Process configuration read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `FOLIO_DB_PATH` | `<temp_dir>/folio.sqlite3` |
//! | `FOLIO_LOG_LEVEL` | [`default_log_level`] |
//! | `FOLIO_LOG_DIR` | unset: logging stays off |
//! | `FOLIO_PAGE_SIZE` | `10`, within `1..=100` |
//!
//! Blank values count as unset.

use crate::logging::{
    default_log_level, init_logging, normalize_level, normalize_log_dir, LoggingError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FOLIO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FOLIO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FOLIO_LOG_DIR";
pub const ENV_PAGE_SIZE: &str = "FOLIO_PAGE_SIZE";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_DB_FILE_NAME: &str = "folio.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Logging {
        variable: &'static str,
        source: LoggingError,
    },
    InvalidPageSize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging { variable, source } => write!(f, "{variable}: {source}"),
            Self::InvalidPageSize(value) => write!(
                f,
                "{ENV_PAGE_SIZE}: expected an integer in 1..={MAX_PAGE_SIZE}, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging { source, .. } => Some(source),
            Self::InvalidPageSize(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|source| ConfigError::Logging {
                variable: ENV_LOG_LEVEL,
                source,
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(|source| {
                ConfigError::Logging {
                    variable: ENV_LOG_DIR,
                    source,
                }
            })?);
        }

        if let Some(raw) = read(ENV_PAGE_SIZE) {
            config.page_size = raw
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or(ConfigError::InvalidPageSize(raw))?;
        }

        Ok(config)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns whether logging is active afterwards.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        init_logging(self.log_level, &dir.to_string_lossy())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_PAGE_SIZE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.log_dir.is_none());
        assert!(config.db_path.ends_with("folio.sqlite3"));
    }

    #[test]
    fn explicit_values_are_normalized() {
        let log_dir = std::env::temp_dir().join("folio-config-test");
        let log_dir_text = log_dir.to_str().unwrap();
        let config = CoreConfig::from_lookup(lookup(&[
            ("FOLIO_DB_PATH", " /srv/folio/data.db "),
            ("FOLIO_LOG_LEVEL", "WARNING"),
            ("FOLIO_LOG_DIR", log_dir_text),
            ("FOLIO_PAGE_SIZE", "20"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/srv/folio/data.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CoreConfig::from_lookup(lookup(&[("FOLIO_PAGE_SIZE", "  ")])).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for size in ["0", "101", "ten"] {
            let err = CoreConfig::from_lookup(lookup(&[("FOLIO_PAGE_SIZE", size)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPageSize(_)));
        }

        let err =
            CoreConfig::from_lookup(lookup(&[("FOLIO_LOG_DIR", "relative/logs")])).unwrap_err();
        assert!(err.to_string().starts_with("FOLIO_LOG_DIR"));

        let err = CoreConfig::from_lookup(lookup(&[("FOLIO_LOG_LEVEL", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::Logging { .. }));
    }

    #[test]
    fn init_logging_is_skipped_without_log_dir() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.init_logging().unwrap());
    }
}
