//! Engine configuration
//!
//! Loaded from JSON; every field has a default so partial documents are
//! accepted.

use crate::types::{DEFAULT_INDEX_CAPACITY, DEFAULT_TEMP_TABLE_MEMORY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Table layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Memory budget for temp tables of one execution scope (bytes)
    pub temp_table_memory_limit: usize,
    /// Initial entry capacity of hash indexes
    pub index_initial_capacity: usize,
    /// Whether to enable logging
    pub enable_log: bool,
    /// Log level
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temp_table_memory_limit: DEFAULT_TEMP_TABLE_MEMORY,
            index_initial_capacity: DEFAULT_INDEX_CAPACITY,
            enable_log: true,
            log_level: LogLevel::Info,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.temp_table_memory_limit, DEFAULT_TEMP_TABLE_MEMORY);
        assert_eq!(config.index_initial_capacity, DEFAULT_INDEX_CAPACITY);
        assert!(config.enable_log);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_config_partial_json() {
        let config = EngineConfig::from_json_str(r#"{"temp_table_memory_limit": 4096, "log_level": "debug"}"#).unwrap();
        assert_eq!(config.temp_table_memory_limit, 4096);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.index_initial_capacity, DEFAULT_INDEX_CAPACITY);
    }

    #[test]
    fn test_config_invalid_json() {
        let result = EngineConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"index_initial_capacity": 8, "enable_log": false}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.index_initial_capacity, 8);
        assert!(!config.enable_log);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = EngineConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EngineConfig {
            log_level: LogLevel::Warn,
            ..EngineConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"warn\""));
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}
