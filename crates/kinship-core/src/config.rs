//! Configuration loading and typed config structures for the Kinship network.
//!
//! The configuration lives in `kinship.yaml`. Every section is optional and
//! falls back to the defaults below, so an empty file (or no file at all)
//! yields a working setup that keeps its data in `./data`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kinship_graph::DuplicatePolicy;
use serde::Deserialize;

/// Environment variable that replaces `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "KINSHIP_DATA_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level network configuration.
///
/// Mirrors the structure of `kinship.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Where snapshots live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Friendship graph behaviour.
    #[serde(default)]
    pub graph: GraphConfig,

    /// When snapshots are written.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NetworkConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `KINSHIP_DATA_DIR` overrides `storage.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty string is a valid, all-default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`NetworkConfig::from_file`] when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.storage.apply_env_overrides();
            Ok(config)
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `users.txt`, `friends.txt` and the life-event files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Apply `KINSHIP_DATA_DIR` if it is set.
    pub fn apply_env_overrides(&mut self) {
        self.override_data_dir(std::env::var_os(DATA_DIR_ENV));
    }

    /// Replace `data_dir` with `value` unless it is absent or empty.
    pub fn override_data_dir(&mut self, value: Option<OsString>) {
        if let Some(dir) = value.filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }
}

/// Friendship graph configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GraphConfig {
    /// What to do when a friendship is added twice.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// When mutations reach disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    /// Rewrite the touched snapshot after every mutation.
    #[default]
    Eager,
    /// Hold changes in memory until [`crate::Network::flush`].
    OnShutdown,
}

/// Persistence configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Write policy.
    #[serde(default)]
    pub mode: PersistenceMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format on stderr.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "warn".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = NetworkConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.graph.duplicate_policy, DuplicatePolicy::Keep);
        assert_eq!(config.persistence.mode, PersistenceMode::Eager);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
storage:
  data_dir: "/tmp/kinship"
graph:
  duplicate_policy: ignore
persistence:
  mode: on_shutdown
logging:
  level: "debug"
  format: json
"#;
        let config: NetworkConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/kinship"));
        assert_eq!(config.graph.duplicate_policy, DuplicatePolicy::Ignore);
        assert_eq!(config.persistence.mode, PersistenceMode::OnShutdown);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config: NetworkConfig = serde_yml::from_str("logging:\n  level: info\n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.persistence.mode, PersistenceMode::Eager);
        assert_eq!(config.graph, GraphConfig::default());
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(NetworkConfig::parse("graph:\n  duplicate_policy: sometimes\n").is_err());
    }

    #[test]
    fn empty_env_value_keeps_configured_dir() {
        let mut storage = StorageConfig::default();
        storage.override_data_dir(Some(OsString::new()));
        assert_eq!(storage.data_dir, PathBuf::from("data"));
        storage.override_data_dir(Some(OsString::from("/srv/kinship")));
        assert_eq!(storage.data_dir, PathBuf::from("/srv/kinship"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NetworkConfig::load_or_default(&dir.path().join("kinship.yaml")).unwrap();
        assert_eq!(config.graph, GraphConfig::default());
    }
}
