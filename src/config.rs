//! Configuration loaded from TOML.
//!
//! ```toml
//! [store]
//! path = ".typed-store"
//! namespace = "settings"
//! durability = "sync-all"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how a persistent store is opened.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory of the fjall database.
    pub path: PathBuf,
    /// Namespace isolating this store's keys from other stores in the same
    /// database.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub durability: Durability,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
            durability: Durability::default(),
        }
    }
}

/// How hard each write is pushed to disk before the call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Durability {
    /// fsync data and metadata.
    #[default]
    SyncAll,
    /// fsync data only.
    SyncData,
    /// Flush to OS buffers without fsync.
    Buffer,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Subscriber settings for binaries embedding the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"typed_store=debug"`.
    pub level: String,
    pub format: LogFormat,
    /// `"stdout"`, `"stderr"`, or a file path to append to.
    pub output: String,
    pub color: bool,
    pub target: bool,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: "stderr".to_string(),
            color: true,
            target: false,
            timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
path = "/var/lib/app/prefs"
namespace = "session"
durability = "buffer"

[logging]
level = "typed_store=debug"
format = "json"
output = "stdout"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/app/prefs"));
        assert_eq!(config.store.namespace, "session");
        assert_eq!(config.store.durability, Durability::Buffer);
        assert_eq!(config.logging.level, "typed_store=debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.output, "stdout");
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("[store]\npath = \".typed-store\"\n").unwrap();
        assert_eq!(config.store.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.store.durability, Durability::SyncAll);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stderr");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Config::parse("[logging]\nlevel = \"info\"\n").is_err());
        assert!(Config::parse("[store]\npath = \"x\"\ndurability = \"never\"\n").is_err());

        let err = Config::from_file("/nonexistent/typed-store.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/typed-store.toml"));
    }
}
