//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Main configuration struct matching the sitepress.yml schema.
///
/// Built once at startup and handed to each component; nothing reads it
/// through a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,

    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_days")]
    pub days: u64,
}

fn default_retention_days() -> u64 {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_base")]
    pub base_url: String,
}

fn default_preview_base() -> String {
    String::from("/preview/")
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base_url: default_preview_base(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_storage_root("storage")
    }
}

impl Config {
    /// Config with default retention and preview settings.
    pub fn with_storage_root(root: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageConfig { root: root.into() },
            retention: RetentionConfig::default(),
            preview: PreviewConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.root".into(),
                message: "must not be empty".into(),
            });
        }
        if self.retention.days > u64::MAX / SECONDS_PER_DAY {
            return Err(ConfigError::InvalidValue {
                field: "retention.days".into(),
                message: format!("{} is out of range", self.retention.days),
            });
        }
        Ok(())
    }

    /// Storage root, resolved relative to the config file
    pub fn storage_root(&self) -> PathBuf {
        self.resolve_path(&self.storage.root)
    }

    /// How long conversions are kept before a sweep removes them.
    pub fn retention_period(&self) -> Duration {
        retention_days(self.retention.days)
    }

    /// Preview base with a trailing slash ("/preview/")
    pub fn preview_base_url(&self) -> String {
        let mut base = self.preview.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Convert a whole number of days into a `Duration`, saturating on overflow.
pub fn retention_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))
}
