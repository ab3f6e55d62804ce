//! Configuration types for Observer.
//!
//! Configuration is read from an optional YAML file (`observer.yaml`) and the
//! `OBSERVER_LOG` environment variable, then combined into a single
//! `ObserverConfig`.
//!
//! ```yaml
//! audit:
//!   log_path: /var/log/observer.log
//!   login_scope: all
//!   ignored_options:
//!     - "^_site_transient_"
//! directory: directory.yaml
//! ```

pub mod audit;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use audit::{AuditConfig, LoginScope};

/// Environment variable holding the absolute log file path.
pub const LOG_PATH_ENV: &str = "OBSERVER_LOG";

/// Complete Observer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Path to a YAML user/site directory used by the CLI to resolve logins
    /// and site paths. Relative paths resolve against the config file.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ObserverConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Configuration taken from the environment only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a config file, resolve its relative paths and apply the
    /// environment on top.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(directory) = config.directory.take() {
            config.directory = Some(if directory.is_absolute() {
                directory
            } else {
                base_dir.join(directory)
            });
        }

        config.apply_env();
        Ok(config)
    }

    /// Override the log path with `OBSERVER_LOG` when it is set.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(LOG_PATH_ENV) {
            self.audit.log_path = Some(value.trim().to_string());
        }
    }
}
