//! CLI command implementations.

pub mod hooks;
pub mod record;
pub mod status;

use anyhow::{Context, Result};
use observer_audit::{Observer, StaticDirectory};
use observer_core::ObserverConfig;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Load `observer.yaml` when given, otherwise configure from the environment.
pub fn load_config(path: Option<&Path>) -> Result<ObserverConfig> {
    match path {
        Some(path) => ObserverConfig::load_with_context(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ObserverConfig::from_env()),
    }
}

/// The user/site directory named by the config, or an empty one.
pub fn load_directory(config: &ObserverConfig) -> Result<StaticDirectory> {
    let Some(path) = &config.directory else {
        return Ok(StaticDirectory::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;
    StaticDirectory::from_yaml(&content)
        .with_context(|| format!("Failed to parse directory {}", path.display()))
}

pub fn build_observer(config: &ObserverConfig) -> Result<Observer> {
    let directory = Arc::new(load_directory(config)?);
    Observer::new(config.audit.clone(), directory).context("Failed to set up the audit trail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use observer_audit::Directory;

    #[test]
    fn test_load_directory_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("directory.yaml"),
            "users:\n  1: admin\nsuper_admins: [1]\n",
        )
        .unwrap();
        fs::write(dir.path().join("observer.yaml"), "directory: directory.yaml\n").unwrap();

        let config = load_config(Some(dir.path().join("observer.yaml").as_path())).unwrap();
        let directory = load_directory(&config).unwrap();
        assert_eq!(directory.user_login(1).as_deref(), Some("admin"));
        assert!(directory.is_super_admin(1));
    }

    #[test]
    fn test_missing_directory_file_is_an_error() {
        let config = ObserverConfig {
            directory: Some("/nonexistent/directory.yaml".into()),
            ..Default::default()
        };
        assert!(load_directory(&config).is_err());
    }

    #[test]
    fn test_no_directory_is_empty() {
        let directory = load_directory(&ObserverConfig::default()).unwrap();
        assert_eq!(directory.user_login(1), None);
    }
}
