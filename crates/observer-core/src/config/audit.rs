//! Audit logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Absolute path of the log file.
    ///
    /// Surrounding whitespace is ignored. An absent or blank value is
    /// reported as "no log filename specified" when the sink validates.
    #[serde(default)]
    pub log_path: Option<String>,

    /// Which successful logins are recorded.
    #[serde(default)]
    pub login_scope: LoginScope,

    /// Extra option-name patterns (case-insensitive regular expressions)
    /// skipped by the per-site option handler, on top of the built-in rules.
    #[serde(default)]
    pub ignored_options: Vec<String>,
}

/// Which `wp_login` events produce a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginScope {
    /// Every successful login.
    #[default]
    All,
    /// Only logins of super administrators.
    SuperAdmins,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            log_path: None,
            login_scope: LoginScope::default(),
            ignored_options: Vec::new(),
        }
    }
}

impl AuditConfig {
    /// Create a config that writes to `path`.
    pub fn with_log_path(path: impl Into<String>) -> Self {
        Self {
            log_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// The configured log path, trimmed. `None` when unset or blank.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_is_trimmed() {
        let config = AuditConfig::with_log_path("  /var/log/observer.log\n");
        assert_eq!(config.log_path(), Some(PathBuf::from("/var/log/observer.log")));
    }

    #[test]
    fn test_blank_log_path_is_none() {
        assert_eq!(AuditConfig::with_log_path("   ").log_path(), None);
        assert_eq!(AuditConfig::default().log_path(), None);
    }

    #[test]
    fn test_login_scope_serde() {
        let config: AuditConfig = serde_yaml::from_str("login_scope: super_admins").unwrap();
        assert_eq!(config.login_scope, LoginScope::SuperAdmins);
        assert!(config.enabled);

        let config: AuditConfig = serde_yaml::from_str("enabled: true").unwrap();
        assert_eq!(config.login_scope, LoginScope::All);
    }
}
