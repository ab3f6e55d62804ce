//! # observer-core
//!
//! Configuration shared by the Observer crates.
//!
//! The only value the host has to provide is the absolute path of the audit
//! log file. It comes from the `OBSERVER_LOG` environment variable or from the
//! `audit.log_path` key of an `observer.yaml` file; the environment wins when
//! both are set.

// Configuration types shared across all Observer crates
pub mod config;

pub use config::{AuditConfig, ConfigError, LoginScope, ObserverConfig, LOG_PATH_ENV};
