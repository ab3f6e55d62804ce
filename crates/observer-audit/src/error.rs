//! Error types for the audit crate.

use std::path::PathBuf;
use thiserror::Error;

/// Why the configured log file cannot be written.
///
/// The messages are shown verbatim on the status display, so they are written
/// for an administrator rather than a developer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogTargetError {
    /// No path configured.
    #[error("There is no log filename specified.")]
    NoPath,

    /// The path names a directory.
    #[error("The log filename cannot be a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    /// The file is missing and its directory does not accept new files.
    #[error(
        "The log file directory is not writable, so the log file cannot be created. \
         You may need to create the file by hand with writable permissions for your web server."
    )]
    ParentNotWritable(PathBuf),

    /// The file exists but cannot be written to.
    #[error("The log file exists, but is not writable: {}", .0.display())]
    NotWritable(PathBuf),

    /// Anything else, e.g. a path with no parent directory.
    #[error("Invalid log filename: {}", .0.display())]
    Invalid(PathBuf),
}

/// Errors that can occur while recording an audit event.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The log target failed validation; nothing was written.
    #[error("invalid log target: {0}")]
    InvalidTarget(#[from] LogTargetError),

    /// The append itself failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The hook name is not one Observer knows about.
    #[error("unknown hook: {0}")]
    UnknownHook(String),

    /// An ignore pattern could not be compiled.
    #[error("invalid option pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
