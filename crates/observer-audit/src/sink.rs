//! Log sinks.
//!
//! [`FileSink`] appends lines to the configured file. The target is validated
//! before every append because the file, or its permissions, may change
//! between requests.

use nix::unistd::{access, AccessFlags};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::error::{AuditError, LogTargetError};

/// Destination for formatted audit lines.
pub trait AuditSink: Send + Sync {
    /// Append one line. The sink adds the trailing newline.
    fn append(&self, line: &str) -> Result<(), AuditError>;

    /// Current state of the target, for the status display.
    fn status(&self) -> LogStatus;
}

/// Where the log goes and what, if anything, is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStatus {
    pub path: Option<PathBuf>,
    pub problem: Option<LogTargetError>,
}

impl LogStatus {
    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.problem, &self.path) {
            (Some(problem), _) => write!(f, "Your log file has a problem: {problem}"),
            (None, Some(path)) => {
                write!(f, "Your log file is currently set to: {}", path.display())
            }
            (None, None) => f.write_str("Logging is disabled."),
        }
    }
}

/// Appends to a file on disk.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: Option<PathBuf>,
}

impl FileSink {
    /// Create a sink for `path`. `None` or an empty path fails validation on
    /// every append with [`LogTargetError::NoPath`].
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check that a line could be appended right now.
    pub fn validate(&self) -> Result<&Path, LogTargetError> {
        let path = self
            .path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(LogTargetError::NoPath)?;
        validate_target(path)?;
        Ok(path)
    }
}

impl AuditSink for FileSink {
    fn append(&self, line: &str) -> Result<(), AuditError> {
        let path = self.validate()?;

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // Single write in append mode; no locking.
        file.write_all(record.as_bytes())?;
        Ok(())
    }

    fn status(&self) -> LogStatus {
        LogStatus {
            path: self.path.clone(),
            problem: self.validate().err(),
        }
    }
}

/// Classify `path` as a log target.
pub fn validate_target(path: &Path) -> Result<(), LogTargetError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(LogTargetError::IsDirectory(path.to_path_buf())),
        Ok(_) if is_writable(path) => Ok(()),
        Ok(_) => Err(LogTargetError::NotWritable(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let parent = match path.parent() {
                Some(p) if p.as_os_str().is_empty() => Path::new("."),
                Some(p) => p,
                None => return Err(LogTargetError::Invalid(path.to_path_buf())),
            };
            if parent.is_dir() && is_writable(parent) {
                Ok(())
            } else {
                Err(LogTargetError::ParentNotWritable(path.to_path_buf()))
            }
        }
        Err(_) => Err(LogTargetError::Invalid(path.to_path_buf())),
    }
}

/// Some write bit must be set and `access(2)` must grant `W_OK`. A file
/// with no write bits counts as read-only even for root.
fn is_writable(path: &Path) -> bool {
    let has_write_bit = fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o222 != 0)
        .unwrap_or(false);
    has_write_bit && access(path, AccessFlags::W_OK).is_ok()
}
