//! The log line.
//!
//! Each record is one line of seven bracketed fields, always in this order:
//!
//! ```text
//! [timestamp] [actorLogin:actorId] [action] [subjectId] [title] [data] [sourceIp]
//! ```
//!
//! Downstream tooling splits lines positionally on the bracket groups, so the
//! field order and the timestamp format must not change.

use chrono::{DateTime, FixedOffset, Local};

use crate::context::{Directory, RequestContext};
use crate::event::{AuditAction, AuditEntry};

/// RFC 2822 with a zero-padded day, e.g. `Tue, 01 Jan 2019 00:00:00 +0000`.
pub const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// A formatted audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub occurred_at: DateTime<FixedOffset>,
    /// Empty when the actor could not be resolved.
    pub actor_login: String,
    /// `0` when nobody is signed in.
    pub actor_id: u64,
    pub action: AuditAction,
    pub subject_id: String,
    pub title: String,
    pub data: String,
    pub source_ip: String,
}

impl LogRecord {
    /// Build the record for `entry`, stamped with the current local time.
    pub fn new(entry: &AuditEntry, ctx: &RequestContext, directory: &dyn Directory) -> Self {
        let actor_id = entry.actor_id.or(ctx.session_user_id);
        let actor_login = match (&entry.actor_login, actor_id) {
            (Some(login), _) => login.clone(),
            (None, Some(id)) => directory.user_login(id).unwrap_or_else(|| {
                tracing::warn!(actor_id = id, action = %entry.action, "Actor not found");
                String::new()
            }),
            (None, None) => String::new(),
        };

        Self {
            occurred_at: Local::now().fixed_offset(),
            actor_login,
            actor_id: actor_id.unwrap_or_default(),
            action: entry.action,
            subject_id: entry.subject_id.clone(),
            title: entry.title.clone(),
            data: entry.data.clone(),
            source_ip: ctx.source_ip(),
        }
    }

    /// Replace the timestamp.
    pub fn at(mut self, occurred_at: DateTime<FixedOffset>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// The line to append, without a trailing newline.
    pub fn to_line(&self) -> String {
        let line = format!(
            "[{}] [{}:{}] [{}] [{}] [{}] [{}] [{}]",
            self.occurred_at.format(TIMESTAMP_FORMAT),
            self.actor_login,
            self.actor_id,
            self.action,
            self.subject_id,
            self.title,
            self.data,
            self.source_ip,
        );
        collapse_whitespace(&line)
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
