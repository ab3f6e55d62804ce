//! # observer-audit
//!
//! Audit trail for multisite super admin actions.
//!
//! This crate provides functionality for:
//! - Declaring the host hooks to listen to, with their argument counts
//! - Decoding hook arguments into typed events
//! - Formatting one bracketed line per event
//! - Appending lines to a validated log file
//!
//! ## Line Format
//!
//! ```text
//! [Tue, 01 Jan 2019 00:00:00 +0000] [admin:1] [updated_option] [2] [blogname] [(Old)->(New)] [10.0.0.1]
//! ```
//!
//! Fields: timestamp, `login:id` of the actor, action, subject id, title,
//! data, source IP. Empty fields keep their brackets.
//!
//! ## Tracked Hooks
//!
//! | Tier | Hooks |
//! |------|-------|
//! | Super admin session | `update_site_option`, `updated_option`, `granted_super_admin`, `revoked_super_admin`, `wpmu_upgrade_site`, `wpmu_new_blog`, `delete_blog`, `make_delete_blog`, `make_undelete_blog`, `archive_blog`, `unarchive_blog`, `mature_blog`, `unmature_blog`, `make_spam_blog`, `make_ham_blog`, `wpmu_delete_user`, `deleted_user`, `edit_user_profile_update` |
//! | Always | `wp_login`, `wp_logout`, `user_register` |
//! | Network admin | `network_admin_menu` (status page) |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use observer_audit::{Observer, RequestContext, StaticDirectory};
//! use observer_core::AuditConfig;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Arc::new(StaticDirectory::new().with_super_admin(1, "admin"));
//! let observer = Observer::new(AuditConfig::with_log_path("/var/log/observer.log"), directory)?;
//!
//! let ctx = RequestContext::new()
//!     .with_session_user(1)
//!     .with_remote_addr("10.0.0.1");
//!
//! observer.dispatch(
//!     "updated_option",
//!     &[json!("blogname"), json!("Old"), json!("New")],
//!     &ctx,
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod event;
pub mod filter;
pub mod observer;
pub mod record;
pub mod registry;
pub mod sink;
pub mod value;

pub use context::{Directory, RequestContext, StaticDirectory};
pub use error::{AuditError, LogTargetError};
pub use event::{AuditAction, AuditEntry, AuditEntryBuilder, ObservedEvent, SiteStatusChange};
pub use filter::OptionFilter;
pub use observer::{Observer, Outcome, SkipReason};
pub use record::LogRecord;
pub use registry::{Callback, Subscription, SubscriptionRegistry, Tier};
pub use sink::{AuditSink, FileSink, LogStatus};
pub use value::stringify_for_audit;

/// Crate version, shown on the status display.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
