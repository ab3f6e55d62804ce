//! Event handlers.
//!
//! [`Observer`] turns each [`ObservedEvent`] into an [`AuditEntry`], formats it
//! and appends it to the sink. Nothing here panics or aborts the host action:
//! failures come back as `Err` for the host to log and move on.

use observer_core::{AuditConfig, LoginScope};
use serde_json::Value;
use std::sync::Arc;

use crate::context::{Directory, RequestContext};
use crate::error::AuditError;
use crate::event::{AuditAction, AuditEntry, ObservedEvent};
use crate::filter::OptionFilter;
use crate::record::LogRecord;
use crate::registry::{Callback, SubscriptionRegistry, STATUS_PAGE_HOOK};
use crate::sink::{AuditSink, FileSink, LogStatus};
use crate::value::describe_change;

/// Result of handling one hook firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A line was appended.
    Recorded(LogRecord),
    /// The event was deliberately not recorded.
    Skipped(SkipReason),
    /// The hook is known but not bound for this request.
    NotSubscribed,
    /// The status page hook fired.
    StatusPage(LogStatus),
}

/// Why an event produced no line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Audit logging is switched off.
    Disabled,
    /// The option name matched an ignore rule.
    IgnoredOption(String),
    /// The user logging in is outside the configured login scope.
    LoginOutOfScope(u64),
}

/// The audit trail recorder.
pub struct Observer {
    config: AuditConfig,
    sink: Arc<dyn AuditSink>,
    directory: Arc<dyn Directory>,
    site_option_filter: OptionFilter,
    network_option_filter: OptionFilter,
}

impl Observer {
    /// Create an observer that appends to the configured log file.
    pub fn new(config: AuditConfig, directory: Arc<dyn Directory>) -> Result<Self, AuditError> {
        let sink = Arc::new(FileSink::new(config.log_path()));
        Self::with_sink(config, sink, directory)
    }

    /// Create an observer with a custom sink.
    pub fn with_sink(
        config: AuditConfig,
        sink: Arc<dyn AuditSink>,
        directory: Arc<dyn Directory>,
    ) -> Result<Self, AuditError> {
        Ok(Self {
            site_option_filter: OptionFilter::site_options(&config.ignored_options)?,
            network_option_filter: OptionFilter::network_options()?,
            config,
            sink,
            directory,
        })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// State of the log target, for the status display.
    pub fn status(&self) -> LogStatus {
        if !self.config.enabled {
            return LogStatus {
                path: None,
                problem: None,
            };
        }
        self.sink.status()
    }

    /// The hooks bound for `ctx`.
    pub fn registry(&self, ctx: &RequestContext) -> SubscriptionRegistry {
        SubscriptionRegistry::for_request(ctx, self.directory.as_ref())
    }

    /// Handle a raw hook firing from the host.
    ///
    /// Only the subscription's declared number of arguments is read.
    pub fn dispatch(
        &self,
        hook: &str,
        args: &[Value],
        ctx: &RequestContext,
    ) -> Result<Outcome, AuditError> {
        let registry = self.registry(ctx);
        let Some(subscription) = registry.get(hook) else {
            if hook == STATUS_PAGE_HOOK || AuditAction::from_hook(hook).is_some() {
                tracing::trace!(hook, "Hook not bound for this request");
                return Ok(Outcome::NotSubscribed);
            }
            return Err(AuditError::UnknownHook(hook.to_string()));
        };

        match subscription.callback {
            Callback::StatusPage => Ok(Outcome::StatusPage(self.status())),
            Callback::Record(action) => {
                let event = ObservedEvent::from_hook(action, subscription.capture(args));
                self.handle(&event, ctx)
            }
        }
    }

    /// [`dispatch`](Self::dispatch) for hosts that only need a yes/no.
    ///
    /// Failures are logged and reported as `false`.
    pub fn notify(&self, hook: &str, args: &[Value], ctx: &RequestContext) -> bool {
        match self.dispatch(hook, args, ctx) {
            Ok(Outcome::Recorded(_)) => true,
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(hook, error = %e, "Audit event not recorded");
                false
            }
        }
    }

    /// Record a typed event.
    pub fn handle(
        &self,
        event: &ObservedEvent,
        ctx: &RequestContext,
    ) -> Result<Outcome, AuditError> {
        if !self.config.enabled {
            return Ok(Outcome::Skipped(SkipReason::Disabled));
        }

        match self.entry_for(event, ctx) {
            Ok(entry) => self.log(&entry, ctx).map(Outcome::Recorded),
            Err(reason) => {
                tracing::trace!(action = %event.action(), ?reason, "Audit event skipped");
                Ok(Outcome::Skipped(reason))
            }
        }
    }

    /// Format `entry` and append it.
    pub fn log(&self, entry: &AuditEntry, ctx: &RequestContext) -> Result<LogRecord, AuditError> {
        let record = LogRecord::new(entry, ctx, self.directory.as_ref());
        let line = record.to_line();

        tracing::debug!(
            action = %record.action,
            subject = %record.subject_id,
            actor = record.actor_id,
            "Audit event"
        );

        if let Err(e) = self.sink.append(&line) {
            tracing::warn!(action = %record.action, error = %e, "Failed to append audit line");
            return Err(e);
        }
        Ok(record)
    }

    fn entry_for(
        &self,
        event: &ObservedEvent,
        ctx: &RequestContext,
    ) -> Result<AuditEntry, SkipReason> {
        let action = event.action();
        let entry = match event {
            ObservedEvent::SiteOptionUpdated {
                option,
                old_value,
                new_value,
            } => {
                if self.network_option_filter.is_ignored(option) {
                    return Err(SkipReason::IgnoredOption(option.clone()));
                }
                AuditEntry::builder(action)
                    .subject(ctx.network_id)
                    .title(option.as_str())
                    .data(describe_change(old_value, new_value))
            }
            ObservedEvent::OptionUpdated {
                option,
                old_value,
                new_value,
            } => {
                if self.site_option_filter.is_ignored(option) {
                    return Err(SkipReason::IgnoredOption(option.clone()));
                }
                AuditEntry::builder(action)
                    .subject(ctx.site_id)
                    .title(option.as_str())
                    .data(describe_change(old_value, new_value))
            }
            ObservedEvent::SuperAdminGranted { user_id }
            | ObservedEvent::SuperAdminRevoked { user_id }
            | ObservedEvent::UserDeleting { user_id }
            | ObservedEvent::UserProfileEdited { user_id }
            | ObservedEvent::UserRegistered { user_id } => AuditEntry::builder(action)
                .subject(user_id)
                .data(self.login_of(*user_id, action)),
            // The user is gone by now, so there is no login to look up.
            ObservedEvent::UserDeleted { user_id } => AuditEntry::builder(action).subject(user_id),
            ObservedEvent::SiteUpgraded { site_id } => AuditEntry::builder(action)
                .subject(site_id)
                .data(self.path_of(*site_id, action)),
            ObservedEvent::SiteCreated {
                site_id,
                admin_user_id,
                path,
                ..
            } => AuditEntry::builder(action)
                .subject(site_id)
                .title(path.as_str())
                .data(format!("admin:{}", self.login_of(*admin_user_id, action))),
            ObservedEvent::SiteDeleted {
                site_id,
                drop_tables,
            } => AuditEntry::builder(action)
                .subject(site_id)
                .data(format!("drop_tables:{drop_tables}")),
            ObservedEvent::SiteStatusChanged { site_id, .. } => {
                AuditEntry::builder(action).subject(site_id)
            }
            ObservedEvent::LoggedIn {
                user_login,
                user_id,
            } => {
                if self.config.login_scope == LoginScope::SuperAdmins
                    && !self.directory.is_super_admin(*user_id)
                {
                    return Err(SkipReason::LoginOutOfScope(*user_id));
                }
                AuditEntry::builder(action)
                    .subject(user_id)
                    .data(user_login.as_str())
                    .actor(*user_id)
                    .actor_login(user_login.as_str())
            }
            ObservedEvent::LoggedOut { user_id } => {
                let builder = AuditEntry::builder(action);
                match user_id.or(ctx.session_user_id) {
                    Some(id) => builder.subject(id),
                    None => builder,
                }
            }
        };
        Ok(entry.build())
    }

    fn login_of(&self, user_id: u64, action: AuditAction) -> String {
        self.directory.user_login(user_id).unwrap_or_else(|| {
            tracing::warn!(user_id, %action, "User not found, recording without login");
            String::new()
        })
    }

    fn path_of(&self, site_id: u64, action: AuditAction) -> String {
        self.directory.site_path(site_id).unwrap_or_else(|| {
            tracing::warn!(site_id, %action, "Site not found, recording without path");
            String::new()
        })
    }
}
