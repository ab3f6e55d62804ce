//! Tracked actions and their typed events.
//!
//! [`AuditAction`] names a host hook. [`ObservedEvent`] is one firing of that
//! hook with its positional arguments decoded into typed fields, and
//! [`AuditEntry`] is what a handler hands to the formatter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{as_flag, as_id, as_text};

/// A host hook that Observer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ===== Network / site options =====
    /// A network-wide option changed.
    UpdateSiteOption,
    /// An option of a single site changed.
    UpdatedOption,

    // ===== Super admin grants =====
    GrantedSuperAdmin,
    RevokedSuperAdmin,

    // ===== Site lifecycle =====
    /// A site's schema was upgraded.
    WpmuUpgradeSite,
    /// A site was created.
    WpmuNewBlog,
    /// A site was dropped.
    DeleteBlog,
    MakeDeleteBlog,
    MakeUndeleteBlog,
    ArchiveBlog,
    UnarchiveBlog,
    MatureBlog,
    UnmatureBlog,
    MakeSpamBlog,
    MakeHamBlog,

    // ===== User lifecycle =====
    /// Fired before a user is deleted.
    WpmuDeleteUser,
    /// Fired after a user was deleted.
    DeletedUser,
    /// A user's profile was edited by somebody else.
    EditUserProfileUpdate,
    UserRegister,

    // ===== Sessions =====
    WpLogin,
    WpLogout,
}

impl AuditAction {
    /// Every tracked action.
    pub const ALL: [AuditAction; 21] = [
        Self::UpdateSiteOption,
        Self::UpdatedOption,
        Self::GrantedSuperAdmin,
        Self::RevokedSuperAdmin,
        Self::WpmuUpgradeSite,
        Self::WpmuNewBlog,
        Self::DeleteBlog,
        Self::MakeDeleteBlog,
        Self::MakeUndeleteBlog,
        Self::ArchiveBlog,
        Self::UnarchiveBlog,
        Self::MatureBlog,
        Self::UnmatureBlog,
        Self::MakeSpamBlog,
        Self::MakeHamBlog,
        Self::WpmuDeleteUser,
        Self::DeletedUser,
        Self::EditUserProfileUpdate,
        Self::UserRegister,
        Self::WpLogin,
        Self::WpLogout,
    ];

    /// The hook name, which is also the `action` field of the record.
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::UpdateSiteOption => "update_site_option",
            Self::UpdatedOption => "updated_option",
            Self::GrantedSuperAdmin => "granted_super_admin",
            Self::RevokedSuperAdmin => "revoked_super_admin",
            Self::WpmuUpgradeSite => "wpmu_upgrade_site",
            Self::WpmuNewBlog => "wpmu_new_blog",
            Self::DeleteBlog => "delete_blog",
            Self::MakeDeleteBlog => "make_delete_blog",
            Self::MakeUndeleteBlog => "make_undelete_blog",
            Self::ArchiveBlog => "archive_blog",
            Self::UnarchiveBlog => "unarchive_blog",
            Self::MatureBlog => "mature_blog",
            Self::UnmatureBlog => "unmature_blog",
            Self::MakeSpamBlog => "make_spam_blog",
            Self::MakeHamBlog => "make_ham_blog",
            Self::WpmuDeleteUser => "wpmu_delete_user",
            Self::DeletedUser => "deleted_user",
            Self::EditUserProfileUpdate => "edit_user_profile_update",
            Self::UserRegister => "user_register",
            Self::WpLogin => "wp_login",
            Self::WpLogout => "wp_logout",
        }
    }

    /// Look up an action by hook name.
    pub fn from_hook(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.hook_name() == name)
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hook_name())
    }
}

/// Status flags a super admin can toggle on a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatusChange {
    MarkedDeleted,
    Undeleted,
    Archived,
    Unarchived,
    Matured,
    Unmatured,
    Spammed,
    Unspammed,
}

impl SiteStatusChange {
    pub fn action(self) -> AuditAction {
        match self {
            Self::MarkedDeleted => AuditAction::MakeDeleteBlog,
            Self::Undeleted => AuditAction::MakeUndeleteBlog,
            Self::Archived => AuditAction::ArchiveBlog,
            Self::Unarchived => AuditAction::UnarchiveBlog,
            Self::Matured => AuditAction::MatureBlog,
            Self::Unmatured => AuditAction::UnmatureBlog,
            Self::Spammed => AuditAction::MakeSpamBlog,
            Self::Unspammed => AuditAction::MakeHamBlog,
        }
    }
}

/// One firing of a tracked hook, with its arguments decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ObservedEvent {
    /// `update_site_option(option, new, old)`
    SiteOptionUpdated {
        option: String,
        old_value: Value,
        new_value: Value,
    },
    /// `updated_option(option, old, new)`
    OptionUpdated {
        option: String,
        old_value: Value,
        new_value: Value,
    },
    SuperAdminGranted { user_id: u64 },
    SuperAdminRevoked { user_id: u64 },
    SiteUpgraded { site_id: u64 },
    /// `wpmu_new_blog(site, user, domain, path, network, meta)`
    SiteCreated {
        site_id: u64,
        admin_user_id: u64,
        domain: String,
        path: String,
        network_id: u64,
        meta: Value,
    },
    SiteDeleted { site_id: u64, drop_tables: bool },
    SiteStatusChanged {
        site_id: u64,
        change: SiteStatusChange,
    },
    UserDeleting { user_id: u64 },
    UserDeleted { user_id: u64 },
    UserProfileEdited { user_id: u64 },
    UserRegistered { user_id: u64 },
    /// `wp_login(user_login, user)`
    LoggedIn { user_login: String, user_id: u64 },
    /// `wp_logout(user_id)`; older hosts pass nothing.
    LoggedOut { user_id: Option<u64> },
}

impl ObservedEvent {
    /// Decode the positional arguments of `action`.
    ///
    /// Missing arguments read as `null` and decode to defaults (id `0`, empty
    /// text, `false`). Arguments past the hook's arity are never read.
    pub fn from_hook(action: AuditAction, args: &[Value]) -> Self {
        let null = Value::Null;
        let arg = |i: usize| args.get(i).unwrap_or(&null);
        let id = |i: usize| as_id(arg(i)).unwrap_or_default();

        match action {
            AuditAction::UpdateSiteOption => Self::SiteOptionUpdated {
                option: as_text(arg(0)),
                new_value: arg(1).clone(),
                old_value: arg(2).clone(),
            },
            AuditAction::UpdatedOption => Self::OptionUpdated {
                option: as_text(arg(0)),
                old_value: arg(1).clone(),
                new_value: arg(2).clone(),
            },
            AuditAction::GrantedSuperAdmin => Self::SuperAdminGranted { user_id: id(0) },
            AuditAction::RevokedSuperAdmin => Self::SuperAdminRevoked { user_id: id(0) },
            AuditAction::WpmuUpgradeSite => Self::SiteUpgraded { site_id: id(0) },
            AuditAction::WpmuNewBlog => Self::SiteCreated {
                site_id: id(0),
                admin_user_id: id(1),
                domain: as_text(arg(2)),
                path: as_text(arg(3)),
                network_id: id(4),
                meta: arg(5).clone(),
            },
            AuditAction::DeleteBlog => Self::SiteDeleted {
                site_id: id(0),
                drop_tables: as_flag(arg(1)),
            },
            AuditAction::MakeDeleteBlog => Self::status(id(0), SiteStatusChange::MarkedDeleted),
            AuditAction::MakeUndeleteBlog => Self::status(id(0), SiteStatusChange::Undeleted),
            AuditAction::ArchiveBlog => Self::status(id(0), SiteStatusChange::Archived),
            AuditAction::UnarchiveBlog => Self::status(id(0), SiteStatusChange::Unarchived),
            AuditAction::MatureBlog => Self::status(id(0), SiteStatusChange::Matured),
            AuditAction::UnmatureBlog => Self::status(id(0), SiteStatusChange::Unmatured),
            AuditAction::MakeSpamBlog => Self::status(id(0), SiteStatusChange::Spammed),
            AuditAction::MakeHamBlog => Self::status(id(0), SiteStatusChange::Unspammed),
            AuditAction::WpmuDeleteUser => Self::UserDeleting { user_id: id(0) },
            AuditAction::DeletedUser => Self::UserDeleted { user_id: id(0) },
            AuditAction::EditUserProfileUpdate => Self::UserProfileEdited { user_id: id(0) },
            AuditAction::UserRegister => Self::UserRegistered { user_id: id(0) },
            AuditAction::WpLogin => Self::LoggedIn {
                user_login: as_text(arg(0)),
                user_id: id(1),
            },
            AuditAction::WpLogout => Self::LoggedOut {
                user_id: as_id(arg(0)),
            },
        }
    }

    fn status(site_id: u64, change: SiteStatusChange) -> Self {
        Self::SiteStatusChanged { site_id, change }
    }

    /// The action this event is recorded under.
    pub fn action(&self) -> AuditAction {
        match self {
            Self::SiteOptionUpdated { .. } => AuditAction::UpdateSiteOption,
            Self::OptionUpdated { .. } => AuditAction::UpdatedOption,
            Self::SuperAdminGranted { .. } => AuditAction::GrantedSuperAdmin,
            Self::SuperAdminRevoked { .. } => AuditAction::RevokedSuperAdmin,
            Self::SiteUpgraded { .. } => AuditAction::WpmuUpgradeSite,
            Self::SiteCreated { .. } => AuditAction::WpmuNewBlog,
            Self::SiteDeleted { .. } => AuditAction::DeleteBlog,
            Self::SiteStatusChanged { change, .. } => change.action(),
            Self::UserDeleting { .. } => AuditAction::WpmuDeleteUser,
            Self::UserDeleted { .. } => AuditAction::DeletedUser,
            Self::UserProfileEdited { .. } => AuditAction::EditUserProfileUpdate,
            Self::UserRegistered { .. } => AuditAction::UserRegister,
            Self::LoggedIn { .. } => AuditAction::WpLogin,
            Self::LoggedOut { .. } => AuditAction::WpLogout,
        }
    }
}

/// The normalized fields a handler passes on for formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub action: AuditAction,
    /// Id of the object acted upon: a user, site or network id.
    pub subject_id: String,
    /// Short label such as an option key or site path.
    pub title: String,
    /// Flat free-text payload.
    pub data: String,
    /// Who did it. `None` means the request's session actor.
    pub actor_id: Option<u64>,
    /// Login name of the actor when the event carries it.
    pub actor_login: Option<String>,
}

impl AuditEntry {
    /// Create a builder for an entry.
    pub fn builder(action: AuditAction) -> AuditEntryBuilder {
        AuditEntryBuilder::new(action)
    }
}

/// Builder for [`AuditEntry`].
#[derive(Debug)]
pub struct AuditEntryBuilder {
    entry: AuditEntry,
}

impl AuditEntryBuilder {
    pub fn new(action: AuditAction) -> Self {
        Self {
            entry: AuditEntry {
                action,
                subject_id: String::new(),
                title: String::new(),
                data: String::new(),
                actor_id: None,
                actor_login: None,
            },
        }
    }

    /// Set the subject id.
    pub fn subject(mut self, id: impl ToString) -> Self {
        self.entry.subject_id = id.to_string();
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.entry.title = title.into();
        self
    }

    /// Set the data payload.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.entry.data = data.into();
        self
    }

    /// Credit the action to `actor_id` instead of the session actor.
    pub fn actor(mut self, actor_id: u64) -> Self {
        self.entry.actor_id = Some(actor_id);
        self
    }

    /// Use `login` as the actor's login instead of looking it up.
    pub fn actor_login(mut self, login: impl Into<String>) -> Self {
        self.entry.actor_login = Some(login.into());
        self
    }

    pub fn build(self) -> AuditEntry {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_names_round_trip() {
        for action in AuditAction::ALL {
            assert_eq!(AuditAction::from_hook(action.hook_name()), Some(action));
        }
        assert_eq!(AuditAction::from_hook("save_post"), None);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(AuditAction::WpmuNewBlog.to_string(), "wpmu_new_blog");
        assert_eq!(AuditAction::MakeHamBlog.to_string(), "make_ham_blog");
    }

    #[test]
    fn test_site_option_argument_order() {
        let event = ObservedEvent::from_hook(
            AuditAction::UpdateSiteOption,
            &[json!("site_name"), json!("new"), json!("old")],
        );
        assert_eq!(
            event,
            ObservedEvent::SiteOptionUpdated {
                option: "site_name".into(),
                old_value: json!("old"),
                new_value: json!("new"),
            }
        );
    }

    #[test]
    fn test_option_argument_order() {
        let event = ObservedEvent::from_hook(
            AuditAction::UpdatedOption,
            &[json!("blogname"), json!("old"), json!("new")],
        );
        assert_eq!(
            event,
            ObservedEvent::OptionUpdated {
                option: "blogname".into(),
                old_value: json!("old"),
                new_value: json!("new"),
            }
        );
    }

    #[test]
    fn test_login_reads_user_object() {
        let event = ObservedEvent::from_hook(
            AuditAction::WpLogin,
            &[json!("ana"), json!({"ID": 7, "user_login": "ana"})],
        );
        assert_eq!(
            event,
            ObservedEvent::LoggedIn {
                user_login: "ana".into(),
                user_id: 7
            }
        );
    }

    #[test]
    fn test_missing_arguments_default() {
        let event = ObservedEvent::from_hook(AuditAction::WpmuNewBlog, &[json!(3)]);
        assert_eq!(
            event,
            ObservedEvent::SiteCreated {
                site_id: 3,
                admin_user_id: 0,
                domain: String::new(),
                path: String::new(),
                network_id: 0,
                meta: Value::Null,
            }
        );
        assert_eq!(
            ObservedEvent::from_hook(AuditAction::WpLogout, &[]),
            ObservedEvent::LoggedOut { user_id: None }
        );
    }

    #[test]
    fn test_status_changes_map_to_actions() {
        for (hook, change) in [
            ("make_delete_blog", SiteStatusChange::MarkedDeleted),
            ("make_undelete_blog", SiteStatusChange::Undeleted),
            ("archive_blog", SiteStatusChange::Archived),
            ("unarchive_blog", SiteStatusChange::Unarchived),
            ("mature_blog", SiteStatusChange::Matured),
            ("unmature_blog", SiteStatusChange::Unmatured),
            ("make_spam_blog", SiteStatusChange::Spammed),
            ("make_ham_blog", SiteStatusChange::Unspammed),
        ] {
            let action = AuditAction::from_hook(hook).unwrap();
            let event = ObservedEvent::from_hook(action, &[json!(9)]);
            assert_eq!(event, ObservedEvent::SiteStatusChanged { site_id: 9, change });
            assert_eq!(event.action(), action);
        }
    }

    #[test]
    fn test_entry_builder() {
        let entry = AuditEntry::builder(AuditAction::WpLogin)
            .subject(7)
            .data("ana")
            .actor(7)
            .actor_login("ana")
            .build();

        assert_eq!(entry.subject_id, "7");
        assert_eq!(entry.title, "");
        assert_eq!(entry.data, "ana");
        assert_eq!(entry.actor_id, Some(7));
        assert_eq!(entry.actor_login.as_deref(), Some("ana"));

        let entry = AuditEntry::builder(AuditAction::WpLogout).build();
        assert_eq!(entry.actor_login, None);
    }
}
