//! Hook subscriptions.
//!
//! Declares which host hooks Observer listens to, how many positional
//! arguments each one passes, and under which condition it is registered.

use serde_json::Value;

use crate::context::{Directory, RequestContext};
use crate::event::AuditAction;

/// Hook that adds the status page to the network admin menu.
pub const STATUS_PAGE_HOOK: &str = "network_admin_menu";

/// When a subscription is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Only when the host has a network admin area.
    NetworkAdmin,
    /// Only when the session user is a super admin.
    SuperAdmin,
    /// On every request, signed in or not.
    Always,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkAdmin => write!(f, "network_admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Always => write!(f, "always"),
        }
    }
}

/// What runs when a subscribed hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// Render the log status page.
    StatusPage,
    /// Record the action.
    Record(AuditAction),
}

/// One hook binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub hook: &'static str,
    /// Number of positional arguments the host passes.
    pub arity: usize,
    pub tier: Tier,
    pub callback: Callback,
}

impl Subscription {
    fn record(action: AuditAction, arity: usize, tier: Tier) -> Self {
        Self {
            hook: action.hook_name(),
            arity,
            tier,
            callback: Callback::Record(action),
        }
    }

    /// The arguments this subscription reads; anything past the arity is
    /// dropped.
    pub fn capture<'a>(&self, args: &'a [Value]) -> &'a [Value] {
        &args[..args.len().min(self.arity)]
    }
}

/// Every subscription Observer declares, in registration order.
pub fn declared() -> Vec<Subscription> {
    use AuditAction::*;
    use Tier::SuperAdmin;

    let mut subscriptions = vec![Subscription {
        hook: STATUS_PAGE_HOOK,
        arity: 0,
        tier: Tier::NetworkAdmin,
        callback: Callback::StatusPage,
    }];

    subscriptions.extend(
        [
            (UpdateSiteOption, 3),
            (UpdatedOption, 3),
            (GrantedSuperAdmin, 1),
            (RevokedSuperAdmin, 1),
            (WpmuUpgradeSite, 1),
            (WpmuNewBlog, 6),
            (DeleteBlog, 2),
            (MakeDeleteBlog, 1),
            (MakeUndeleteBlog, 1),
            (ArchiveBlog, 1),
            (UnarchiveBlog, 1),
            (MatureBlog, 1),
            (UnmatureBlog, 1),
            (MakeSpamBlog, 1),
            (MakeHamBlog, 1),
            (WpmuDeleteUser, 1),
            (DeletedUser, 1),
            (EditUserProfileUpdate, 1),
        ]
        .into_iter()
        .map(|(action, arity)| Subscription::record(action, arity, SuperAdmin)),
    );

    subscriptions.extend(
        [(WpLogin, 2), (WpLogout, 1), (UserRegister, 1)]
            .into_iter()
            .map(|(action, arity)| Subscription::record(action, arity, Tier::Always)),
    );

    subscriptions
}

/// The hooks bound for one request.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared subscription, regardless of tier.
    pub fn all() -> Self {
        let mut registry = Self::new();
        for subscription in declared() {
            registry.register(subscription);
        }
        registry
    }

    /// The subscriptions whose tier condition holds for `ctx`.
    pub fn for_request(ctx: &RequestContext, directory: &dyn Directory) -> Self {
        let super_admin = ctx
            .session_user_id
            .is_some_and(|id| directory.is_super_admin(id));

        let mut registry = Self::new();
        for subscription in declared() {
            let active = match subscription.tier {
                Tier::NetworkAdmin => ctx.network_admin,
                Tier::SuperAdmin => super_admin,
                Tier::Always => true,
            };
            if active {
                registry.register(subscription);
            }
        }
        registry
    }

    /// Bind a hook. Returns `false` and keeps the existing binding when the
    /// hook is already registered, so a firing never runs twice.
    pub fn register(&mut self, subscription: Subscription) -> bool {
        if self.get(subscription.hook).is_some() {
            return false;
        }
        self.subscriptions.push(subscription);
        true
    }

    pub fn get(&self, hook: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.hook == hook)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticDirectory;
    use serde_json::json;

    fn directory() -> StaticDirectory {
        StaticDirectory::new()
            .with_super_admin(1, "admin")
            .with_user(7, "ana")
    }

    #[test]
    fn test_every_action_is_declared_once() {
        let declared = declared();
        for action in AuditAction::ALL {
            let count = declared
                .iter()
                .filter(|s| s.callback == Callback::Record(action))
                .count();
            assert_eq!(count, 1, "{action}");
        }
        assert_eq!(SubscriptionRegistry::all().len(), AuditAction::ALL.len() + 1);
    }

    #[test]
    fn test_arity() {
        let registry = SubscriptionRegistry::all();
        assert_eq!(registry.get("update_site_option").unwrap().arity, 3);
        assert_eq!(registry.get("wpmu_new_blog").unwrap().arity, 6);
        assert_eq!(registry.get("delete_blog").unwrap().arity, 2);
        assert_eq!(registry.get("wp_login").unwrap().arity, 2);
        assert_eq!(registry.get("wp_logout").unwrap().arity, 1);
        assert_eq!(registry.get(STATUS_PAGE_HOOK).unwrap().arity, 0);
    }

    #[test]
    fn test_anonymous_request_only_gets_always_tier() {
        let registry = SubscriptionRegistry::for_request(&RequestContext::new(), &directory());
        let hooks: Vec<_> = registry.iter().map(|s| s.hook).collect();
        assert_eq!(hooks, vec!["wp_login", "wp_logout", "user_register"]);
    }

    #[test]
    fn test_regular_user_does_not_get_super_admin_tier() {
        let ctx = RequestContext::new().with_session_user(7);
        let registry = SubscriptionRegistry::for_request(&ctx, &directory());
        assert!(registry.get("updated_option").is_none());
        assert!(registry.get("wp_login").is_some());
    }

    #[test]
    fn test_super_admin_with_network_admin() {
        let ctx = RequestContext::new()
            .with_session_user(1)
            .with_network_admin(true);
        let registry = SubscriptionRegistry::for_request(&ctx, &directory());
        assert_eq!(registry.len(), AuditAction::ALL.len() + 1);
        assert_eq!(registry.get(STATUS_PAGE_HOOK).unwrap().callback, Callback::StatusPage);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = SubscriptionRegistry::new();
        let subscription = Subscription::record(AuditAction::ArchiveBlog, 1, Tier::SuperAdmin);
        assert!(registry.register(subscription));
        assert!(!registry.register(Subscription { arity: 4, ..subscription }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("archive_blog").unwrap().arity, 1);
    }

    #[test]
    fn test_capture_respects_arity() {
        let subscription = Subscription::record(AuditAction::DeleteBlog, 2, Tier::SuperAdmin);
        let args = [json!(1), json!(true), json!("extra")];
        assert_eq!(subscription.capture(&args), &args[..2]);
        assert_eq!(subscription.capture(&args[..1]), &args[..1]);
    }
}
