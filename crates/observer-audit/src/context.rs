//! Request context and host lookups.
//!
//! Nothing in the pipeline reads ambient state. The host describes the
//! request it is serving in a [`RequestContext`] and answers user/site lookups
//! through a [`Directory`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the host knows about the request that fired a hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated session user, if any.
    #[serde(default)]
    pub session_user_id: Option<u64>,

    /// Id of the network the request runs in.
    #[serde(default)]
    pub network_id: u64,

    /// Id of the site (tenant) the request runs in.
    #[serde(default)]
    pub site_id: u64,

    /// Raw `X-Forwarded-For` header value.
    #[serde(default)]
    pub forwarded_for: Option<String>,

    /// Address of the direct peer.
    #[serde(default)]
    pub remote_addr: Option<String>,

    /// Whether the host exposes a network admin area.
    #[serde(default)]
    pub network_admin: bool,
}

impl RequestContext {
    /// A context with no session, no client address and ids `1`.
    pub fn new() -> Self {
        Self {
            network_id: 1,
            site_id: 1,
            ..Default::default()
        }
    }

    pub fn with_session_user(mut self, user_id: u64) -> Self {
        self.session_user_id = Some(user_id);
        self
    }

    pub fn with_network(mut self, network_id: u64) -> Self {
        self.network_id = network_id;
        self
    }

    pub fn with_site(mut self, site_id: u64) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn with_forwarded_for(mut self, value: impl Into<String>) -> Self {
        self.forwarded_for = Some(value.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_network_admin(mut self, enabled: bool) -> Self {
        self.network_admin = enabled;
        self
    }

    /// The client address to record: the forwarded-for header, then the
    /// direct peer, then `0`.
    pub fn source_ip(&self) -> String {
        [self.forwarded_for.as_deref(), self.remote_addr.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|ip| !ip.is_empty())
            .unwrap_or("0")
            .to_string()
    }
}

/// Host-side lookups needed to enrich a record.
///
/// Misses are expected (a user may already be gone by the time a hook runs)
/// and callers degrade to empty values instead of failing.
pub trait Directory: Send + Sync {
    /// Login name of a user.
    fn user_login(&self, user_id: u64) -> Option<String>;

    /// Whether the user holds super admin rights.
    fn is_super_admin(&self, user_id: u64) -> bool;

    /// Path of a site, e.g. `/blog/`.
    fn site_path(&self, site_id: u64) -> Option<String>;
}

/// An in-memory [`Directory`], loadable from YAML.
///
/// ```yaml
/// users:
///   1: admin
///   7: ana
/// super_admins: [1]
/// sites:
///   2: /blog/
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub users: BTreeMap<u64, String>,

    #[serde(default)]
    pub super_admins: BTreeSet<u64>,

    #[serde(default)]
    pub sites: BTreeMap<u64, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: u64, login: impl Into<String>) -> Self {
        self.users.insert(user_id, login.into());
        self
    }

    pub fn with_super_admin(mut self, user_id: u64, login: impl Into<String>) -> Self {
        self.super_admins.insert(user_id);
        self.with_user(user_id, login)
    }

    pub fn with_site(mut self, site_id: u64, path: impl Into<String>) -> Self {
        self.sites.insert(site_id, path.into());
        self
    }

    /// Parse a directory from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

impl Directory for StaticDirectory {
    fn user_login(&self, user_id: u64) -> Option<String> {
        self.users.get(&user_id).cloned()
    }

    fn is_super_admin(&self, user_id: u64) -> bool {
        self.super_admins.contains(&user_id)
    }

    fn site_path(&self, site_id: u64) -> Option<String> {
        self.sites.get(&site_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ip_prefers_forwarded_for() {
        let ctx = RequestContext::new()
            .with_forwarded_for("203.0.113.9")
            .with_remote_addr("10.0.0.1");
        assert_eq!(ctx.source_ip(), "203.0.113.9");
    }

    #[test]
    fn test_source_ip_falls_back() {
        let ctx = RequestContext::new().with_remote_addr("10.0.0.1");
        assert_eq!(ctx.source_ip(), "10.0.0.1");

        let ctx = RequestContext::new()
            .with_forwarded_for("  ")
            .with_remote_addr("10.0.0.1");
        assert_eq!(ctx.source_ip(), "10.0.0.1");

        assert_eq!(RequestContext::new().source_ip(), "0");
    }

    #[test]
    fn test_static_directory_from_yaml() {
        let dir = StaticDirectory::from_yaml(
            r#"
users:
  1: admin
  7: ana
super_admins: [1]
sites:
  2: /blog/
"#,
        )
        .unwrap();

        assert_eq!(dir.user_login(7).as_deref(), Some("ana"));
        assert_eq!(dir.user_login(8), None);
        assert!(dir.is_super_admin(1));
        assert!(!dir.is_super_admin(7));
        assert_eq!(dir.site_path(2).as_deref(), Some("/blog/"));
    }
}
