//! Option-name ignore rules.
//!
//! Some options change on nearly every request (cache entries, role maps) and
//! would drown the log. The per-site handler skips all built-in patterns; the
//! network-wide handler only skips transients.

use regex::{Regex, RegexBuilder};

use crate::error::AuditError;

/// Cached values with an expiry.
pub const TRANSIENT_PATTERN: &str = r".*_transient_.*";
/// Per-site role maps (`wp_user_roles`, `wp_2_user_roles`, ...).
pub const USER_ROLES_PATTERN: &str = r".*user_roles$";
/// Stats plugin cache.
pub const STATS_CACHE_PATTERN: &str = r"^stats_cache$";

/// A set of case-insensitive option-name patterns.
#[derive(Debug, Clone)]
pub struct OptionFilter {
    patterns: Vec<Regex>,
}

impl OptionFilter {
    /// Compile `patterns`; each one matches case-insensitively.
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self, AuditError> {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| AuditError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Rules for network-wide options: transients only.
    pub fn network_options() -> Result<Self, AuditError> {
        Self::new([TRANSIENT_PATTERN])
    }

    /// Rules for per-site options: every built-in pattern plus `extra`.
    pub fn site_options(extra: &[String]) -> Result<Self, AuditError> {
        Self::new(
            [TRANSIENT_PATTERN, USER_ROLES_PATTERN, STATS_CACHE_PATTERN]
                .into_iter()
                .chain(extra.iter().map(String::as_str)),
        )
    }

    pub fn is_ignored(&self, option: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_option_rules() {
        let filter = OptionFilter::site_options(&[]).unwrap();

        assert!(filter.is_ignored("_transient_doing_cron"));
        assert!(filter.is_ignored("_site_transient_update_core"));
        assert!(filter.is_ignored("wp_2_user_roles"));
        assert!(filter.is_ignored("WP_USER_ROLES"));
        assert!(filter.is_ignored("stats_cache"));
        assert!(filter.is_ignored("Stats_Cache"));

        assert!(!filter.is_ignored("stats_cache_old"));
        assert!(!filter.is_ignored("user_roles_backup"));
        assert!(!filter.is_ignored("blogname"));
    }

    #[test]
    fn test_network_option_rules_only_skip_transients() {
        let filter = OptionFilter::network_options().unwrap();

        assert!(filter.is_ignored("_site_transient_timeout_theme_roots"));
        assert!(!filter.is_ignored("wp_user_roles"));
        assert!(!filter.is_ignored("stats_cache"));
        assert!(!filter.is_ignored("site_admins"));
    }

    #[test]
    fn test_extra_patterns() {
        let filter = OptionFilter::site_options(&["^widget_".to_string()]).unwrap();
        assert!(filter.is_ignored("Widget_Recent_Posts"));
        assert!(!filter.is_ignored("sidebar_widgets"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = OptionFilter::site_options(&["(".to_string()]).unwrap_err();
        assert!(matches!(err, AuditError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }
}
