//! Centralized configuration for the Relman library.
//!
//! Configuration constants for network operations, tag caching, and
//! repository-name derivation.

use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const MAX_RETRIES: u32 = 3;
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const GITHUB_TAGS_PER_PAGE: u32 = 100;
    pub const GITHUB_TAGS_MAX_PAGES: u32 = 10;
    /// Delay between requests during a bulk tag refresh, to stay polite
    /// with the upstream rate limit.
    pub const REFRESH_REQUEST_DELAY: Duration = Duration::from_millis(350);
}

/// Tag cache configuration.
pub struct CacheConfig;

impl CacheConfig {
    /// Freshness window; entries older than this are treated as absent.
    pub const TAG_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    /// Key prefix for tag cache entries.
    pub const TAG_KEY_PREFIX: &'static str = "module-tags-";
    /// Upper bound on in-memory cached tag sets.
    pub const TAG_MEMORY_CAPACITY: u64 = 64;
}

/// Repository-name derivation configuration.
pub struct NamingConfig;

impl NamingConfig {
    /// GitHub owner under which module repositories live.
    pub const GITHUB_OWNER: &'static str = "relman";
    /// Prefix prepended to derived repository names.
    pub const ORG_PREFIX: &'static str = "relman";
    /// Namespace prefix stripped from module identifiers before deriving
    /// a repository name (e.g. `Relman.Billing` -> `Billing`).
    pub const NAMESPACE_PREFIX: &'static str = "Relman.";

    /// Identifier -> repository name overrides for modules whose
    /// repository does not follow the derivation convention.
    pub const REPO_OVERRIDES: &'static [(&'static str, &'static str)] = &[
        ("LegacyGateway", "relman-gateway-classic"),
        ("OpsDashboard", "relman-dashboard"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_sanity() {
        assert!(NetworkConfig::REQUEST_TIMEOUT > Duration::ZERO);
        assert!(NetworkConfig::GITHUB_TAGS_PER_PAGE > 0);
        assert_eq!(CacheConfig::TAG_TTL, Duration::from_secs(86_400));
        assert!(NamingConfig::NAMESPACE_PREFIX.ends_with('.'));
    }
}
