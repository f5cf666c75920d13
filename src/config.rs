//! Cache Configuration Module
//!
//! This module provides the configuration structure for the cost cache.
//!
//! # Design Philosophy
//!
//! The configuration struct has all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with the fields you care about
//! - **Defaults**: `Default` gives an unnamed cache with no limits
//! - **Mutable later**: every field can also be changed on a live cache
//!
//! # Sizing Guidelines
//!
//! ## Understanding `total_cost_limit` and `count_limit`
//!
//! - **`total_cost_limit`**: Upper bound for the sum of all entry costs. Cost
//!   is whatever unit the caller picks when storing (bytes, rows, pixels).
//!   A value of zero or below disables cost-based eviction.
//! - **`count_limit`**: Upper bound for the number of live entries. A value
//!   of zero or below disables count-based eviction.
//!
//! Both limits are advisory. A store is never rejected; the purge that
//! follows it brings the cache back under both limits. A single entry whose
//! cost alone exceeds `total_cost_limit` ends up evicted by that same purge
//! once every cheaper entry is gone.
//!
//! # Examples
//!
//! ```
//! use cost_cache::config::CostCacheConfig;
//! use cost_cache::CostCache;
//!
//! // 64MB of decoded images, at most 500 of them
//! let config = CostCacheConfig {
//!     name: "thumbnails".into(),
//!     total_cost_limit: 64 * 1024 * 1024,
//!     count_limit: 500,
//!     ..Default::default()
//! };
//! let cache: CostCache<String, Vec<u8>> = CostCache::init(config, None);
//! assert_eq!(cache.name(), "thumbnails");
//! ```

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Configuration for a cost-bounded cache.
///
/// # Fields
///
/// - `name`: Opaque label. Has no effect on caching; it is handed to the
///   eviction listener so one listener can serve several caches.
/// - `total_cost_limit`: Maximum aggregate cost. `<= 0` means unlimited.
/// - `count_limit`: Maximum number of entries. `<= 0` means unlimited.
/// - `evicts_objects_with_discarded_content`: Carried for interface parity.
///   The cache does not track discardable content, so this flag changes
///   nothing.
///
/// # Examples
///
/// ```
/// use cost_cache::config::CostCacheConfig;
///
/// let config = CostCacheConfig::default()
///     .with_total_cost_limit(1_000)
///     .with_count_limit(10);
/// assert_eq!(config.total_cost_limit, 1_000);
/// assert_eq!(config.count_limit, 10);
/// assert!(config.name.is_empty());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CostCacheConfig {
    /// Label reported to eviction listeners.
    pub name: String,
    /// Maximum sum of entry costs. Zero or negative disables the limit.
    pub total_cost_limit: i64,
    /// Maximum number of entries. Zero or negative disables the limit.
    pub count_limit: i64,
    /// Inert flag kept for interface parity.
    pub evicts_objects_with_discarded_content: bool,
}

impl CostCacheConfig {
    /// Returns the config with `name` replaced.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the config with `total_cost_limit` replaced.
    pub fn with_total_cost_limit(mut self, limit: i64) -> Self {
        self.total_cost_limit = limit;
        self
    }

    /// Returns the config with `count_limit` replaced.
    pub fn with_count_limit(mut self, limit: i64) -> Self {
        self.count_limit = limit;
        self
    }

    /// Returns the config with `evicts_objects_with_discarded_content` replaced.
    pub fn with_evicts_objects_with_discarded_content(mut self, evicts: bool) -> Self {
        self.evicts_objects_with_discarded_content = evicts;
        self
    }

    /// Returns `true` if cost-based eviction is active.
    #[inline]
    pub fn has_cost_limit(&self) -> bool {
        self.total_cost_limit > 0
    }

    /// Returns `true` if count-based eviction is active.
    #[inline]
    pub fn has_count_limit(&self) -> bool {
        self.count_limit > 0
    }
}

impl fmt::Debug for CostCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostCacheConfig")
            .field("name", &self.name)
            .field("total_cost_limit", &self.total_cost_limit)
            .field("count_limit", &self.count_limit)
            .field(
                "evicts_objects_with_discarded_content",
                &self.evicts_objects_with_discarded_content,
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_limits() {
        let config = CostCacheConfig::default();
        assert!(config.name.is_empty());
        assert_eq!(config.total_cost_limit, 0);
        assert_eq!(config.count_limit, 0);
        assert!(!config.evicts_objects_with_discarded_content);
        assert!(!config.has_cost_limit());
        assert!(!config.has_count_limit());
    }

    #[test]
    fn test_config_creation() {
        // 10MB of values, at most 1000 entries
        let config = CostCacheConfig {
            name: String::from("blobs"),
            total_cost_limit: 10 * 1024 * 1024,
            count_limit: 1000,
            evicts_objects_with_discarded_content: true,
        };
        assert_eq!(config.name, "blobs");
        assert_eq!(config.total_cost_limit, 10 * 1024 * 1024);
        assert_eq!(config.count_limit, 1000);
        assert!(config.has_cost_limit());
        assert!(config.has_count_limit());
    }

    #[test]
    fn test_non_positive_limits_are_disabled() {
        let config = CostCacheConfig::default()
            .with_total_cost_limit(-5)
            .with_count_limit(0);
        assert!(!config.has_cost_limit());
        assert!(!config.has_count_limit());
    }

    #[test]
    fn test_builder_helpers() {
        let config = CostCacheConfig::default()
            .with_name("sessions")
            .with_total_cost_limit(64)
            .with_count_limit(4)
            .with_evicts_objects_with_discarded_content(true);
        assert_eq!(config.name, "sessions");
        assert_eq!(config.total_cost_limit, 64);
        assert_eq!(config.count_limit, 4);
        assert!(config.evicts_objects_with_discarded_content);
    }
}
