//! Cache Metrics System
//!
//! Provides BTreeMap-based metrics reporting for the cost cache. Counters are
//! plain integers updated under the same exclusion as the cache state they
//! describe. Gauges (current total cost, cost limit) are read from the cache
//! when a report is built and are never stored twice.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap is used instead of HashMap because:
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Snapshots can be compared directly in tests
//! - **Better debugging**: Consistent output makes logs more readable
//!
//! The performance difference is negligible with a dozen metric keys.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod cost;

pub use cost::CostCacheMetrics;

/// Common counters tracked by every cost cache.
///
/// Only event counters live here. Gauges such as the current total cost are
/// owned by the cache and passed in when a report is built.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made against the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// Number of stores that created a new entry
    pub insertions: u64,

    /// Number of stores that replaced the value of an existing entry
    pub updates: u64,

    /// Number of entries removed explicitly by the caller
    pub removals: u64,

    /// Number of entries removed by the cache to satisfy a limit
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a store that created a new entry
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a store that replaced an existing entry
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an explicit removal
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Records an eviction
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Calculates the hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no lookups have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no lookups have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    ///
    /// `total_cost` and `total_cost_limit` are the cache's current gauges.
    pub fn to_btreemap(&self, total_cost: i64, total_cost_limit: i64) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("updates".to_string(), self.updates as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("total_cost".to_string(), total_cost as f64);
        metrics.insert("total_cost_limit".to_string(), total_cost_limit as f64);
        metrics.insert(
            "cost_utilization".to_string(),
            cost_utilization(total_cost, total_cost_limit),
        );

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Share of the cost budget in use
///
/// # Returns
/// The ratio of total cost to the cost limit, or 0.0 without a cost limit
pub fn cost_utilization(total_cost: i64, total_cost_limit: i64) -> f64 {
    if total_cost_limit > 0 {
        total_cost as f64 / total_cost_limit as f64
    } else {
        0.0
    }
}

/// Trait that caches implement for metrics reporting
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification
    fn algorithm_name(&self) -> &'static str;
}
