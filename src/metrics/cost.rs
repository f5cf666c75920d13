//! Cost Cache Metrics
//!
//! Metrics specific to the cost-ordered eviction engine.

extern crate alloc;

use super::CoreCacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Which limit triggered an eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Total cost exceeded `total_cost_limit`
    Cost,
    /// Entry count exceeded `count_limit`
    Count,
}

impl EvictionReason {
    /// Short label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionReason::Cost => "cost",
            EvictionReason::Count => "count",
        }
    }
}

/// Cost-cache metrics (extends CoreCacheMetrics)
///
/// Splits the eviction counter by the limit that caused it.
#[derive(Debug, Clone)]
pub struct CostCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,

    /// Evictions performed by the cost purge
    pub cost_limit_evictions: u64,

    /// Evictions performed by the count purge
    pub count_limit_evictions: u64,
}

impl CostCacheMetrics {
    /// Creates a new CostCacheMetrics instance with all counters at zero
    pub fn new() -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            cost_limit_evictions: 0,
            count_limit_evictions: 0,
        }
    }

    /// Records an eviction triggered by the given limit
    pub fn record_eviction(&mut self, reason: EvictionReason) {
        self.core.record_eviction();
        match reason {
            EvictionReason::Cost => self.cost_limit_evictions += 1,
            EvictionReason::Count => self.count_limit_evictions += 1,
        }
    }

    /// Converts the metrics to a BTreeMap for reporting, together with the
    /// cache's current total cost and cost limit
    pub fn to_btreemap(&self, total_cost: i64, total_cost_limit: i64) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap(total_cost, total_cost_limit);
        metrics.insert(
            "cost_limit_evictions".to_string(),
            self.cost_limit_evictions as f64,
        );
        metrics.insert(
            "count_limit_evictions".to_string(),
            self.count_limit_evictions as f64,
        );
        metrics
    }
}

impl Default for CostCacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
