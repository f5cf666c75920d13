//! Cost-Bounded Cache Implementation
//!
//! This module provides a cache whose capacity is expressed as an aggregate
//! "cost" and/or an entry count. Every entry carries a caller-supplied cost;
//! when a store pushes the total cost or the number of entries over the
//! configured limit, the cache evicts the cheapest entries until it is back
//! under the limit.
//!
//! # Algorithm
//!
//! Live entries are threaded into a doubly linked list sorted by ascending
//! cost. The head of the list is the cheapest entry and is always the next
//! eviction candidate. After every store the cache runs two purge passes:
//!
//! 1. **Cost purge**: while `total_cost - total_cost_limit > 0`, evict the head.
//! 2. **Count purge**: while `len - count_limit > 0`, evict the head.
//!
//! ```text
//!   head                                                    tail
//!    │                                                        │
//!    ▼                                                        ▼
//!  ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐    ┌───────┐
//!  │ c: 0 │◀──▶│ b: 1 │◀──▶│ d: 3 │◀──▶│ a: 5 │◀──▶│ e: 12 │
//!  └──────┘    └──────┘    └──────┘    └──────┘    └───────┘
//!   evicted first ────────────────────────────────▶ evicted last
//! ```
//!
//! A newly stored entry whose cost is not greater than the head's becomes the
//! new head. Otherwise it is placed in front of the first entry that is at
//! least as expensive. Ordering among equal costs follows from that rule and
//! carries no other guarantee.
//!
//! Limits are advisory: the store that triggers a purge is never rejected.
//! If that entry is itself the cheapest one left, it is evicted like any other.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Put: O(n) worst case to find the sorted position, O(1) per eviction
//!   - Remove: O(1)
//!
//! - **Space Complexity**:
//!   - O(n) where n is the number of live entries
//!   - About 48 bytes of bookkeeping per entry plus the key stored twice
//!
//! # Thread Safety
//!
//! [`CostCache`] is not thread-safe. For concurrent access use
//! [`ConcurrentCostCache`](crate::ConcurrentCostCache), which guards a single
//! segment with a single lock.

extern crate alloc;

use crate::config::CostCacheConfig;
use crate::entry::{CacheEntry, EntryId};
use crate::list::CostList;
use crate::listener::{EvictionListener, ListenerSlot};
use crate::metrics::cost::EvictionReason;
use crate::metrics::{CacheMetrics, CostCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal cost segment containing the actual cache algorithm.
///
/// This is shared between `CostCache` (single-owner) and
/// `ConcurrentCostCache` (multi-threaded). All algorithm logic is
/// implemented here to avoid code duplication.
///
/// The map and the list always hold the same set of entries, and
/// `total_cost` always equals the sum of their costs. The sum is kept in
/// `i128` so it stays exact even when individual costs approach `i64::MAX`.
/// The segment is the only owner of that gauge; metrics reports read it.
pub(crate) struct CostSegment<K, V, S = DefaultHashBuilder> {
    config: CostCacheConfig,
    list: CostList<K, V>,
    map: HashMap<K, EntryId, S>,
    total_cost: i128,
    listener: ListenerSlot<V>,
    metrics: CostCacheMetrics,
}

impl<K, V, S> CostSegment<K, V, S> {
    /// Sum of entry costs, saturated at `i64::MAX`.
    #[inline]
    pub(crate) fn total_cost(&self) -> i64 {
        i64::try_from(self.total_cost).unwrap_or(i64::MAX)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CostSegment<K, V, S> {
    pub(crate) fn with_hasher(config: CostCacheConfig, hash_builder: S) -> Self {
        CostSegment {
            config,
            list: CostList::new(),
            map: HashMap::with_hasher(hash_builder),
            total_cost: 0,
            listener: ListenerSlot::empty(),
            metrics: CostCacheMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub(crate) fn config(&self) -> &CostCacheConfig {
        &self.config
    }

    /// Counters plus the current cost gauges, ready for reporting.
    pub(crate) fn metrics_map(&self) -> BTreeMap<String, f64> {
        self.metrics
            .to_btreemap(self.total_cost(), self.config.total_cost_limit)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.config.name = name;
    }

    pub(crate) fn set_total_cost_limit(&mut self, limit: i64) {
        self.config.total_cost_limit = limit;
    }

    pub(crate) fn set_count_limit(&mut self, limit: i64) {
        self.config.count_limit = limit;
    }

    pub(crate) fn set_evicts_objects_with_discarded_content(&mut self, evicts: bool) {
        self.config.evicts_objects_with_discarded_content = evicts;
    }

    pub(crate) fn set_eviction_listener<L>(&mut self, listener: &Arc<L>)
    where
        L: EvictionListener<V> + 'static,
    {
        self.listener.register(listener);
    }

    pub(crate) fn clear_eviction_listener(&mut self) {
        self.listener.unregister();
    }

    /// Looks up `key` without touching metrics.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.map.get(key)?;
        Some(&self.list.get(id).value)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(id) => {
                self.metrics.core.record_hit();
                Some(&self.list.get(id).value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Stores `value` under `key` with the given cost, then purges.
    ///
    /// Returns the value previously stored under `key`, if any.
    pub(crate) fn put(&mut self, key: K, value: V, cost: i64) -> Option<V>
    where
        K: Clone,
    {
        let cost = cost.max(0);

        let (cost_diff, replaced) = match self.map.get(&key).copied() {
            Some(id) => {
                let entry = self.list.get_mut(id);
                let old_cost = entry.cost;
                entry.cost = cost;
                let replaced = mem::replace(&mut entry.value, value);
                if cost != old_cost {
                    self.list.unlink(id);
                    self.list.link_sorted(id);
                }
                self.metrics.core.record_update();
                (i128::from(cost) - i128::from(old_cost), Some(replaced))
            }
            None => {
                let id = self.list.insert(CacheEntry::new(key.clone(), value, cost));
                self.map.insert(key, id);
                self.metrics.core.record_insertion();
                (i128::from(cost), None)
            }
        };

        self.total_cost += cost_diff;

        self.purge_by_cost();
        self.purge_by_count();

        debug_assert_eq!(self.map.len(), self.list.len());
        debug_assert_eq!(self.list.is_empty(), self.map.is_empty());
        debug_assert!(self.total_cost >= 0);

        replaced
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        self.list.unlink(id);
        let entry = self.list.release(id);
        self.total_cost -= i128::from(entry.cost);
        self.metrics.core.record_removal();
        Some(entry.value)
    }

    /// Drops every entry without notifying the listener.
    pub(crate) fn clear(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.list.clear();
        self.total_cost = 0;
        debug!(cache = %self.config.name, entries = dropped, "cleared cache");
    }

    fn purge_by_cost(&mut self) {
        if !self.config.has_cost_limit() {
            return;
        }

        let mut overflow = self.total_cost - i128::from(self.config.total_cost_limit);
        let mut evicted = 0usize;
        while overflow > 0 {
            match self.evict_head(EvictionReason::Cost) {
                Some(cost) => {
                    overflow -= i128::from(cost);
                    evicted += 1;
                }
                None => break,
            }
        }

        if evicted > 0 {
            debug!(
                cache = %self.config.name,
                evicted = evicted,
                total_cost = self.total_cost(),
                "cost purge finished"
            );
        }
    }

    fn purge_by_count(&mut self) {
        if !self.config.has_count_limit() {
            return;
        }

        let len = i64::try_from(self.map.len()).unwrap_or(i64::MAX);
        let mut overflow = len - self.config.count_limit;
        let mut evicted = 0usize;
        while overflow > 0 {
            if self.evict_head(EvictionReason::Count).is_none() {
                break;
            }
            overflow -= 1;
            evicted += 1;
        }

        if evicted > 0 {
            debug!(
                cache = %self.config.name,
                evicted = evicted,
                len = self.map.len(),
                "count purge finished"
            );
        }
    }

    /// Evicts the cheapest entry, notifying the listener first.
    ///
    /// Returns the evicted entry's cost, or `None` if the cache is empty.
    fn evict_head(&mut self, reason: EvictionReason) -> Option<i64> {
        let id = self.list.head()?;
        self.listener
            .notify(&self.config.name, &self.list.get(id).value);

        self.list.unlink(id);
        let entry = self.list.release(id);
        let removed = self.map.remove(&entry.key);
        debug_assert_eq!(removed, Some(id), "evicted entry missing from the key map");

        self.total_cost -= i128::from(entry.cost);
        self.metrics.record_eviction(reason);
        trace!(cost = entry.cost, reason = reason.as_str(), "evicted cache entry");
        Some(entry.cost)
    }

    /// Walks the whole structure and asserts every map/list invariant.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut count = 0usize;
        let mut sum = 0i128;
        let mut prev_cost = i64::MIN;
        for entry in self.list.iter() {
            assert!(entry.cost >= 0, "negative cost in list");
            assert!(entry.cost >= prev_cost, "cost list out of order");
            assert!(self.map.contains_key(&entry.key), "listed entry not in map");
            prev_cost = entry.cost;
            count += 1;
            sum += i128::from(entry.cost);
        }
        assert_eq!(count, self.map.len(), "map and list disagree on size");
        assert_eq!(count, self.list.len());
        assert_eq!(sum, self.total_cost, "total cost drifted");
        assert_eq!(self.list.head().is_none(), self.map.is_empty());
    }

    /// Keys from cheapest to most expensive.
    #[cfg(test)]
    pub(crate) fn keys_by_cost(&self) -> alloc::vec::Vec<K>
    where
        K: Clone,
    {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }
}

impl<K, V, S> core::fmt::Debug for CostSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CostSegment")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("total_cost", &self.total_cost())
            .field("listener", &self.listener)
            .finish()
    }
}

/// A cache bounded by aggregate entry cost and entry count.
///
/// Each entry is stored with a caller-supplied cost. When a store pushes the
/// total cost above `total_cost_limit`, or the number of entries above
/// `count_limit`, the cheapest entries are evicted first. Limits of zero or
/// below are disabled.
///
/// # Examples
///
/// ```
/// use cost_cache::config::CostCacheConfig;
/// use cost_cache::CostCache;
///
/// let config = CostCacheConfig::default().with_total_cost_limit(10);
/// let mut cache = CostCache::init(config, None);
///
/// cache.put_with_cost("large", "L", 6);
/// cache.put_with_cost("small", "S", 1);
/// assert_eq!(cache.total_cost(), 7);
///
/// // Total cost 11 > 10: the cheapest entry goes first
/// cache.put_with_cost("medium", "M", 4);
/// assert_eq!(cache.get(&"small"), None);
/// assert_eq!(cache.get(&"large"), Some(&"L"));
/// assert_eq!(cache.get(&"medium"), Some(&"M"));
/// assert_eq!(cache.total_cost(), 10);
/// ```
#[derive(Debug)]
pub struct CostCache<K, V, S = DefaultHashBuilder> {
    segment: CostSegment<K, V, S>,
}

impl<K: Hash + Eq, V> CostCache<K, V, DefaultHashBuilder> {
    /// Creates an unnamed cache with no limits.
    pub fn new() -> Self {
        Self::init(CostCacheConfig::default(), None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```
    /// use cost_cache::config::CostCacheConfig;
    /// use cost_cache::CostCache;
    ///
    /// let config = CostCacheConfig::default().with_count_limit(100);
    /// let cache: CostCache<String, i32> = CostCache::init(config, None);
    /// assert_eq!(cache.count_limit(), 100);
    /// ```
    pub fn init(config: CostCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V> Default for CostCache<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CostCache<K, V, S> {
    /// Creates a cache from a configuration and a custom hash builder.
    pub fn with_hasher(config: CostCacheConfig, hash_builder: S) -> Self {
        Self {
            segment: CostSegment::with_hasher(config, hash_builder),
        }
    }

    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the sum of the costs of all live entries.
    #[inline]
    pub fn total_cost(&self) -> i64 {
        self.segment.total_cost()
    }

    /// Returns the cache's label.
    #[inline]
    pub fn name(&self) -> &str {
        &self.segment.config().name
    }

    /// Replaces the cache's label.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.segment.set_name(name.into());
    }

    /// Returns the cost limit. Zero or below means unlimited.
    #[inline]
    pub fn total_cost_limit(&self) -> i64 {
        self.segment.config().total_cost_limit
    }

    /// Changes the cost limit. Takes effect on the next store.
    pub fn set_total_cost_limit(&mut self, limit: i64) {
        self.segment.set_total_cost_limit(limit);
    }

    /// Returns the count limit. Zero or below means unlimited.
    #[inline]
    pub fn count_limit(&self) -> i64 {
        self.segment.config().count_limit
    }

    /// Changes the count limit. Takes effect on the next store.
    pub fn set_count_limit(&mut self, limit: i64) {
        self.segment.set_count_limit(limit);
    }

    /// Returns the inert discarded-content flag.
    #[inline]
    pub fn evicts_objects_with_discarded_content(&self) -> bool {
        self.segment.config().evicts_objects_with_discarded_content
    }

    /// Sets the inert discarded-content flag. Has no effect on caching.
    pub fn set_evicts_objects_with_discarded_content(&mut self, evicts: bool) {
        self.segment.set_evicts_objects_with_discarded_content(evicts);
    }

    /// Registers the listener notified before each eviction.
    ///
    /// Only a weak reference is kept: the caller owns the listener, and
    /// once it is dropped evictions are no longer reported. Replaces any
    /// previously registered listener.
    pub fn set_eviction_listener<L>(&mut self, listener: &Arc<L>)
    where
        L: EvictionListener<V> + 'static,
    {
        self.segment.set_eviction_listener(listener);
    }

    /// Unregisters the eviction listener.
    pub fn clear_eviction_listener(&mut self) {
        self.segment.clear_eviction_listener();
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// Lookups never reorder entries or change costs.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Returns a reference to the value stored under `key` without recording metrics.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Removes `key`, returning its value.
    ///
    /// Removing an absent key is a no-op. The eviction listener is not
    /// notified.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes every entry without notifying the eviction listener.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CostCache<K, V, S> {
    /// Stores `value` under `key` with a cost of zero.
    ///
    /// Returns the value previously stored under `key`, if any.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.put(key, value, 0)
    }

    /// Stores `value` under `key` with the given cost, then evicts the
    /// cheapest entries until both limits are satisfied.
    ///
    /// Negative costs are treated as zero. The store itself is never
    /// rejected, even if it alone exceeds the cost limit.
    ///
    /// Returns the value previously stored under `key`, if any.
    #[inline]
    pub fn put_with_cost(&mut self, key: K, value: V, cost: i64) -> Option<V> {
        self.segment.put(key, value, cost)
    }

    /// Subscript-style assignment: `Some(value)` stores with a cost of zero,
    /// `None` removes the key.
    pub fn set(&mut self, key: K, value: Option<V>) {
        match value {
            Some(value) => {
                self.segment.put(key, value, 0);
            }
            None => {
                self.segment.remove(&key);
            }
        }
    }
}

impl<K, Q, V, S> Index<&Q> for CostCache<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present in the cache.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        match self.segment.peek(key) {
            Some(value) => value,
            None => panic!("key not present in cost cache"),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for CostCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics_map()
    }

    fn algorithm_name(&self) -> &'static str {
        "Cost"
    }
}
