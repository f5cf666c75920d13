//! Concurrent Cost Cache Implementation
//!
//! A thread-safe cost-bounded cache. This is the multi-threaded counterpart
//! to [`CostCache`](crate::CostCache).
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              ConcurrentCostCache              │
//! │                                               │
//! │   get / put / remove / clear / metrics        │
//! │                    │                          │
//! │              ┌─────▼─────┐                    │
//! │              │   Mutex   │                    │
//! │              └─────┬─────┘                    │
//! │              ┌─────▼─────┐                    │
//! │              │CostSegment│  map + cost list   │
//! │              └───────────┘                    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Performance Characteristics
//!
//! | Metric | Value |
//! |--------|-------|
//! | Get/Remove | O(1) average, one lock acquisition |
//! | Put | O(n) worst case for the sorted insert, one lock acquisition |
//! | Concurrency | All operations serialize on one lock |
//!
//! # When to Use
//!
//! **Use ConcurrentCostCache when:**
//! - Multiple threads share one cache
//! - Entries have very different costs (decoded images, query results)
//! - The limits must hold for the cache as a whole
//!
//! **Consider alternatives when:**
//! - Single-threaded access only → use `CostCache`
//! - Throughput under heavy write contention matters more than a global
//!   cost order → use one of the striped caches from another crate

extern crate alloc;

use crate::config::CostCacheConfig;
use crate::cost::CostSegment;
use crate::listener::EvictionListener;
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe cache bounded by aggregate entry cost and entry count.
///
/// All state sits behind one `parking_lot::Mutex`; every method acquires it
/// for its entire duration, so operations are linearizable.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`, and `Clone` to store.
/// - `V`: Value type. Must implement `Clone` for [`get`](Self::get).
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Re-entrancy
///
/// The eviction listener is invoked with the lock held. Calling any method
/// of this cache from inside its own listener deadlocks.
///
/// # Example
///
/// ```rust
/// use cost_cache::config::CostCacheConfig;
/// use cost_cache::ConcurrentCostCache;
/// use std::sync::Arc;
///
/// let cache = Arc::new(ConcurrentCostCache::init(
///     CostCacheConfig::default().with_count_limit(2),
///     None,
/// ));
///
/// cache.put_with_cost("a".to_string(), 1, 10);
/// cache.put_with_cost("b".to_string(), 2, 20);
/// cache.put_with_cost("c".to_string(), 3, 30);
///
/// // The cheapest entry made room
/// assert_eq!(cache.get("a"), None);
/// assert_eq!(cache.get("c"), Some(3));
/// ```
pub struct ConcurrentCostCache<K, V, S = DefaultHashBuilder> {
    inner: Mutex<CostSegment<K, V, S>>,
}

impl<K, V> ConcurrentCostCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates an unnamed cache with no limits.
    pub fn new() -> Self {
        Self::init(CostCacheConfig::default(), None)
    }

    /// Creates a concurrent cost cache from a configuration with an optional hasher.
    ///
    /// This is the **recommended** way to create a concurrent cost cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Name, limits and the inert discarded-content flag
    /// * `hasher` - Optional custom hash builder. If `None`, uses `DefaultHashBuilder`
    pub fn init(config: CostCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V> Default for ConcurrentCostCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ConcurrentCostCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a concurrent cost cache with a custom hash builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn with_hasher(config: CostCacheConfig, hash_builder: S) -> Self {
        Self {
            inner: Mutex::new(CostSegment::with_hasher(config, hash_builder)),
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the sum of the costs of all live entries.
    pub fn total_cost(&self) -> i64 {
        self.inner.lock().total_cost()
    }

    /// Returns a copy of the cache's label.
    pub fn name(&self) -> String {
        self.inner.lock().config().name.clone()
    }

    /// Replaces the cache's label.
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.lock().set_name(name.into());
    }

    /// Returns the cost limit. Zero or below means unlimited.
    pub fn total_cost_limit(&self) -> i64 {
        self.inner.lock().config().total_cost_limit
    }

    /// Changes the cost limit. Takes effect on the next store.
    pub fn set_total_cost_limit(&self, limit: i64) {
        self.inner.lock().set_total_cost_limit(limit);
    }

    /// Returns the count limit. Zero or below means unlimited.
    pub fn count_limit(&self) -> i64 {
        self.inner.lock().config().count_limit
    }

    /// Changes the count limit. Takes effect on the next store.
    pub fn set_count_limit(&self, limit: i64) {
        self.inner.lock().set_count_limit(limit);
    }

    /// Returns the inert discarded-content flag.
    pub fn evicts_objects_with_discarded_content(&self) -> bool {
        self.inner
            .lock()
            .config()
            .evicts_objects_with_discarded_content
    }

    /// Sets the inert discarded-content flag. Has no effect on caching.
    pub fn set_evicts_objects_with_discarded_content(&self, evicts: bool) {
        self.inner
            .lock()
            .set_evicts_objects_with_discarded_content(evicts);
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> CostCacheConfig {
        self.inner.lock().config().clone()
    }

    /// Registers the listener notified before each eviction.
    ///
    /// Only a weak reference is kept; the caller keeps the listener alive.
    /// The listener runs with the cache lock held and **must not** call
    /// back into this cache.
    pub fn set_eviction_listener<L>(&self, listener: &Arc<L>)
    where
        L: EvictionListener<V> + 'static,
    {
        self.inner.lock().set_eviction_listener(listener);
    }

    /// Unregisters the eviction listener.
    pub fn clear_eviction_listener(&self) {
        self.inner.lock().clear_eviction_listener();
    }

    /// Retrieves a value from the cache.
    ///
    /// Returns a **clone** of the value so the lock is released on return.
    /// For operations that don't need ownership, use
    /// [`get_with()`](Self::get_with) instead.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Retrieves a value and applies a function to it while holding the lock.
    ///
    /// More efficient than `get()` when you only need to read from the value,
    /// as it avoids cloning. The lock is released after `f` returns, so `f`
    /// must not call back into this cache.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Checks if the cache contains a key.
    ///
    /// Unlike `get()`, this does not count as a lookup in the metrics.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().contains_key(key)
    }

    /// Removes a key from the cache without notifying the eviction listener.
    ///
    /// # Returns
    ///
    /// - `Some(value)` if the key existed
    /// - `None` if the key was not found
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().remove(key)
    }

    /// Removes all entries without notifying the eviction listener.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V, S> ConcurrentCostCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Inserts a key-value pair with a cost of zero.
    ///
    /// Returns the value previously stored under `key`, if any.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value, 0)
    }

    /// Inserts a key-value pair with explicit cost.
    ///
    /// Lookup, insertion and both purge passes happen under one lock
    /// acquisition. Negative costs are treated as zero.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to cache
    /// * `cost` - Cost of this entry (in your chosen unit)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let data = vec![0u8; 1024];
    /// cache.put_with_cost("file".to_string(), data, 1024);
    /// ```
    pub fn put_with_cost(&self, key: K, value: V, cost: i64) -> Option<V> {
        self.inner.lock().put(key, value, cost)
    }

    /// Subscript-style assignment: `Some(value)` stores with a cost of zero,
    /// `None` removes the key.
    pub fn set(&self, key: K, value: Option<V>) {
        let mut segment = self.inner.lock();
        match value {
            Some(value) => {
                segment.put(key, value, 0);
            }
            None => {
                segment.remove(&key);
            }
        }
    }
}

impl<K, V, S> CacheMetrics for ConcurrentCostCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics_map()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentCost"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentCostCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_lock() {
            Some(segment) => f
                .debug_struct("ConcurrentCostCache")
                .field("segment", &*segment)
                .finish(),
            None => f
                .debug_struct("ConcurrentCostCache")
                .field("segment", &"<locked>")
                .finish(),
        }
    }
}
