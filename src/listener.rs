//! Eviction listener: a callback invoked right before the cache evicts an entry.
//!
//! The cache holds its listener through a [`Weak`] reference. Registering a
//! listener never extends its lifetime; once the last [`Arc`] owned by the
//! caller is dropped, evictions simply stop being reported.
//!
//! # Example
//!
//! ```
//! use cost_cache::config::CostCacheConfig;
//! use cost_cache::listener::FnListener;
//! use cost_cache::CostCache;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let evicted = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evicted);
//! let listener = Arc::new(FnListener(move |_cache: &str, _value: &i32| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! }));
//!
//! let mut cache = CostCache::init(CostCacheConfig::default().with_count_limit(1), None);
//! cache.set_eviction_listener(&listener);
//!
//! cache.put("a", 1);
//! cache.put("b", 2); // evicts one entry
//! assert_eq!(evicted.load(Ordering::Relaxed), 1);
//! ```

extern crate alloc;

use alloc::sync::{Arc, Weak};
use core::fmt;

/// A callback invoked once per evicted entry, before the entry is removed.
///
/// The callback receives the name of the evicting cache and a reference to
/// the value about to be dropped. The key is not reported.
///
/// Implementations must be `Send + Sync` so the listener can be registered
/// on a cache shared across threads.
///
/// # Re-entrancy
///
/// **Do not call any method of the evicting cache from inside the listener.**
/// The callback runs while the cache's lock is held (or while the
/// single-owner cache is mutably borrowed), and re-entering a
/// [`ConcurrentCostCache`](crate::ConcurrentCostCache) from its own listener
/// deadlocks.
///
/// Explicit removals and [`clear`](crate::CostCache::clear) are not
/// evictions and are never reported.
pub trait EvictionListener<V>: Send + Sync {
    /// Called synchronously right before `value` is evicted from `cache_name`.
    fn will_evict(&self, cache_name: &str, value: &V);
}

/// An [`EvictionListener`] backed by a closure.
pub struct FnListener<F>(pub F);

impl<V, F> EvictionListener<V> for FnListener<F>
where
    F: Fn(&str, &V) + Send + Sync,
{
    #[inline]
    fn will_evict(&self, cache_name: &str, value: &V) {
        (self.0)(cache_name, value)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

/// Non-owning listener registration held by a cache.
pub(crate) struct ListenerSlot<V> {
    listener: Option<Weak<dyn EvictionListener<V>>>,
}

impl<V> ListenerSlot<V> {
    pub(crate) fn empty() -> Self {
        Self { listener: None }
    }

    pub(crate) fn register<L>(&mut self, listener: &Arc<L>)
    where
        L: EvictionListener<V> + 'static,
    {
        let weak: Weak<L> = Arc::downgrade(listener);
        self.listener = Some(weak);
    }

    pub(crate) fn unregister(&mut self) {
        self.listener = None;
    }

    /// Returns `true` if a listener is registered and still alive.
    pub(crate) fn is_active(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Reports an imminent eviction to the listener, if it is still alive.
    #[inline]
    pub(crate) fn notify(&self, cache_name: &str, value: &V) {
        if let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) {
            listener.will_evict(cache_name, value);
        }
    }
}

impl<V> fmt::Debug for ListenerSlot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("active", &self.is_active())
            .finish()
    }
}
