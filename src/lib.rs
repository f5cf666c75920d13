#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Eviction Order
//!
//! Every entry carries a cost. Entries are kept sorted by ascending cost and
//! the cheapest entry is always evicted first:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  put(key, value, cost)                                               │
//! │        │                                                             │
//! │        ▼                                                             │
//! │  ┌───────────────┐   cost <= head?   ┌───────────────────────────┐   │
//! │  │ sorted insert │──────Yes─────────▶│ becomes the new head      │   │
//! │  └───────┬───────┘                   └───────────────────────────┘   │
//! │          No                                                          │
//! │          ▼                                                           │
//! │  placed before the first entry at least as expensive                 │
//! │        │                                                             │
//! │        ▼                                                             │
//! │  cost purge: evict head while total_cost > total_cost_limit          │
//! │        │                                                             │
//! │        ▼                                                             │
//! │  count purge: evict head while len > count_limit                     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description | Best Use Case |
//! |------|-------------|---------------|
//! | [`CostCache`] | Single-owner cost cache | One thread, or your own locking |
//! | [`ConcurrentCostCache`] | One cost cache behind one lock | Shared across threads |
//!
//! ## Code Examples
//!
//! ### Cost-bounded cache
//!
//! ```rust
//! use cost_cache::CostCache;
//! use cost_cache::config::CostCacheConfig;
//!
//! let config = CostCacheConfig::default()
//!     .with_name("thumbnails")
//!     .with_total_cost_limit(100);
//! let mut cache = CostCache::init(config, None);
//!
//! cache.put_with_cost("a.png", vec![0u8; 60], 60);
//! cache.put_with_cost("b.png", vec![0u8; 30], 30);
//! cache.put_with_cost("c.png", vec![0u8; 40], 40);  // 130 > 100: "b.png" evicted
//!
//! assert!(cache.get(&"b.png").is_none());
//! assert_eq!(cache.total_cost(), 100);
//! ```
//!
//! ### Eviction listener
//!
//! ```rust
//! use cost_cache::{CostCache, FnListener};
//! use cost_cache::config::CostCacheConfig;
//! use std::sync::{Arc, Mutex};
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//! let listener = Arc::new(FnListener(move |_cache: &str, value: &i32| {
//!     sink.lock().unwrap().push(*value);
//! }));
//!
//! let mut cache = CostCache::init(CostCacheConfig::default().with_count_limit(1), None);
//! cache.set_eviction_listener(&listener);
//! cache.put_with_cost("a", 1, 1);
//! cache.put_with_cost("b", 2, 2);
//!
//! assert_eq!(*evicted.lock().unwrap(), vec![1]);
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature (on by default) for the thread-safe version:
//!
//! ```rust,ignore
//! use cost_cache::ConcurrentCostCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ConcurrentCostCache::new());
//!
//! let cache_clone = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     cache_clone.put_with_cost("key".to_string(), 42, 8);
//! });
//! ```
//!
//! ## Modules
//!
//! - [`cost`]: Single-owner cost cache implementation
//! - [`config`]: Configuration structure shared by both caches
//! - [`listener`]: Eviction notification
//! - [`metrics`]: Metrics collection for cache monitoring
//! - [`concurrent`]: Thread-safe cost cache (requires `concurrent` feature)

#![no_std]

#[cfg(any(test, not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Cache entry type.
///
/// A key, its value, its cost, and the links that place the entry in the
/// cost-ordered list.
pub(crate) mod entry;

/// Cost-ordered doubly linked list stored in an index arena.
///
/// **Note**: This module is internal infrastructure. It does not check that
/// the map and the list agree; the cache keeps them in sync.
pub(crate) mod list;

/// Cache configuration.
///
/// Name, cost limit, count limit and the discarded-content flag.
pub mod config;

/// Eviction listener.
///
/// Observers registered here are told about every entry the cache evicts
/// to satisfy its limits.
pub mod listener;

/// Cost-bounded cache implementation.
///
/// Provides a cache that evicts its cheapest entries when the total cost
/// or the entry count goes over the configured limit.
pub mod cost;

/// Cache metrics system.
///
/// Provides hit/miss, insertion and eviction counters for the cost cache.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Provides a thread-safe cost cache that guards a single segment with a
/// single lock, so eviction order and limits stay global.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

// Re-export cache types
pub use cost::CostCache;

// Re-export configuration and listener types
pub use config::CostCacheConfig;
pub use listener::{EvictionListener, FnListener};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentCostCache;
