//! Concurrent Cache Implementation
//!
//! This module provides the thread-safe cost cache.
//!
//! # Architecture
//!
//! [`ConcurrentCostCache`] wraps one [`CostSegment`](crate::cost) in a single
//! `parking_lot::Mutex`. Every operation, reads included, takes that lock for
//! its whole duration.
//!
//! ## Why One Lock Instead of Lock Striping?
//!
//! Eviction always removes the globally cheapest entry. Partitioning the key
//! space across independently locked segments would turn that into "cheapest
//! entry of whichever segment overflowed", and the aggregate limits would be
//! split across segments. A single lock keeps the cost order and both limits
//! global, and keeps every operation linearizable.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! Lookups record hit/miss counters, so even `get()` mutates the segment.
//! `parking_lot::Mutex` has less bookkeeping than an `RwLock` and makes it
//! clear that all operations are mutually exclusive.
//!
//! # Eviction Listener and the Lock
//!
//! The eviction listener runs **while the lock is held**. A listener must
//! never call back into the cache that is notifying it: the lock is not
//! reentrant and the call deadlocks. This is a caller obligation; the cache
//! does not detect it.
//!
//! # Example
//!
//! ```rust
//! use cost_cache::config::CostCacheConfig;
//! use cost_cache::ConcurrentCostCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config = CostCacheConfig::default().with_total_cost_limit(10_000);
//! let cache = Arc::new(ConcurrentCostCache::init(config, None));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..1000i64 {
//!             cache.put_with_cost(format!("key_{}_{}", t, i), i, i % 50);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert!(cache.total_cost() <= 10_000);
//! ```
//!
//! # Zero-Copy Access
//!
//! `get()` clones the value. Use `get_with()` to read the value in place while
//! the lock is held:
//!
//! ```rust,ignore
//! let len = cache.get_with(&key, |value| value.len());
//! ```

mod cost;

pub use self::cost::ConcurrentCostCache;
