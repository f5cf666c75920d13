//! Cost-Ordered Cache Entry
//!
//! This module provides the `CacheEntry<K, V>` record stored by the cost cache.
//! Each entry holds the caller's key and value, the caller-supplied cost, and
//! the two links that thread it into the cost-ordered list kept by
//! [`CostList`](crate::list::CostList).
//!
//! # Memory Layout
//!
//! Each entry has the following overhead:
//! - `key: K` - User's key type
//! - `value: V` - User's value type
//! - `cost: i64` - 8 bytes (aggregate cost accounting)
//! - `prev_by_cost: Option<EntryId>` - 16 bytes
//! - `next_by_cost: Option<EntryId>` - 16 bytes
//!
//! Links are arena indices rather than pointers, so an entry can be moved
//! inside the list in O(1) once its neighbours are known without any
//! aliasing between the key map and the list.
//!
//! Entries never leave the crate. Only values are handed back to callers.

use core::fmt;

/// Stable handle of an entry inside the [`CostList`](crate::list::CostList) arena.
///
/// A handle stays valid until the entry is released from the arena; after
/// that the slot may be reused by a later insertion.
pub(crate) type EntryId = usize;

/// A live cache entry and its position in the cost order.
pub(crate) struct CacheEntry<K, V> {
    /// The cached key
    pub(crate) key: K,

    /// The cached value
    pub(crate) value: V,

    /// Caller-supplied cost, already clamped to be non-negative.
    pub(crate) cost: i64,

    /// The entry immediately cheaper (or equally cheap) in the cost order.
    pub(crate) prev_by_cost: Option<EntryId>,

    /// The entry immediately more expensive (or equally expensive) in the cost order.
    pub(crate) next_by_cost: Option<EntryId>,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates a new, unlinked entry.
    ///
    /// Negative costs are clamped to zero.
    #[inline]
    pub(crate) fn new(key: K, value: V, cost: i64) -> Self {
        Self {
            key,
            value,
            cost: cost.max(0),
            prev_by_cost: None,
            next_by_cost: None,
        }
    }

    /// Returns `true` if neither link is set.
    ///
    /// A sole element of the list is also unlinked in this sense; callers
    /// that need list membership ask the list for its head.
    #[inline]
    pub(crate) fn is_unlinked(&self) -> bool {
        self.prev_by_cost.is_none() && self.next_by_cost.is_none()
    }

    /// Clears both links.
    #[inline]
    pub(crate) fn unlink(&mut self) {
        self.prev_by_cost = None;
        self.next_by_cost = None;
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CacheEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("cost", &self.cost)
            .field("prev_by_cost", &self.prev_by_cost)
            .field("next_by_cost", &self.next_by_cost)
            .finish()
    }
}
