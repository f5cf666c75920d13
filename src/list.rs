//! Cost-ordered intrusive list backed by an entry arena.
//!
//! Entries live in a `Vec` of slots and are addressed by a stable
//! [`EntryId`]. The key map of a cache stores `key -> EntryId` and the list
//! links are `EntryId -> EntryId`, so the same record is reachable from both
//! structures without shared mutable aliasing.
//!
//! The list is kept sorted by ascending cost from head to tail. The head is
//! always the cheapest entry and therefore the next eviction candidate.

extern crate alloc;

use crate::entry::{CacheEntry, EntryId};
use alloc::vec::Vec;
use core::fmt;

/// An arena of [`CacheEntry`] values threaded into a list sorted by cost.
pub(crate) struct CostList<K, V> {
    /// Entry storage. `None` marks a slot that is free for reuse.
    slots: Vec<Option<CacheEntry<K, V>>>,
    /// Indices of vacant slots.
    free: Vec<EntryId>,
    /// The cheapest linked entry.
    head: Option<EntryId>,
    /// Number of linked entries.
    len: usize,
}

impl<K, V> CostList<K, V> {
    /// Creates an empty list.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        CostList {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Returns the number of linked entries.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entry is linked.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the cheapest entry, if any.
    #[inline]
    pub(crate) fn head(&self) -> Option<EntryId> {
        self.head
    }

    /// Returns the entry stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot. Live handles are
    /// only ever obtained from [`insert`](Self::insert), so this indicates a
    /// broken map/list invariant.
    #[inline]
    pub(crate) fn get(&self, id: EntryId) -> &CacheEntry<K, V> {
        match self.slots.get(id) {
            Some(Some(entry)) => entry,
            _ => panic!("cost list: entry {} is not live", id),
        }
    }

    /// Returns the entry stored under `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntryId) -> &mut CacheEntry<K, V> {
        match self.slots.get_mut(id) {
            Some(Some(entry)) => entry,
            _ => panic!("cost list: entry {} is not live", id),
        }
    }

    /// Stores `entry` in the arena and links it at its sorted position.
    pub(crate) fn insert(&mut self, entry: CacheEntry<K, V>) -> EntryId {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(entry);
                id
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.link_sorted(id);
        id
    }

    /// Links a stored but unlinked entry at its position in the cost order.
    ///
    /// - An empty list makes the entry the sole element.
    /// - A cost not greater than the head's makes the entry the new head.
    /// - Otherwise the entry is placed after the last node reached by walking
    ///   forward while the next node is strictly cheaper than the entry.
    ///
    /// Equal-cost entries therefore land in front of the equal-cost run they
    /// join.
    pub(crate) fn link_sorted(&mut self, id: EntryId) {
        let cost = self.get(id).cost;

        let Some(head) = self.head else {
            self.get_mut(id).unlink();
            self.head = Some(id);
            self.len += 1;
            return;
        };

        if cost <= self.get(head).cost {
            let entry = self.get_mut(id);
            entry.prev_by_cost = None;
            entry.next_by_cost = Some(head);
            self.get_mut(head).prev_by_cost = Some(id);
            self.head = Some(id);
            self.len += 1;
            return;
        }

        let mut cursor = head;
        while let Some(next) = self.get(cursor).next_by_cost {
            if self.get(next).cost >= cost {
                break;
            }
            cursor = next;
        }

        let next = self.get(cursor).next_by_cost;
        self.get_mut(cursor).next_by_cost = Some(id);
        let entry = self.get_mut(id);
        entry.prev_by_cost = Some(cursor);
        entry.next_by_cost = next;
        if let Some(next) = next {
            self.get_mut(next).prev_by_cost = Some(id);
        }
        self.len += 1;
    }

    /// Removes a linked entry from the cost order, leaving it in the arena.
    pub(crate) fn unlink(&mut self, id: EntryId) {
        let entry = self.get_mut(id);
        let (prev, next) = (entry.prev_by_cost, entry.next_by_cost);
        entry.unlink();

        match prev {
            Some(prev) => self.get_mut(prev).next_by_cost = next,
            None => {
                debug_assert_eq!(self.head, Some(id), "unlinking an entry that is not linked");
                self.head = next;
            }
        }
        if let Some(next) = next {
            self.get_mut(next).prev_by_cost = prev;
        }
        self.len -= 1;
    }

    /// Takes an unlinked entry out of the arena and frees its slot.
    pub(crate) fn release(&mut self, id: EntryId) -> CacheEntry<K, V> {
        debug_assert_ne!(self.head, Some(id), "releasing the linked head");
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(entry) => {
                debug_assert!(entry.is_unlinked(), "releasing a linked entry");
                self.free.push(id);
                entry
            }
            None => panic!("cost list: entry {} is not live", id),
        }
    }

    /// Drops every entry.
    ///
    /// Links are cleared head to tail before the arena is emptied.
    pub(crate) fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(id) = cursor {
            let entry = self.get_mut(id);
            cursor = entry.next_by_cost;
            entry.unlink();
        }
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates the linked entries from cheapest to most expensive.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<K, V> fmt::Debug for CostList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostList")
            .field("len", &self.len)
            .field("head", &self.head)
            .field("free_slots", &self.free.len())
            .finish()
    }
}

/// Cost-order iterator over a [`CostList`].
#[cfg(test)]
pub(crate) struct Iter<'a, K, V> {
    list: &'a CostList<K, V>,
    cursor: Option<EntryId>,
}

#[cfg(test)]
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.list.get(id);
        self.cursor = entry.next_by_cost;
        Some(entry)
    }
}

#[cfg(test)]
impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("cursor", &self.cursor).finish()
    }
}
