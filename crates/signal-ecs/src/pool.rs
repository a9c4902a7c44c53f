//! Dense, fixed-capacity component pools.
//!
//! Each component kind gets one [`Pool<T>`]: a `Vec<T>` of exactly
//! [`MAX_ENTITIES`] slots plus a parallel `occupied` bitset, allocated once
//! at world-init (spec.md §3, §5 -- "no per-frame heap allocation occurs in
//! the integration path"). Slot `i` of every pool corresponds to entity slot
//! `i`, so there is never a hashmap indirection between an entity and its
//! components.

use crate::entity::MAX_ENTITIES;

/// A dense, fixed-capacity store for one component kind.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
    occupied: Vec<bool>,
}

impl<T: Default + Clone> Pool<T> {
    /// Allocate a pool with `MAX_ENTITIES` zero-valued, unoccupied slots.
    ///
    /// # Panics
    ///
    /// Panics (via the global allocator) if the backing storage can't be
    /// allocated. Use [`Pool::try_new`] to turn that into a recoverable
    /// error instead.
    pub fn new() -> Self {
        Self::try_new().expect("pool allocation failed")
    }

    /// Fallible counterpart to [`Pool::new`]: reserves the backing storage
    /// up front via `try_reserve_exact` so a host that can't satisfy
    /// `MAX_ENTITIES` worth of slots (spec.md §7 `OutOfMemory`) gets a
    /// `Result` instead of an abort.
    pub fn try_new() -> Result<Self, ()> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(MAX_ENTITIES).map_err(|_| ())?;
        slots.resize(MAX_ENTITIES, T::default());

        let mut occupied = Vec::new();
        occupied.try_reserve_exact(MAX_ENTITIES).map_err(|_| ())?;
        occupied.resize(MAX_ENTITIES, false);

        Ok(Self { slots, occupied })
    }

    /// Initialise `slot` to its zero-value and mark it occupied. No-op if
    /// already occupied (spec.md §4.2: adding a present component is a
    /// no-op).
    pub fn insert(&mut self, slot: usize) {
        if !self.occupied[slot] {
            self.slots[slot] = T::default();
            self.occupied[slot] = true;
        }
    }

    /// Clear occupancy for `slot`. The slot's value is reset to its
    /// zero-value so no stale data can leak into a later re-add.
    pub fn remove(&mut self, slot: usize) {
        if self.occupied[slot] {
            self.slots[slot] = T::default();
            self.occupied[slot] = false;
        }
    }

    /// `true` iff `slot` holds live data.
    pub fn is_occupied(&self, slot: usize) -> bool {
        self.occupied[slot]
    }

    /// Shared access to `slot`'s data, or `None` if unoccupied.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.occupied[slot].then(|| &self.slots[slot])
    }

    /// Mutable access to `slot`'s data, or `None` if unoccupied.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        if self.occupied[slot] {
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    /// Iterate occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.occupied[*i])
    }

    /// Iterate occupied slots mutably in ascending order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        let occupied = &self.occupied;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| occupied[*i])
    }
}

impl<T: Default + Clone> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
