//! Fixed-capacity matrix registry.
//!
//! The registry is an arena of `N` optional slots plus an explicit insertion
//! cursor. Slot `cursor % N` receives the next insertion; whatever lived
//! there before is destroyed. Capacity never grows, so eviction is the only
//! overflow policy.

use crate::error::StoreError;
use crate::matrix::Matrix;
use tracing::debug;

/// Slot count used by the shell unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// Sole owner of every matrix it holds.
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Option<Matrix>>,

    /// Monotonic insertion counter
    cursor: u64,
}

impl Registry {
    /// Creates an empty registry with `capacity` slots.
    pub fn new(capacity: usize) -> Result<Self, StoreError> {
        if capacity == 0 {
            return Err(StoreError::ZeroCapacity);
        }
        Ok(Self {
            slots: (0..capacity).map(|_| None).collect(),
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Total insertions so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Slot the next insertion will target.
    pub fn next_slot(&self) -> usize {
        (self.cursor % self.slots.len() as u64) as usize
    }

    /// Takes ownership of `matrix`, returning its slot and the displaced
    /// occupant (if any) for the caller to dispose of.
    pub fn swap(&mut self, matrix: Matrix) -> (usize, Option<Matrix>) {
        let slot = self.next_slot();
        let displaced = self.slots[slot].replace(matrix);
        self.cursor += 1;
        (slot, displaced)
    }

    /// Inserts `matrix` and returns its slot.
    ///
    /// Never fails. When the target slot is occupied, its matrix is
    /// destroyed, even if the caller still wanted it: inserting more than
    /// `capacity()` matrices silently drops the oldest ones.
    pub fn insert(&mut self, matrix: Matrix) -> usize {
        let (slot, displaced) = self.swap(matrix);
        if let Some(old) = displaced {
            debug!(slot, evicted = %old.name(), "evicting matrix");
            old.destroy();
        }
        slot
    }

    /// First slot, in slot order, whose matrix has exactly this name.
    pub fn find_by_name(&self, target: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Some(m) if m.name() == target))
    }

    pub fn get(&self, slot: usize) -> Option<&Matrix> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Matrix> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Matrix> {
        self.find_by_name(name).and_then(|slot| self.get(slot))
    }

    pub fn get_mut_by_name(&mut self, name: &str) -> Option<&mut Matrix> {
        let slot = self.find_by_name(name)?;
        self.get_mut(slot)
    }

    /// Removes a matrix without destroying it.
    pub fn take(&mut self, slot: usize) -> Option<Matrix> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Destroys the occupant of `slot`. Empty or out-of-range slots are a no-op.
    pub fn destroy_slot(&mut self, slot: usize) {
        if let Some(m) = self.take(slot) {
            m.destroy();
        }
    }

    /// Destroys every remaining matrix. The cursor is left as is.
    pub fn clear(&mut self) {
        for slot in 0..self.slots.len() {
            self.destroy_slot(slot);
        }
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Matrix)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|m| (i, m)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            slots: (0..DEFAULT_CAPACITY).map(|_| None).collect(),
            cursor: 0,
        }
    }
}
