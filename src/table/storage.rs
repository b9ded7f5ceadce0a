//! Slot-based row storage shared by both table kinds

use crate::tuple::Tuple;
use crate::types::RowId;

/// Rows kept in a slot vector; freed slots are reused LIFO.
///
/// A table holds at most `capacity` slots, never more than `u32::MAX`.
#[derive(Debug, Clone)]
pub(crate) struct RowStorage {
    slots: Vec<Option<Tuple>>,
    free: Vec<RowId>,
    live: usize,
    capacity: u32,
}

impl RowStorage {
    pub(crate) fn new() -> Self {
        Self::with_capacity_limit(u32::MAX)
    }

    pub(crate) fn with_capacity_limit(capacity: u32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            capacity,
        }
    }

    /// Maximum number of slots
    pub(crate) fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Row id the next call to [`insert`](Self::insert) will return, or
    /// `None` if every slot is taken.
    pub(crate) fn next_row_id(&self) -> Option<RowId> {
        if let Some(&row) = self.free.last() {
            return Some(row);
        }
        u32::try_from(self.slots.len())
            .ok()
            .filter(|&slot| slot < self.capacity)
            .map(RowId::new)
    }

    /// Store `tuple`, or return `None` without storing it if full.
    pub(crate) fn insert(&mut self, tuple: Tuple) -> Option<RowId> {
        let row = match self.free.pop() {
            Some(row) => {
                self.slots[row.slot()] = Some(tuple);
                row
            }
            None => {
                let row = self.next_row_id()?;
                self.slots.push(Some(tuple));
                row
            }
        };
        self.live += 1;
        Some(row)
    }

    /// Whether `row` is a slot freed by [`remove`](Self::remove)
    pub(crate) fn is_free(&self, row: RowId) -> bool {
        self.free.contains(&row)
    }

    /// Put `tuple` back into the freed slot `row`.
    ///
    /// Returns false, leaving storage untouched, if `row` is not a freed slot.
    pub(crate) fn restore(&mut self, row: RowId, tuple: Tuple) -> bool {
        let Some(pos) = self.free.iter().rposition(|&r| r == row) else {
            return false;
        };
        self.free.remove(pos);
        self.slots[row.slot()] = Some(tuple);
        self.live += 1;
        true
    }

    pub(crate) fn remove(&mut self, row: RowId) -> Option<Tuple> {
        let tuple = self.slots.get_mut(row.slot())?.take()?;
        self.free.push(row);
        self.live -= 1;
        Some(tuple)
    }

    /// Swap in `tuple` at `row`, returning the previous tuple.
    pub(crate) fn replace(&mut self, row: RowId, tuple: Tuple) -> Option<Tuple> {
        let slot = self.slots.get_mut(row.slot())?;
        if slot.is_none() {
            return None;
        }
        slot.replace(tuple)
    }

    pub(crate) fn get(&self, row: RowId) -> Option<&Tuple> {
        self.slots.get(row.slot())?.as_ref()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (RowId, &Tuple)> + '_ {
        (0u32..)
            .zip(self.slots.iter())
            .filter_map(|(slot, t)| t.as_ref().map(|t| (RowId::new(slot), t)))
    }

    pub(crate) fn row_ids(&self) -> Vec<RowId> {
        self.iter().map(|(row, _)| row).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub(crate) fn allocated_slots(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    #[test]
    fn test_storage_insert_and_reuse() {
        let mut storage = RowStorage::new();
        assert_eq!(storage.next_row_id(), Some(RowId::new(0)));

        let a = storage.insert(tuple![1i64]).unwrap();
        let b = storage.insert(tuple![2i64]).unwrap();
        assert_eq!((a, b), (RowId::new(0), RowId::new(1)));
        assert_eq!(storage.len(), 2);

        assert_eq!(storage.remove(a), Some(tuple![1i64]));
        assert_eq!(storage.remove(a), None);
        assert_eq!(storage.next_row_id(), Some(a));
        assert_eq!(storage.insert(tuple![3i64]), Some(a));
        assert_eq!(storage.allocated_slots(), 2);
    }

    #[test]
    fn test_storage_restore() {
        let mut storage = RowStorage::new();
        let a = storage.insert(tuple![1i64]).unwrap();
        let b = storage.insert(tuple![2i64]).unwrap();
        storage.remove(a);
        storage.remove(b);
        assert!(storage.is_free(a));

        assert!(storage.restore(a, tuple![1i64]));
        assert!(!storage.is_free(a));
        assert!(!storage.restore(a, tuple![9i64]));
        assert_eq!(storage.get(a), Some(&tuple![1i64]));
        assert_eq!(storage.next_row_id(), Some(b));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_storage_restore_rejects_unknown_slot() {
        let mut storage = RowStorage::new();
        let a = storage.insert(tuple![1i64]).unwrap();

        // Live slot, slot past the end, and the largest possible id.
        assert!(!storage.restore(a, tuple![2i64]));
        assert!(!storage.restore(RowId::new(5), tuple![5i64]));
        assert!(!storage.restore(RowId::new(u32::MAX), tuple![9i64]));

        assert_eq!(storage.allocated_slots(), 1);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(a), Some(&tuple![1i64]));
        assert_eq!(storage.next_row_id(), Some(RowId::new(1)));
    }

    #[test]
    fn test_storage_capacity_limit() {
        let mut storage = RowStorage::with_capacity_limit(2);
        let a = storage.insert(tuple![1i64]).unwrap();
        storage.insert(tuple![2i64]).unwrap();

        assert_eq!(storage.next_row_id(), None);
        assert_eq!(storage.insert(tuple![3i64]), None);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.allocated_slots(), 2);

        // A freed slot is usable again.
        storage.remove(a);
        assert_eq!(storage.insert(tuple![3i64]), Some(a));
    }

    #[test]
    fn test_storage_replace() {
        let mut storage = RowStorage::new();
        let a = storage.insert(tuple![1i64]).unwrap();
        assert_eq!(storage.replace(a, tuple![2i64]), Some(tuple![1i64]));
        assert_eq!(storage.get(a), Some(&tuple![2i64]));
        assert_eq!(storage.replace(RowId::new(3), tuple![0i64]), None);

        storage.clear();
        assert_eq!(storage.len(), 0);
        assert!(storage.get(a).is_none());
    }
}
