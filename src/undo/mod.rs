//! Undo records for durable table mutations
//!
//! Every row change on a persistent table is described by an
//! [`UndoRecord`] and appended to the [`UndoLog`] of the executing
//! context. On transaction abort the engine hands the records back to
//! the owning table in reverse order (see `PersistentTable::undo`).

use crate::tuple::Tuple;
use crate::types::{CatalogId, RowId};
use parking_lot::Mutex;

/// Reversible description of a single row mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// A row was inserted at `row`; undo removes it
    Insert { row: RowId, tuple: Tuple },
    /// A row was deleted from `row`; undo restores `tuple` there
    Delete { row: RowId, tuple: Tuple },
    /// The row at `row` was changed from `before` to `after`
    Update { row: RowId, before: Tuple, after: Tuple },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub table_id: CatalogId,
    pub action: UndoAction,
}

impl UndoRecord {
    pub fn new(table_id: CatalogId, action: UndoAction) -> Self {
        Self { table_id, action }
    }
}

/// Sink for undo records, supplied by the transaction layer
pub trait UndoLog: Send + Sync {
    fn append(&self, record: UndoRecord);
}

/// Mark into an [`InMemoryUndoLog`], taken at the start of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoMark(usize);

/// Undo log kept in memory, in append order
#[derive(Debug, Default)]
pub struct InMemoryUndoLog {
    records: Mutex<Vec<UndoRecord>>,
}

impl InMemoryUndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn mark(&self) -> UndoMark {
        UndoMark(self.len())
    }

    /// Remove the records appended after `mark`, newest first.
    ///
    /// This is the order in which they must be applied on abort.
    pub fn take_since(&self, mark: UndoMark) -> Vec<UndoRecord> {
        let mut records = self.records.lock();
        let start = mark.0.min(records.len());
        let mut taken = records.split_off(start);
        taken.reverse();
        taken
    }

    /// Drop the records appended after `mark` (commit).
    pub fn release(&self, mark: UndoMark) {
        let mut records = self.records.lock();
        let start = mark.0.min(records.len());
        records.truncate(start);
    }

    /// Snapshot of the records, oldest first
    pub fn records(&self) -> Vec<UndoRecord> {
        self.records.lock().clone()
    }
}

impl UndoLog for InMemoryUndoLog {
    fn append(&self, record: UndoRecord) {
        self.records.lock().push(record);
    }
}
