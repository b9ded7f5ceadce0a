//! Transient (temp) table
//!
//! No indexes, no constraints, no undo logging. Each stored row holds
//! `tuple_length` bytes of the shared [`MemoryBudget`]; the bytes go back
//! when the row is deleted or the table is dropped.

use crate::schema::TupleSchema;
use crate::table::storage::RowStorage;
use crate::table::{MemoryBudget, Table, TableError, TableKind, TableResult};
use crate::tuple::Tuple;
use crate::types::{CatalogId, RowId};
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Debug)]
pub struct TempTable {
    database_id: CatalogId,
    name: String,
    schema: Arc<TupleSchema>,
    column_names: Vec<String>,
    storage: RowStorage,
    budget: MemoryBudget,
    reserved: usize,
}

impl TempTable {
    pub(super) fn new(
        database_id: CatalogId,
        name: String,
        schema: Arc<TupleSchema>,
        column_names: Vec<String>,
        budget: MemoryBudget,
    ) -> Self {
        Self {
            database_id,
            name,
            schema,
            column_names,
            storage: RowStorage::new(),
            budget,
            reserved: 0,
        }
    }

    /// Bytes this table currently holds from its budget
    pub fn reserved_bytes(&self) -> usize {
        self.reserved
    }

    pub fn budget(&self) -> &MemoryBudget {
        &self.budget
    }

    #[cfg(test)]
    pub(super) fn limit_capacity(&mut self, capacity: u32) {
        self.storage = RowStorage::with_capacity_limit(capacity);
    }

    fn full_error(&self) -> TableError {
        TableError::TableFull {
            table: self.name.clone(),
            capacity: self.storage.capacity(),
        }
    }

    fn row_bytes(&self) -> usize {
        self.schema.tuple_length()
    }
}

impl Table for TempTable {
    fn database_id(&self) -> CatalogId {
        self.database_id
    }

    fn table_id(&self) -> Option<CatalogId> {
        None
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TableKind {
        TableKind::Temp
    }

    fn schema(&self) -> Option<&Arc<TupleSchema>> {
        Some(&self.schema)
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn active_tuple_count(&self) -> usize {
        self.storage.len()
    }

    fn insert_tuple(&mut self, tuple: Tuple) -> TableResult<RowId> {
        self.schema.validate(&tuple)?;

        if self.storage.next_row_id().is_none() {
            return Err(self.full_error());
        }

        let bytes = self.row_bytes();
        if let Err(err) = self.budget.try_reserve(bytes) {
            warn!(table = %self.name, requested = bytes, error = %err, "temp table memory budget exhausted");
            return Err(err);
        }
        let Some(row) = self.storage.insert(tuple) else {
            self.budget.release(bytes);
            return Err(self.full_error());
        };
        self.reserved += bytes;
        trace!(table = %self.name, %row, remaining = self.budget.remaining(), "temp tuple inserted");
        Ok(row)
    }

    fn delete_tuple(&mut self, row: RowId) -> TableResult<Tuple> {
        let tuple = self.storage.remove(row).ok_or(TableError::TupleNotFound(row))?;
        let bytes = self.row_bytes();
        self.reserved -= bytes;
        self.budget.release(bytes);
        Ok(tuple)
    }

    fn update_tuple(&mut self, row: RowId, tuple: Tuple) -> TableResult<Tuple> {
        self.schema.validate(&tuple)?;
        self.storage
            .replace(row, tuple)
            .ok_or(TableError::TupleNotFound(row))
    }

    fn get_tuple(&self, row: RowId) -> Option<&Tuple> {
        self.storage.get(row)
    }

    fn tuples(&self) -> Box<dyn Iterator<Item = (RowId, &Tuple)> + '_> {
        Box::new(self.storage.iter())
    }

    fn index_count(&self) -> usize {
        0
    }

    fn delete_all_tuples(&mut self) -> TableResult<usize> {
        let count = self.storage.len();
        self.storage.clear();
        self.budget.release(self.reserved);
        self.reserved = 0;
        Ok(count)
    }
}

impl Drop for TempTable {
    fn drop(&mut self) {
        if self.reserved > 0 {
            self.budget.release(self.reserved);
            self.reserved = 0;
        }
    }
}
