//! Durable (persistent) table
//!
//! A `PersistentTable` is only ever built by the table factory, which
//! fixes its schema, index set, primary-key designation and constraints
//! for the table's whole lifetime. Every row change updates all indexes
//! as one unit and appends an undo record to the executing context.

use crate::executor::ExecutorContext;
use crate::index::{IndexError, IndexKey, TableIndex};
use crate::schema::TupleSchema;
use crate::table::storage::RowStorage;
use crate::table::{Table, TableDefinition, TableError, TableKind, TableResult};
use crate::tuple::Tuple;
use crate::types::{CatalogId, PartitionId, RowId};
use crate::undo::{UndoAction, UndoRecord};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Constraint backed by one of the table's indexes
///
/// The payload is the position of the backing index in the table's
/// index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    PrimaryKey(usize),
    Unique(usize),
}

impl Constraint {
    pub fn index_position(&self) -> usize {
        match self {
            Constraint::PrimaryKey(pos) | Constraint::Unique(pos) => *pos,
        }
    }
}

pub struct PersistentTable {
    database_id: CatalogId,
    table_id: CatalogId,
    name: String,
    schema: Arc<TupleSchema>,
    column_names: Vec<String>,
    partition_column: Option<usize>,
    export_enabled: bool,
    export_only: bool,
    storage: RowStorage,
    indexes: Vec<Box<dyn TableIndex>>,
    primary_key: Option<usize>,
    constraints: Vec<Constraint>,
    ctx: Arc<ExecutorContext>,
}

impl PersistentTable {
    pub(super) fn new(
        def: TableDefinition,
        ctx: Arc<ExecutorContext>,
        indexes: Vec<Box<dyn TableIndex>>,
        primary_key: Option<usize>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            database_id: def.database_id,
            table_id: def.table_id,
            name: def.name,
            schema: def.schema,
            column_names: def.column_names,
            partition_column: def.partition_column,
            export_enabled: def.export_enabled,
            export_only: def.export_only,
            storage: RowStorage::new(),
            indexes,
            primary_key,
            constraints,
            ctx,
        }
    }

    pub fn catalog_id(&self) -> CatalogId {
        self.table_id
    }

    pub fn partition_column(&self) -> Option<usize> {
        self.partition_column
    }

    pub fn is_export_enabled(&self) -> bool {
        self.export_enabled
    }

    /// Export-only tables are append-only
    pub fn is_export_only(&self) -> bool {
        self.export_only
    }

    pub fn context(&self) -> &Arc<ExecutorContext> {
        &self.ctx
    }

    pub fn partition_id(&self) -> PartitionId {
        self.ctx.partition_id()
    }

    pub fn indexes(&self) -> impl Iterator<Item = &dyn TableIndex> + '_ {
        self.indexes.iter().map(|i| i.as_ref())
    }

    pub fn index(&self, name: &str) -> Option<&dyn TableIndex> {
        self.indexes().find(|i| i.name() == name)
    }

    pub fn primary_key_index(&self) -> Option<&dyn TableIndex> {
        self.primary_key.map(|pos| self.indexes[pos].as_ref())
    }

    /// Number of indexes enforcing uniqueness, primary key included
    pub fn unique_index_count(&self) -> usize {
        self.indexes.iter().filter(|i| i.is_unique()).count()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Find the row whose primary key equals `key`
    pub fn lookup_by_primary_key(&self, key: &IndexKey) -> Option<(RowId, &Tuple)> {
        let pk = self.primary_key_index()?;
        let row = pk.lookup(key).into_iter().next()?;
        self.storage.get(row).map(|t| (row, t))
    }

    /// Find the stored row equal to `tuple` on the primary key columns
    pub fn lookup_tuple(&self, tuple: &Tuple) -> Option<(RowId, &Tuple)> {
        let pk = self.primary_key_index()?;
        self.lookup_by_primary_key(&pk.key_for(tuple))
    }

    /// Reverse a mutation previously logged by this table.
    ///
    /// Records must be applied newest first. Nothing is logged.
    pub fn undo(&mut self, record: UndoRecord) -> TableResult<()> {
        if record.table_id != self.table_id {
            return Err(TableError::UnsupportedOperation {
                table: self.name.clone(),
                reason: format!("undo record belongs to table {}", record.table_id),
            });
        }

        match record.action {
            UndoAction::Insert { row, tuple } => {
                if self.storage.get(row) != Some(&tuple) {
                    return Err(TableError::TupleNotFound(row));
                }
                self.remove_from_indexes(&tuple, row);
                self.storage.remove(row);
            }
            UndoAction::Delete { row, tuple } => {
                if !self.storage.is_free(row) {
                    return Err(TableError::UnsupportedOperation {
                        table: self.name.clone(),
                        reason: format!("cannot restore {}: not a deleted row of this table", row),
                    });
                }
                self.schema.validate(&tuple)?;
                self.add_to_indexes(&tuple, row)?;
                let restored = self.storage.restore(row, tuple);
                debug_assert!(restored);
            }
            UndoAction::Update { row, before, after } => {
                if self.storage.get(row) != Some(&after) {
                    return Err(TableError::TupleNotFound(row));
                }
                self.replace_in_indexes(&after, &before, row)?;
                self.storage.replace(row, before);
            }
        }
        trace!(table = %self.name, "undo applied");
        Ok(())
    }

    /// One-line summary of the table
    pub fn debug(&self) -> String {
        let indexes: Vec<String> = self
            .indexes
            .iter()
            .map(|i| format!("{}:{}{}", i.name(), i.index_type(), if i.is_unique() { "/unique" } else { "" }))
            .collect();
        format!(
            "PersistentTable({}) id={} db={} rows={} schema={} indexes=[{}] pkey={} export={}{}",
            self.name,
            self.table_id,
            self.database_id,
            self.storage.len(),
            self.schema,
            indexes.join(", "),
            self.primary_key_index().map_or("none", |i| i.name()),
            self.export_enabled,
            if self.export_only { " (only)" } else { "" },
        )
    }

    fn ensure_mutable(&self, op: &str) -> TableResult<()> {
        if self.export_only {
            return Err(TableError::UnsupportedOperation {
                table: self.name.clone(),
                reason: format!("{} on export-only table", op),
            });
        }
        Ok(())
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

    fn mutation_error(&self, err: IndexError) -> TableError {
        match err {
            IndexError::UniqueViolation { index, key } => TableError::ConstraintViolation {
                table: self.name.clone(),
                index,
                key,
            },
            other => TableError::UnsupportedOperation {
                table: self.name.clone(),
                reason: other.to_string(),
            },
        }
    }

    // All or nothing: on failure the entries already added are removed.
    fn add_to_indexes(&mut self, tuple: &Tuple, row: RowId) -> TableResult<()> {
        for i in 0..self.indexes.len() {
            if let Err(err) = self.indexes[i].add_entry(tuple, row) {
                for applied in self.indexes[..i].iter_mut().rev() {
                    applied.delete_entry(tuple, row);
                }
                return Err(self.mutation_error(err));
            }
        }
        Ok(())
    }

    fn remove_from_indexes(&mut self, tuple: &Tuple, row: RowId) {
        for index in self.indexes.iter_mut() {
            index.delete_entry(tuple, row);
        }
    }

    // All or nothing: on failure the indexes already moved are moved back.
    fn replace_in_indexes(&mut self, old: &Tuple, new: &Tuple, row: RowId) -> TableResult<()> {
        for i in 0..self.indexes.len() {
            if let Err(err) = self.indexes[i].replace_entry(old, new, row) {
                for applied in self.indexes[..i].iter_mut().rev() {
                    let reverted = applied.replace_entry(new, old, row);
                    debug_assert!(reverted.is_ok());
                }
                return Err(self.mutation_error(err));
            }
        }
        Ok(())
    }
}

impl Table for PersistentTable {
    fn database_id(&self) -> CatalogId {
        self.database_id
    }

    fn table_id(&self) -> Option<CatalogId> {
        Some(self.table_id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TableKind {
        TableKind::Persistent
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

        let row = self.storage.next_row_id().ok_or_else(|| self.full_error())?;
        let record = UndoRecord::new(
            self.table_id,
            UndoAction::Insert {
                row,
                tuple: tuple.clone(),
            },
        );

        self.add_to_indexes(&tuple, row)?;
        let stored = self.storage.insert(tuple);
        debug_assert_eq!(stored, Some(row));
        self.ctx.register_undo(record);

        trace!(table = %self.name, %row, "tuple inserted");
        Ok(row)
    }

    fn delete_tuple(&mut self, row: RowId) -> TableResult<Tuple> {
        self.ensure_mutable("delete")?;
        let tuple = self
            .storage
            .get(row)
            .cloned()
            .ok_or(TableError::TupleNotFound(row))?;
        let record = UndoRecord::new(
            self.table_id,
            UndoAction::Delete {
                row,
                tuple: tuple.clone(),
            },
        );

        self.remove_from_indexes(&tuple, row);
        self.storage.remove(row);
        self.ctx.register_undo(record);

        trace!(table = %self.name, %row, "tuple deleted");
        Ok(tuple)
    }

    fn update_tuple(&mut self, row: RowId, tuple: Tuple) -> TableResult<Tuple> {
        self.ensure_mutable("update")?;
        self.schema.validate(&tuple)?;
        let before = self
            .storage
            .get(row)
            .cloned()
            .ok_or(TableError::TupleNotFound(row))?;
        let record = UndoRecord::new(
            self.table_id,
            UndoAction::Update {
                row,
                before: before.clone(),
                after: tuple.clone(),
            },
        );

        self.replace_in_indexes(&before, &tuple, row)?;
        self.storage.replace(row, tuple);
        self.ctx.register_undo(record);

        trace!(table = %self.name, %row, "tuple updated");
        Ok(before)
    }

    fn get_tuple(&self, row: RowId) -> Option<&Tuple> {
        self.storage.get(row)
    }

    fn tuples(&self) -> Box<dyn Iterator<Item = (RowId, &Tuple)> + '_> {
        Box::new(self.storage.iter())
    }

    fn index_count(&self) -> usize {
        self.indexes.len()
    }

    fn delete_all_tuples(&mut self) -> TableResult<usize> {
        self.ensure_mutable("delete")?;
        let rows = self.storage.row_ids();
        for &row in &rows {
            self.delete_tuple(row)?;
        }
        Ok(rows.len())
    }
}

impl fmt::Debug for PersistentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentTable")
            .field("database_id", &self.database_id)
            .field("table_id", &self.table_id)
            .field("name", &self.name)
            .field("rows", &self.storage.len())
            .field("indexes", &self.indexes.len())
            .field("primary_key", &self.primary_key)
            .field("export_enabled", &self.export_enabled)
            .field("export_only", &self.export_only)
            .finish_non_exhaustive()
    }
}
