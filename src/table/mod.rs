//! Table module: table kinds and their factory
//!
//! This module implements the table layer with the following features:
//! - [`TableFactory`]: the only way to obtain a table instance
//! - [`PersistentTable`]: durable table with fixed indexes, constraints and undo logging
//! - [`TempTable`]: transient table bounded by a shared [`MemoryBudget`]
//! - [`Table`]: the capability surface shared by both kinds

pub mod budget;
pub mod builder;
pub mod error;
pub mod factory;
pub mod persistent;
pub(crate) mod storage;
pub mod temp;

pub use budget::MemoryBudget;
pub use builder::{TableDefinition, TableDefinitionBuilder};
pub use error::{TableError, TableResult};
pub use factory::TableFactory;
pub use persistent::{Constraint, PersistentTable};
pub use temp::TempTable;

use crate::schema::TupleSchema;
use crate::tuple::Tuple;
use crate::types::{CatalogId, RowId};
use std::fmt;
use std::sync::Arc;

/// Table kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Durable table, mutations are undo-logged
    Persistent,
    /// Transient table, no indexes and no undo logging
    Temp,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Persistent => write!(f, "Persistent"),
            TableKind::Temp => write!(f, "Temp"),
        }
    }
}

/// Capability surface shared by every table kind
///
/// Code that knows the kind works with the concrete type returned by the
/// factory; `&dyn Table` is for code generic over any table (for example
/// a template for [`TableFactory::copied_temp_table`]).
pub trait Table: fmt::Debug {
    fn database_id(&self) -> CatalogId;

    /// Catalog id; temp tables have none
    fn table_id(&self) -> Option<CatalogId>;

    fn name(&self) -> &str;

    fn kind(&self) -> TableKind;

    /// Schema of the table, if it exposes one
    fn schema(&self) -> Option<&Arc<TupleSchema>>;

    fn column_names(&self) -> &[String];

    /// Ordinal of the column called `name`
    fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|c| c == name)
    }

    fn column_count(&self) -> usize {
        self.schema().map_or(0, |s| s.column_count())
    }

    fn active_tuple_count(&self) -> usize;

    fn insert_tuple(&mut self, tuple: Tuple) -> TableResult<RowId>;

    /// Remove the row at `row`, returning its tuple
    fn delete_tuple(&mut self, row: RowId) -> TableResult<Tuple>;

    /// Replace the row at `row`, returning the previous tuple
    fn update_tuple(&mut self, row: RowId, tuple: Tuple) -> TableResult<Tuple>;

    fn get_tuple(&self, row: RowId) -> Option<&Tuple>;

    /// Live rows in storage order
    fn tuples(&self) -> Box<dyn Iterator<Item = (RowId, &Tuple)> + '_>;

    fn index_count(&self) -> usize;

    /// Remove every row, returning how many were removed
    fn delete_all_tuples(&mut self) -> TableResult<usize>;
}
