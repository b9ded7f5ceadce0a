//! Tuple schema descriptor
//!
//! A [`TupleSchema`] describes the column layout of a tuple: types,
//! widths, nullability and byte offsets. Schemas are immutable once
//! built and are shared between a table and its indexes as
//! `Arc<TupleSchema>`. Cloning a table's shape goes through
//! [`TupleSchema::duplicate`], which hands out an independent copy.

pub mod column;

pub use column::ColumnInfo;

use crate::table::{TableError, TableResult};
use crate::tuple::Tuple;
use crate::types::{ColumnType, TUPLE_HEADER_SIZE};
use std::fmt;
use std::sync::Arc;

/// Immutable column layout of a tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleSchema {
    columns: Vec<ColumnInfo>,
    tuple_length: usize,
    uninlined_count: usize,
}

impl TupleSchema {
    /// Build a schema from `(type, nullable)` pairs in column order.
    ///
    /// Fails with `InvalidSchema` if no columns are given.
    pub fn new(columns: impl IntoIterator<Item = (ColumnType, bool)>) -> TableResult<Self> {
        let mut infos = Vec::new();
        let mut offset = TUPLE_HEADER_SIZE;
        for (column_type, nullable) in columns {
            infos.push(ColumnInfo::new(column_type, nullable, offset));
            offset += column_type.size();
        }

        if infos.is_empty() {
            return Err(TableError::InvalidSchema(
                "schema must have at least one column".to_string(),
            ));
        }

        let uninlined_count = infos.iter().filter(|c| !c.is_inlined()).count();
        Ok(Self {
            columns: infos,
            tuple_length: offset,
            uninlined_count,
        })
    }

    /// Convenience constructor returning a shared handle
    pub fn shared(columns: impl IntoIterator<Item = (ColumnType, bool)>) -> TableResult<Arc<Self>> {
        Self::new(columns).map(Arc::new)
    }

    /// Independent copy of this layout, never aliasing `self`
    pub fn duplicate(&self) -> Arc<TupleSchema> {
        Arc::new(self.clone())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnInfo> {
        self.columns.get(index)
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.columns.get(index).map(|c| c.column_type())
    }

    /// Fixed storage footprint of one tuple, header included
    pub fn tuple_length(&self) -> usize {
        self.tuple_length
    }

    /// Number of variable-length columns stored out of line
    pub fn uninlined_column_count(&self) -> usize {
        self.uninlined_count
    }

    /// Check that `tuple` has one conforming value per column.
    pub fn validate(&self, tuple: &Tuple) -> TableResult<()> {
        if tuple.len() != self.columns.len() {
            return Err(TableError::InvalidTuple(format!(
                "expected {} values, got {}",
                self.columns.len(),
                tuple.len()
            )));
        }

        for (idx, (value, column)) in tuple.values().iter().zip(&self.columns).enumerate() {
            if value.is_null() {
                if !column.is_nullable() {
                    return Err(TableError::InvalidTuple(format!(
                        "column {} is not nullable",
                        idx
                    )));
                }
            } else if !value.fits(column.column_type()) {
                return Err(TableError::InvalidTuple(format!(
                    "value {} does not fit column {} of type {}",
                    value,
                    idx,
                    column.column_type()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for TupleSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.is_nullable() {
                    c.column_type().to_string()
                } else {
                    format!("{} NOT NULL", c.column_type())
                }
            })
            .collect();
        write!(f, "[{}]", cols.join(", "))
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
