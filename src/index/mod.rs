//! Live table indexes
//!
//! This module implements the index side of a table:
//! - [`TableIndexScheme`]: what to build (columns, uniqueness, primary key, predicate)
//! - [`IndexFactory`]: the construction service turning a scheme into a live index
//! - [`TableIndex`]: the maintenance surface durable tables drive on every row change
//! - [`HashIndex`] / [`OrderedIndex`]: the default implementations

pub mod error;
pub mod factory;
pub mod hash;
pub mod ordered;
pub mod scheme;

pub use error::{IndexError, IndexResult};
pub use factory::{DefaultIndexFactory, IndexFactory};
pub use hash::HashIndex;
pub use ordered::OrderedIndex;
pub use scheme::{IndexPredicate, IndexType, TableIndexScheme};

use crate::tuple::{Tuple, Value};
use crate::types::RowId;
use std::fmt;
use std::ops::Bound;

/// Projected key of a row inside an index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexKey(Vec<Value>);

impl IndexKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Keys containing NULL never collide in a unique index
    pub fn has_null(&self) -> bool {
        self.0.iter().any(Value::is_null)
    }
}

impl From<Vec<Value>> for IndexKey {
    fn from(values: Vec<Value>) -> Self {
        IndexKey(values)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vals: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "({})", vals.join(", "))
    }
}

/// Maintenance and lookup surface of a live index.
///
/// Implementations must leave themselves unchanged when an operation
/// returns an error.
pub trait TableIndex: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn index_type(&self) -> IndexType;

    /// Key column ordinals, in key order
    fn column_indices(&self) -> &[usize];

    fn is_unique(&self) -> bool;

    fn is_partial(&self) -> bool;

    /// Whether `tuple` belongs in this index (partial-index predicate)
    fn covers(&self, tuple: &Tuple) -> bool;

    /// Add the entry for `tuple` stored at `row`.
    ///
    /// Fails with `UniqueViolation` if a unique index already holds the key.
    fn add_entry(&mut self, tuple: &Tuple, row: RowId) -> IndexResult<()>;

    /// Remove the entry for `tuple` stored at `row`; returns false if absent.
    fn delete_entry(&mut self, tuple: &Tuple, row: RowId) -> bool;

    /// Move `row` from the key of `old` to the key of `new`.
    fn replace_entry(&mut self, old: &Tuple, new: &Tuple, row: RowId) -> IndexResult<()> {
        let removed = self.delete_entry(old, row);
        if let Err(e) = self.add_entry(new, row) {
            if removed {
                // The old key was just vacated by this row.
                let restored = self.add_entry(old, row);
                debug_assert!(restored.is_ok());
            }
            return Err(e);
        }
        Ok(())
    }

    /// Rows stored under `key`
    fn lookup(&self, key: &IndexKey) -> Vec<RowId>;

    /// Rows whose key falls inside the given bounds, in key order
    fn range_lookup(&self, lower: Bound<&IndexKey>, upper: Bound<&IndexKey>) -> IndexResult<Vec<RowId>> {
        let _ = (lower, upper);
        Err(IndexError::Unsupported(format!(
            "{} index '{}' does not support range lookups",
            self.index_type(),
            self.name()
        )))
    }

    /// Number of (key, row) entries
    fn entry_count(&self) -> usize;

    fn clear(&mut self);

    fn key_for(&self, tuple: &Tuple) -> IndexKey {
        IndexKey::new(tuple.project(self.column_indices()))
    }
}

/// Definition shared by the default index implementations
#[derive(Debug)]
pub(crate) struct IndexMeta {
    pub(crate) name: String,
    pub(crate) columns: Vec<usize>,
    pub(crate) unique: bool,
    pub(crate) predicate: Option<IndexPredicate>,
}

impl IndexMeta {
    pub(crate) fn from_scheme(scheme: &TableIndexScheme) -> Self {
        Self {
            name: scheme.name.clone(),
            columns: scheme.columns.clone(),
            unique: scheme.unique,
            predicate: scheme.predicate.clone(),
        }
    }

    pub(crate) fn covers(&self, tuple: &Tuple) -> bool {
        self.predicate.as_ref().is_none_or(|p| p.matches(tuple))
    }

    /// Check a key against the rows already stored under it
    pub(crate) fn check_unique(&self, key: &IndexKey, existing: Option<&Vec<RowId>>) -> IndexResult<()> {
        if !self.unique || key.has_null() {
            return Ok(());
        }
        match existing {
            Some(rows) if !rows.is_empty() => Err(IndexError::UniqueViolation {
                index: self.name.clone(),
                key: key.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
