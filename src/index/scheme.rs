//! Index scheme descriptors
//!
//! A [`TableIndexScheme`] describes an index to be built: name, kind,
//! key columns, uniqueness and primary-key status, and an optional
//! partial-index predicate. Schemes are consumed by the table factory;
//! only the index built from them outlives construction.

use crate::tuple::Tuple;
use std::fmt;
use std::sync::Arc;

/// Physical index organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexType {
    /// Hash map keyed by the projected columns; point lookups only
    #[default]
    Hash,
    /// Ordered map keyed by the projected columns; supports range lookups
    Ordered,
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexType::Hash => write!(f, "HASH"),
            IndexType::Ordered => write!(f, "ORDERED"),
        }
    }
}

/// Row filter of a partial index: only rows for which it returns true
/// are indexed.
#[derive(Clone)]
pub struct IndexPredicate {
    description: String,
    filter: Arc<dyn Fn(&Tuple) -> bool + Send + Sync>,
}

impl IndexPredicate {
    pub fn new(description: impl Into<String>, filter: impl Fn(&Tuple) -> bool + Send + Sync + 'static) -> Self {
        Self {
            description: description.into(),
            filter: Arc::new(filter),
        }
    }

    pub fn matches(&self, tuple: &Tuple) -> bool {
        (self.filter)(tuple)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for IndexPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexPredicate")
            .field("description", &self.description)
            .finish()
    }
}

/// Specification of an index to be constructed
#[derive(Debug, Clone)]
pub struct TableIndexScheme {
    pub name: String,
    pub index_type: IndexType,
    /// Key column ordinals, in key order
    pub columns: Vec<usize>,
    pub unique: bool,
    pub primary_key: bool,
    pub predicate: Option<IndexPredicate>,
}

impl TableIndexScheme {
    /// Non-unique hash index over `columns`
    pub fn new(name: impl Into<String>, columns: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            index_type: IndexType::Hash,
            columns,
            unique: false,
            primary_key: false,
            predicate: None,
        }
    }

    /// Unique hash index over `columns`
    pub fn unique(name: impl Into<String>, columns: Vec<usize>) -> Self {
        Self {
            unique: true,
            ..Self::new(name, columns)
        }
    }

    /// Primary-key scheme: unique and flagged as primary key
    pub fn primary_key(name: impl Into<String>, columns: Vec<usize>) -> Self {
        Self {
            unique: true,
            primary_key: true,
            ..Self::new(name, columns)
        }
    }

    pub fn with_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    pub fn with_predicate(mut self, predicate: IndexPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn is_partial(&self) -> bool {
        self.predicate.is_some()
    }
}
