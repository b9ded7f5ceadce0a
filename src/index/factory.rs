//! Index construction service
//!
//! The table factory hands every scheme of a construction request to an
//! [`IndexFactory`] together with the table's schema, and receives either
//! a ready index or a descriptive [`IndexError`].

use crate::config::EngineConfig;
use crate::index::{HashIndex, IndexError, IndexMeta, IndexResult, IndexType, OrderedIndex, TableIndex, TableIndexScheme};
use crate::schema::TupleSchema;
use crate::types::DEFAULT_INDEX_CAPACITY;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Builds live indexes from schemes
pub trait IndexFactory: Send + Sync {
    fn build_index(&self, schema: &Arc<TupleSchema>, scheme: &TableIndexScheme) -> IndexResult<Box<dyn TableIndex>>;
}

/// Default construction service producing [`HashIndex`] and [`OrderedIndex`]
#[derive(Debug, Clone)]
pub struct DefaultIndexFactory {
    initial_capacity: usize,
}

impl DefaultIndexFactory {
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INDEX_CAPACITY,
        }
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            initial_capacity: config.index_initial_capacity,
        }
    }

    /// Check a scheme against the schema it will index.
    pub fn validate(schema: &TupleSchema, scheme: &TableIndexScheme) -> IndexResult<()> {
        if scheme.columns.is_empty() {
            return Err(IndexError::EmptyKey);
        }

        let mut seen = HashSet::with_capacity(scheme.columns.len());
        for &column in &scheme.columns {
            if column >= schema.column_count() {
                return Err(IndexError::InvalidColumn {
                    column,
                    column_count: schema.column_count(),
                });
            }
            if !seen.insert(column) {
                return Err(IndexError::DuplicateColumn(column));
            }
        }

        if scheme.primary_key {
            if !scheme.unique {
                return Err(IndexError::Unsupported(
                    "primary key index must be unique".to_string(),
                ));
            }
            if scheme.is_partial() {
                return Err(IndexError::Unsupported(
                    "primary key index cannot be partial".to_string(),
                ));
            }
            if let Some(&column) = scheme
                .columns
                .iter()
                .find(|&&c| schema.column(c).is_some_and(|info| info.is_nullable()))
            {
                return Err(IndexError::Unsupported(format!(
                    "primary key column {} is nullable",
                    column
                )));
            }
        }
        Ok(())
    }
}

impl Default for DefaultIndexFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexFactory for DefaultIndexFactory {
    fn build_index(&self, schema: &Arc<TupleSchema>, scheme: &TableIndexScheme) -> IndexResult<Box<dyn TableIndex>> {
        Self::validate(schema, scheme)?;

        let meta = IndexMeta::from_scheme(scheme);
        debug!(
            index = %scheme.name,
            index_type = %scheme.index_type,
            columns = ?scheme.columns,
            unique = scheme.unique,
            partial = scheme.is_partial(),
            "building index"
        );
        Ok(match scheme.index_type {
            IndexType::Hash => Box::new(HashIndex::new(meta, self.initial_capacity)),
            IndexType::Ordered => Box::new(OrderedIndex::new(meta)),
        })
    }
}
