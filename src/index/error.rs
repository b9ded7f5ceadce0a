//! Index error definitions

use thiserror::Error;

/// Errors raised by index construction and index maintenance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    /// Scheme names no columns
    #[error("index key must have at least one column")]
    EmptyKey,

    /// Scheme references a column outside the schema
    #[error("column {column} out of range for schema with {column_count} columns")]
    InvalidColumn { column: usize, column_count: usize },

    /// Scheme lists the same column twice
    #[error("column {0} listed more than once")]
    DuplicateColumn(usize),

    /// Combination of index type, flags and column types is not supported
    #[error("unsupported index definition: {0}")]
    Unsupported(String),

    /// A unique index already holds the key
    #[error("unique key {key} already present in index '{index}'")]
    UniqueViolation { index: String, key: String },
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
