//! Table error definitions

use crate::index::IndexError;
use crate::types::RowId;
use thiserror::Error;

/// Table error types
///
/// Construction-time failures are reported before any table is handed
/// back. Mutation-time failures leave the table exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Schema is empty, disagrees with its column name list or is otherwise unusable
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Partition column does not exist in the schema
    #[error("Invalid partition column {column} for schema with {column_count} columns")]
    InvalidPartitionColumn { column: usize, column_count: usize },

    /// More than one index scheme claims primary-key status
    #[error("Duplicate primary key definition in table '{table}': {count} schemes marked primary key")]
    DuplicateKeyDefinition { table: String, count: usize },

    /// The index construction service rejected a scheme
    #[error("Failed to construct index '{index}': {source}")]
    IndexConstructionFailed {
        index: String,
        #[source]
        source: IndexError,
    },

    /// A unique or primary-key index rejected a row change
    #[error("Constraint violation on index '{index}' in table '{table}': key {key}")]
    ConstraintViolation {
        table: String,
        index: String,
        key: String,
    },

    /// A temp table's memory budget cannot absorb the row
    #[error("Out of temp table memory: requested {requested} bytes, {remaining} bytes remaining")]
    OutOfMemory { requested: usize, remaining: usize },

    /// A template table exposes no usable schema
    #[error("Schema unavailable for template table '{0}'")]
    SchemaUnavailable(String),

    /// Tuple does not conform to the table schema
    #[error("Invalid tuple: {0}")]
    InvalidTuple(String),

    /// Row id does not refer to a live row
    #[error("Tuple not found: {0}")]
    TupleNotFound(RowId),

    /// Every row id of the table is in use
    #[error("Table '{table}' is full: {capacity} row slots in use")]
    TableFull { table: String, capacity: usize },

    /// Operation not permitted on this table
    #[error("Unsupported operation on table '{table}': {reason}")]
    UnsupportedOperation { table: String, reason: String },
}

impl TableError {
    /// Returns true for business-rule failures (uniqueness), as opposed
    /// to systemic or caller errors.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, TableError::ConstraintViolation { .. })
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
