use std::fmt;

/// Global type definitions
///
/// Identifiers, constants and the column type catalogue shared by the
/// schema, index and table layers.
/// Catalog identifier (database id, table id), assigned by the catalog
pub type CatalogId = u32;

/// Site identifier of the executing engine
pub type SiteId = u32;

/// Partition identifier of the executing engine
pub type PartitionId = u32;

/// Size of the per-tuple header (status flags) in bytes
pub const TUPLE_HEADER_SIZE: usize = 1;

/// Variable-length columns declared wider than this are stored out of line
pub const UNINLINED_THRESHOLD: u32 = 64;

/// Default memory budget for temp tables (100MB)
pub const DEFAULT_TEMP_TABLE_MEMORY: usize = 100 * 1024 * 1024;

/// Default initial capacity for index entry maps
pub const DEFAULT_INDEX_CAPACITY: usize = 64;

/// Location of a row inside a table's row storage.
///
/// Row ids are stable for the lifetime of the row; a freed slot may be
/// handed out again by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u32);

impl RowId {
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// Slot number inside the row storage
    pub fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Column type enumeration for tuple schemas
///
/// Fixed-width types occupy their natural size inside a tuple;
/// variable-length types carry a 4 byte length prefix plus the declared
/// maximum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 64-bit floating point
    Double,
    /// Microseconds since the epoch
    Timestamp,
    /// Boolean
    Bool,
    /// Variable-length string with maximum length in bytes
    Varchar(u32),
    /// Variable-length binary with maximum length in bytes
    Varbinary(u32),
}

impl ColumnType {
    /// Returns the storage size in bytes for this column type.
    ///
    /// For variable-length types, returns the length prefix (4 bytes)
    /// plus the maximum length.
    pub fn size(&self) -> usize {
        match self {
            ColumnType::TinyInt | ColumnType::Bool => 1,
            ColumnType::SmallInt => 2,
            ColumnType::Integer => 4,
            ColumnType::BigInt | ColumnType::Double | ColumnType::Timestamp => 8,
            ColumnType::Varchar(max_len) | ColumnType::Varbinary(max_len) => 4 + *max_len as usize,
        }
    }

    /// Returns true if this is a variable-length type.
    pub fn is_variable_length(&self) -> bool {
        matches!(self, ColumnType::Varchar(_) | ColumnType::Varbinary(_))
    }

    /// Returns true if values of this type are kept inside the tuple.
    pub fn is_inlined(&self) -> bool {
        match self {
            ColumnType::Varchar(max_len) | ColumnType::Varbinary(max_len) => {
                *max_len <= UNINLINED_THRESHOLD
            }
            _ => true,
        }
    }

    /// Inclusive value range for the integer types.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            ColumnType::TinyInt => Some((i8::MIN as i64, i8::MAX as i64)),
            ColumnType::SmallInt => Some((i16::MIN as i64, i16::MAX as i64)),
            ColumnType::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            ColumnType::BigInt => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::TinyInt => write!(f, "TINYINT"),
            ColumnType::SmallInt => write!(f, "SMALLINT"),
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::BigInt => write!(f, "BIGINT"),
            ColumnType::Double => write!(f, "DOUBLE"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::Bool => write!(f, "BOOL"),
            ColumnType::Varchar(max_len) => write!(f, "VARCHAR({})", max_len),
            ColumnType::Varbinary(max_len) => write!(f, "VARBINARY({})", max_len),
        }
    }
}
