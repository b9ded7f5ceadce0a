//! Column layout entries of a tuple schema

use crate::types::ColumnType;

/// Layout of a single column inside a tuple
///
/// Column names are not part of the layout; tables keep them in a
/// parallel list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnInfo {
    /// Column data type
    column_type: ColumnType,
    /// Whether NULL values are allowed
    nullable: bool,
    /// Byte offset of the column inside the tuple (after the header)
    offset: usize,
}

impl ColumnInfo {
    pub(crate) fn new(column_type: ColumnType, nullable: bool, offset: usize) -> Self {
        Self {
            column_type,
            nullable,
            offset,
        }
    }

    /// Get column type
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Check if column is nullable
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Byte offset inside the tuple
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get storage size for this column
    pub fn size(&self) -> usize {
        self.column_type.size()
    }

    pub fn is_inlined(&self) -> bool {
        self.column_type.is_inlined()
    }
}
