//! Table definitions for the table factory
//!
//! A [`TableDefinition`] bundles everything about a durable table that
//! is not an index: catalog identity, name, schema, column names,
//! partitioning and export flags. It is assembled with the fluent
//! [`TableDefinitionBuilder`].

use crate::schema::TupleSchema;
use crate::table::{TableError, TableResult};
use crate::types::CatalogId;
use std::sync::Arc;

/// Identity, layout and flags of a durable table
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub database_id: CatalogId,
    pub table_id: CatalogId,
    pub name: String,
    pub schema: Arc<TupleSchema>,
    pub column_names: Vec<String>,
    /// Column whose value decides the owning partition; `None` if not partitioned
    pub partition_column: Option<usize>,
    pub export_enabled: bool,
    pub export_only: bool,
}

impl TableDefinition {
    pub fn builder(table_id: CatalogId, name: impl Into<String>) -> TableDefinitionBuilder {
        TableDefinitionBuilder::new(table_id, name)
    }
}

/// Builder for [`TableDefinition`]
///
/// # Example
/// ```
/// use memtable::schema::TupleSchema;
/// use memtable::table::TableDefinition;
/// use memtable::types::ColumnType;
///
/// let schema = TupleSchema::shared([(ColumnType::BigInt, false), (ColumnType::Varchar(32), true)]).unwrap();
/// let def = TableDefinition::builder(7, "users")
///     .database_id(1)
///     .schema(schema)
///     .column("id")
///     .column("name")
///     .partition_column(0)
///     .build()
///     .unwrap();
/// assert_eq!(def.column_names, vec!["id", "name"]);
/// ```
#[derive(Debug)]
pub struct TableDefinitionBuilder {
    database_id: CatalogId,
    table_id: CatalogId,
    name: String,
    schema: Option<Arc<TupleSchema>>,
    column_names: Vec<String>,
    partition_column: Option<usize>,
    export_enabled: bool,
    export_only: bool,
}

impl TableDefinitionBuilder {
    pub fn new(table_id: CatalogId, name: impl Into<String>) -> Self {
        Self {
            database_id: 0,
            table_id,
            name: name.into(),
            schema: None,
            column_names: Vec::new(),
            partition_column: None,
            export_enabled: false,
            export_only: false,
        }
    }

    pub fn database_id(mut self, database_id: CatalogId) -> Self {
        self.database_id = database_id;
        self
    }

    pub fn schema(mut self, schema: Arc<TupleSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Append one column name
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column_names.push(name.into());
        self
    }

    /// Append several column names at once
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn partition_column(mut self, column: usize) -> Self {
        self.partition_column = Some(column);
        self
    }

    pub fn export_enabled(mut self, enabled: bool) -> Self {
        self.export_enabled = enabled;
        self
    }

    pub fn export_only(mut self, export_only: bool) -> Self {
        self.export_only = export_only;
        self
    }

    /// Build the definition
    ///
    /// Consistency between schema, names and partition column is checked
    /// by the table factory; here only the mandatory parts are enforced.
    pub fn build(self) -> TableResult<TableDefinition> {
        let schema = self
            .schema
            .ok_or_else(|| TableError::InvalidSchema("schema must be set".to_string()))?;

        if self.name.is_empty() {
            return Err(TableError::InvalidSchema(
                "table name cannot be empty".to_string(),
            ));
        }

        Ok(TableDefinition {
            database_id: self.database_id,
            table_id: self.table_id,
            name: self.name,
            schema,
            column_names: self.column_names,
            partition_column: self.partition_column,
            export_enabled: self.export_enabled,
            export_only: self.export_only,
        })
    }
}
