//! Table factory
//!
//! Every table instance is created here. Columns, indexes, the primary
//! key and constraints of a persistent table are fixed at construction
//! and cannot be changed afterwards. Temp tables never have indexes or
//! constraints and their mutations are not undo-logged.
//!
//! Construction is all-or-nothing: when a request fails, indexes already
//! built for it are dropped and no table is returned. The factory does
//! not register tables anywhere; that is the caller's job.

use crate::config::EngineConfig;
use crate::executor::ExecutorContext;
use crate::index::{DefaultIndexFactory, IndexError, IndexFactory, TableIndex, TableIndexScheme};
use crate::schema::TupleSchema;
use crate::table::{Constraint, MemoryBudget, PersistentTable, Table, TableDefinition, TableError, TableResult, TempTable};
use crate::types::CatalogId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Construction authority for all tables
#[derive(Clone)]
pub struct TableFactory {
    index_factory: Arc<dyn IndexFactory>,
}

impl TableFactory {
    /// Factory using the [`DefaultIndexFactory`]
    pub fn new() -> Self {
        Self::with_index_factory(Arc::new(DefaultIndexFactory::new()))
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_index_factory(Arc::new(DefaultIndexFactory::with_config(config)))
    }

    /// Factory delegating index construction to `index_factory`
    pub fn with_index_factory(index_factory: Arc<dyn IndexFactory>) -> Self {
        Self { index_factory }
    }

    /// Creates an empty persistent table without indexes.
    pub fn persistent_table(&self, ctx: Arc<ExecutorContext>, def: TableDefinition) -> TableResult<PersistentTable> {
        self.build_persistent(ctx, def, None, Vec::new())
    }

    /// Creates an empty persistent table whose only index is its primary key.
    pub fn persistent_table_with_primary_key(
        &self,
        ctx: Arc<ExecutorContext>,
        def: TableDefinition,
        pkey: TableIndexScheme,
    ) -> TableResult<PersistentTable> {
        self.build_persistent(ctx, def, Some(pkey), Vec::new())
    }

    /// Creates an empty persistent table with the given indexes, in order.
    pub fn persistent_table_with_indexes(
        &self,
        ctx: Arc<ExecutorContext>,
        def: TableDefinition,
        indexes: Vec<TableIndexScheme>,
    ) -> TableResult<PersistentTable> {
        self.build_persistent(ctx, def, None, indexes)
    }

    /// Creates an empty persistent table with a primary key followed by
    /// the given indexes.
    pub fn persistent_table_with_primary_key_and_indexes(
        &self,
        ctx: Arc<ExecutorContext>,
        def: TableDefinition,
        pkey: TableIndexScheme,
        indexes: Vec<TableIndexScheme>,
    ) -> TableResult<PersistentTable> {
        self.build_persistent(ctx, def, Some(pkey), indexes)
    }

    /// Creates an empty temp table drawing on `budget`.
    pub fn temp_table(
        &self,
        database_id: CatalogId,
        name: &str,
        schema: Arc<TupleSchema>,
        column_names: Vec<String>,
        budget: &MemoryBudget,
    ) -> TableResult<TempTable> {
        Self::init_common(name, &schema, &column_names)?;

        debug!(table = name, columns = schema.column_count(), budget = budget.remaining(), "temp table created");
        Ok(TempTable::new(database_id, name.to_string(), schema, column_names, budget.clone()))
    }

    /// Creates an empty temp table shaped like `template`.
    ///
    /// The new table owns an independent copy of the template's schema and
    /// column names; indexes and constraints are not copied.
    pub fn copied_temp_table(
        &self,
        database_id: CatalogId,
        name: &str,
        template: &dyn Table,
        budget: &MemoryBudget,
    ) -> TableResult<TempTable> {
        let schema = template
            .schema()
            .ok_or_else(|| TableError::SchemaUnavailable(template.name().to_string()))?
            .duplicate();
        let column_names = template.column_names().to_vec();

        self.temp_table(database_id, name, schema, column_names, budget)
    }

    fn build_persistent(
        &self,
        ctx: Arc<ExecutorContext>,
        mut def: TableDefinition,
        pkey: Option<TableIndexScheme>,
        indexes: Vec<TableIndexScheme>,
    ) -> TableResult<PersistentTable> {
        let result = self.prepare_persistent(&mut def, pkey, indexes);
        let (built, primary_key) = match result {
            Ok(parts) => parts,
            Err(err) => {
                warn!(table = %def.name, table_id = def.table_id, error = %err, "persistent table construction failed");
                return Err(err);
            }
        };

        let constraints = Self::init_constraints(&built, primary_key);
        debug!(
            table = %def.name,
            table_id = def.table_id,
            database_id = def.database_id,
            indexes = built.len(),
            primary_key = ?primary_key,
            partition_column = ?def.partition_column,
            export_enabled = def.export_enabled,
            export_only = def.export_only,
            "persistent table created"
        );
        Ok(PersistentTable::new(def, ctx, built, primary_key, constraints))
    }

    // Validates the request and builds its indexes, primary key first.
    fn prepare_persistent(
        &self,
        def: &mut TableDefinition,
        pkey: Option<TableIndexScheme>,
        indexes: Vec<TableIndexScheme>,
    ) -> TableResult<(Vec<Box<dyn TableIndex>>, Option<usize>)> {
        Self::init_common(&def.name, &def.schema, &def.column_names)?;

        if let Some(column) = def.partition_column {
            if column >= def.schema.column_count() {
                return Err(TableError::InvalidPartitionColumn {
                    column,
                    column_count: def.schema.column_count(),
                });
            }
        }

        if def.export_only && !def.export_enabled {
            debug!(table = %def.name, "export-only implies export; enabling export");
            def.export_enabled = true;
        }

        let pkey_count = usize::from(pkey.is_some()) + indexes.iter().filter(|s| s.primary_key).count();
        if pkey_count > 1 {
            return Err(TableError::DuplicateKeyDefinition {
                table: def.name.clone(),
                count: pkey_count,
            });
        }

        let mut schemes = Vec::with_capacity(indexes.len() + 1);
        if let Some(mut pkey) = pkey {
            pkey.primary_key = true;
            schemes.push(pkey);
        }
        schemes.extend(indexes);

        let mut names = HashSet::with_capacity(schemes.len());
        for scheme in &schemes {
            Self::check_scheme(&def.schema, scheme)?;
            if !names.insert(scheme.name.as_str()) {
                return Err(TableError::IndexConstructionFailed {
                    index: scheme.name.clone(),
                    source: IndexError::Unsupported("duplicate index name".to_string()),
                });
            }
        }

        let primary_key = schemes.iter().position(|s| s.primary_key);
        let built = schemes
            .iter()
            .map(|scheme| {
                self.index_factory
                    .build_index(&def.schema, scheme)
                    .map_err(|source| TableError::IndexConstructionFailed {
                        index: scheme.name.clone(),
                        source,
                    })
            })
            .collect::<TableResult<Vec<_>>>()?;

        Ok((built, primary_key))
    }

    // Shared by every table kind: the schema and its column names must agree.
    fn init_common(name: &str, schema: &TupleSchema, column_names: &[String]) -> TableResult<()> {
        if schema.column_count() == 0 {
            return Err(TableError::InvalidSchema(format!(
                "table '{}' has no columns",
                name
            )));
        }
        if column_names.len() != schema.column_count() {
            return Err(TableError::InvalidSchema(format!(
                "table '{}' has {} columns but {} column names",
                name,
                schema.column_count(),
                column_names.len()
            )));
        }

        let mut seen = HashSet::with_capacity(column_names.len());
        for column in column_names {
            if column.is_empty() {
                return Err(TableError::InvalidSchema(format!(
                    "table '{}' has an unnamed column",
                    name
                )));
            }
            if !seen.insert(column.as_str()) {
                return Err(TableError::InvalidSchema(format!(
                    "column '{}' defined twice in table '{}'",
                    column, name
                )));
            }
        }
        Ok(())
    }

    // Checks the parts of a scheme the factory guarantees regardless of
    // the index service in use.
    fn check_scheme(schema: &TupleSchema, scheme: &TableIndexScheme) -> TableResult<()> {
        let reject = |source: IndexError| TableError::IndexConstructionFailed {
            index: scheme.name.clone(),
            source,
        };

        if scheme.columns.is_empty() {
            return Err(reject(IndexError::EmptyKey));
        }
        if let Some(&column) = scheme.columns.iter().find(|&&c| c >= schema.column_count()) {
            return Err(reject(IndexError::InvalidColumn {
                column,
                column_count: schema.column_count(),
            }));
        }
        if scheme.primary_key && !scheme.unique {
            return Err(reject(IndexError::Unsupported(
                "primary key index must be unique".to_string(),
            )));
        }
        Ok(())
    }

    // Constraints come only from the built indexes.
    fn init_constraints(indexes: &[Box<dyn TableIndex>], primary_key: Option<usize>) -> Vec<Constraint> {
        indexes
            .iter()
            .enumerate()
            .filter_map(|(pos, index)| {
                if Some(pos) == primary_key {
                    Some(Constraint::PrimaryKey(pos))
                } else if index.is_unique() {
                    Some(Constraint::Unique(pos))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for TableFactory {
    fn default() -> Self {
        Self::new()
    }
}
