//! Memtable: in-memory table layer with durable and transient tables

// Global type definitions
pub mod types;

// Import various modules
pub mod config;
pub mod executor;
pub mod index;
pub mod logging;
pub mod schema;
pub mod table;
pub mod tuple;
pub mod undo;

// Re-export table items for easier access
pub use table::{MemoryBudget, PersistentTable, Table, TableDefinition, TableError, TableFactory, TableResult, TempTable};

// Re-export schema and row items
pub use schema::TupleSchema;
pub use tuple::{Tuple, Value};

// Re-export index items
pub use index::{IndexFactory, IndexType, TableIndexScheme};
