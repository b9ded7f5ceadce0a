//! Memtable demo entry
//!
//! Usage: `memtable [config.json]`

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use memtable::config::EngineConfig;
use memtable::executor::ExecutorContext;
use memtable::index::{IndexType, TableIndexScheme};
use memtable::table::{MemoryBudget, Table, TableDefinition, TableError, TableFactory};
use memtable::types::ColumnType;
use memtable::{logging, tuple, TupleSchema};
use std::process::ExitCode;
use tracing::{error, info};

fn run(config: &EngineConfig) -> Result<(), TableError> {
    let factory = TableFactory::from_config(config);
    let budget = MemoryBudget::from_config(config);
    let (ctx, undo_log) = ExecutorContext::in_memory(0, 0);

    let schema = TupleSchema::shared([(ColumnType::BigInt, false), (ColumnType::Varchar(32), true)])?;
    let def = TableDefinition::builder(1, "users")
        .schema(schema)
        .columns(["id", "name"])
        .partition_column(0)
        .build()?;
    let mut users = factory.persistent_table_with_primary_key_and_indexes(
        ctx,
        def,
        TableIndexScheme::primary_key("pk_users", vec![0]),
        vec![TableIndexScheme::new("ix_name", vec![1]).with_type(IndexType::Ordered)],
    )?;

    users.insert_tuple(tuple![1i64, "alice"])?;
    users.insert_tuple(tuple![2i64, "bob"])?;
    if let Err(e) = users.insert_tuple(tuple![1i64, "carol"]) {
        info!(error = %e, "duplicate key rejected");
    }
    println!("{}", users.debug());
    println!("undo records: {}", undo_log.len());

    let mut scratch = factory.copied_temp_table(1, "users_scratch", &users, &budget)?;
    for (_, row) in users.tuples() {
        scratch.insert_tuple(row.clone())?;
    }
    println!(
        "{}: {} rows, {} of {} budget bytes in use",
        scratch.name(),
        scratch.active_tuple_count(),
        budget.used(),
        budget.limit()
    );
    Ok(())
}

fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    logging::init(&config);

    println!("Memtable starting...");
    match run(&config) {
        Ok(()) => {
            println!("Memtable demo completed!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}
