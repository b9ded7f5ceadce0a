use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use memtable::executor::ExecutorContext;
use memtable::index::{IndexType, TableIndexScheme};
use memtable::schema::TupleSchema;
use memtable::table::{MemoryBudget, PersistentTable, Table, TableDefinition, TableFactory};
use memtable::tuple;
use memtable::types::ColumnType;

// Test configuration
const ROWS_PER_ITERATION: usize = 1_000;
const KEY_SPACE: i64 = 1_000_000;

fn orders_schema() -> Arc<TupleSchema> {
    TupleSchema::shared([
        (ColumnType::BigInt, false),
        (ColumnType::Integer, false),
        (ColumnType::Varchar(32), true),
    ])
    .unwrap()
}

fn orders_def() -> TableDefinition {
    TableDefinition::builder(1, "orders")
        .schema(orders_schema())
        .columns(["id", "customer", "note"])
        .partition_column(0)
        .build()
        .unwrap()
}

fn orders_table(factory: &TableFactory) -> PersistentTable {
    let (ctx, _log) = ExecutorContext::in_memory(0, 0);
    factory
        .persistent_table_with_primary_key_and_indexes(
            ctx,
            orders_def(),
            TableIndexScheme::primary_key("pk_orders", vec![0]),
            vec![
                TableIndexScheme::new("ix_customer", vec![1]),
                TableIndexScheme::new("ix_customer_id", vec![1, 0]).with_type(IndexType::Ordered),
            ],
        )
        .unwrap()
}

// Benchmark table construction through the factory
pub fn bench_factory_construction(c: &mut Criterion) {
    let factory = TableFactory::new();
    let mut group = c.benchmark_group("FactoryConstruction");

    group.bench_function("PersistentWithIndexes", |b| {
        b.iter(|| black_box(orders_table(&factory)))
    });

    group.bench_function("Temp", |b| {
        let budget = MemoryBudget::new(usize::MAX);
        let names: Vec<String> = vec!["id".into(), "customer".into(), "note".into()];
        b.iter(|| black_box(factory.temp_table(1, "tmp", orders_schema(), names.clone(), &budget).unwrap()))
    });

    group.finish();
}

// Benchmark random-key inserts into an indexed persistent table
pub fn bench_persistent_insert(c: &mut Criterion) {
    let factory = TableFactory::new();
    let mut group = c.benchmark_group("PersistentInsert");

    group.bench_function("RandomKeys", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(42);
                let keys: Vec<i64> = (0..ROWS_PER_ITERATION).map(|_| rng.gen_range(0..KEY_SPACE)).collect();
                (orders_table(&factory), keys)
            },
            |(mut table, keys)| {
                for key in keys {
                    // Repeated keys are rejected by the primary key.
                    let _ = table.insert_tuple(tuple![key, (key % 97) as i32, "note"]);
                }
                table
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// Benchmark inserts into a budgeted temp table
pub fn bench_temp_insert(c: &mut Criterion) {
    let factory = TableFactory::new();
    let names: Vec<String> = vec!["id".into(), "customer".into(), "note".into()];
    let mut group = c.benchmark_group("TempInsert");

    group.bench_function("Sequential", |b| {
        b.iter_batched(
            || {
                let budget = MemoryBudget::new(usize::MAX);
                factory.temp_table(1, "tmp", orders_schema(), names.clone(), &budget).unwrap()
            },
            |mut table| {
                for i in 0..ROWS_PER_ITERATION as i64 {
                    table.insert_tuple(tuple![i, 1i32, "note"]).unwrap();
                }
                table
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_factory_construction, bench_persistent_insert, bench_temp_insert);
criterion_main!(benches);
