//! Temp table memory budget

use crate::config::EngineConfig;
use crate::table::{TableError, TableResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bytes remaining for the temp tables of one execution scope.
///
/// Clones share the same cell: the scope keeps one handle and every temp
/// table created in it keeps another. Reservations never take the
/// remaining value below zero.
#[derive(Debug, Clone)]
pub struct MemoryBudget {
    remaining: Arc<AtomicUsize>,
    limit: usize,
}

impl MemoryBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            remaining: Arc::new(AtomicUsize::new(limit)),
            limit,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.temp_table_memory_limit)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn used(&self) -> usize {
        self.limit.saturating_sub(self.remaining())
    }

    /// Take `bytes` out of the budget, or fail with `OutOfMemory`
    /// leaving it untouched.
    pub fn try_reserve(&self, bytes: usize) -> TableResult<()> {
        let mut current = self.remaining.load(Ordering::Acquire);
        loop {
            if current < bytes {
                return Err(TableError::OutOfMemory {
                    requested: bytes,
                    remaining: current,
                });
            }
            match self.remaining.compare_exchange_weak(
                current,
                current - bytes,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Give `bytes` back to the budget
    pub fn release(&self, bytes: usize) {
        self.remaining.fetch_add(bytes, Ordering::AcqRel);
    }

    /// Whether two handles refer to the same cell
    pub fn shares_cell_with(&self, other: &MemoryBudget) -> bool {
        Arc::ptr_eq(&self.remaining, &other.remaining)
    }
}
