//! Hash index

use crate::index::{IndexKey, IndexMeta, IndexResult, IndexType, TableIndex};
use crate::tuple::Tuple;
use crate::types::RowId;
use std::collections::HashMap;
use xxhash_rust::xxh64::Xxh64Builder;

const HASH_SEED: u64 = 0;

/// Point-lookup index keyed by the projected columns
#[derive(Debug)]
pub struct HashIndex {
    meta: IndexMeta,
    entries: HashMap<IndexKey, Vec<RowId>, Xxh64Builder>,
    entry_count: usize,
}

impl HashIndex {
    pub(crate) fn new(meta: IndexMeta, capacity: usize) -> Self {
        Self {
            meta,
            entries: HashMap::with_capacity_and_hasher(capacity, Xxh64Builder::new(HASH_SEED)),
            entry_count: 0,
        }
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

impl TableIndex for HashIndex {
    fn name(&self) -> &str {
        &self.meta.name
    }

    fn index_type(&self) -> IndexType {
        IndexType::Hash
    }

    fn column_indices(&self) -> &[usize] {
        &self.meta.columns
    }

    fn is_unique(&self) -> bool {
        self.meta.unique
    }

    fn is_partial(&self) -> bool {
        self.meta.predicate.is_some()
    }

    fn covers(&self, tuple: &Tuple) -> bool {
        self.meta.covers(tuple)
    }

    fn add_entry(&mut self, tuple: &Tuple, row: RowId) -> IndexResult<()> {
        if !self.meta.covers(tuple) {
            return Ok(());
        }
        let key = self.key_for(tuple);
        self.meta.check_unique(&key, self.entries.get(&key))?;
        self.entries.entry(key).or_default().push(row);
        self.entry_count += 1;
        Ok(())
    }

    fn delete_entry(&mut self, tuple: &Tuple, row: RowId) -> bool {
        if !self.meta.covers(tuple) {
            return false;
        }
        let key = self.key_for(tuple);
        let Some(rows) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(pos) = rows.iter().position(|r| *r == row) else {
            return false;
        };
        rows.swap_remove(pos);
        if rows.is_empty() {
            self.entries.remove(&key);
        }
        self.entry_count -= 1;
        true
    }

    fn lookup(&self, key: &IndexKey) -> Vec<RowId> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    fn entry_count(&self) -> usize {
        self.entry_count
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.entry_count = 0;
    }
}
