//! Ordered index
//!
//! Keys are kept sorted, so besides point lookups the index answers
//! range lookups in key order.

use crate::index::{IndexKey, IndexMeta, IndexResult, IndexType, TableIndex};
use crate::tuple::Tuple;
use crate::types::RowId;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug)]
pub struct OrderedIndex {
    meta: IndexMeta,
    entries: BTreeMap<IndexKey, Vec<RowId>>,
    entry_count: usize,
}

impl OrderedIndex {
    pub(crate) fn new(meta: IndexMeta) -> Self {
        Self {
            meta,
            entries: BTreeMap::new(),
            entry_count: 0,
        }
    }

    /// Smallest key currently indexed
    pub fn first_key(&self) -> Option<&IndexKey> {
        self.entries.keys().next()
    }

    /// Largest key currently indexed
    pub fn last_key(&self) -> Option<&IndexKey> {
        self.entries.keys().next_back()
    }
}

impl TableIndex for OrderedIndex {
    fn name(&self) -> &str {
        &self.meta.name
    }

    fn index_type(&self) -> IndexType {
        IndexType::Ordered
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
        // Keep insertion order among duplicates.
        rows.remove(pos);
        if rows.is_empty() {
            self.entries.remove(&key);
        }
        self.entry_count -= 1;
        true
    }

    fn lookup(&self, key: &IndexKey) -> Vec<RowId> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    fn range_lookup(&self, lower: Bound<&IndexKey>, upper: Bound<&IndexKey>) -> IndexResult<Vec<RowId>> {
        if is_empty_range(lower, upper) {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .range::<IndexKey, _>((lower, upper))
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect())
    }

    fn entry_count(&self) -> usize {
        self.entry_count
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.entry_count = 0;
    }
}

// BTreeMap::range panics on inverted bounds.
fn is_empty_range(lower: Bound<&IndexKey>, upper: Bound<&IndexKey>) -> bool {
    match (lower, upper) {
        (Bound::Included(l), Bound::Included(u)) => l > u,
        (Bound::Included(l), Bound::Excluded(u))
        | (Bound::Excluded(l), Bound::Included(u))
        | (Bound::Excluded(l), Bound::Excluded(u)) => l >= u,
        _ => false,
    }
}
