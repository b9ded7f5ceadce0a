//! Execution context handed to durable tables

use crate::types::{PartitionId, SiteId};
use crate::undo::{InMemoryUndoLog, UndoLog, UndoRecord};
use std::fmt;
use std::sync::Arc;

/// Handle on the executing site.
///
/// Durable tables keep one and append an undo record through it for
/// every row change. The table layer does not look any further inside.
pub struct ExecutorContext {
    site_id: SiteId,
    partition_id: PartitionId,
    undo_log: Arc<dyn UndoLog>,
}

impl ExecutorContext {
    pub fn new(site_id: SiteId, partition_id: PartitionId, undo_log: Arc<dyn UndoLog>) -> Self {
        Self {
            site_id,
            partition_id,
            undo_log,
        }
    }

    /// Context backed by a fresh [`InMemoryUndoLog`], returned alongside
    pub fn in_memory(site_id: SiteId, partition_id: PartitionId) -> (Arc<Self>, Arc<InMemoryUndoLog>) {
        let log = Arc::new(InMemoryUndoLog::new());
        let ctx = Arc::new(Self::new(site_id, partition_id, log.clone()));
        (ctx, log)
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    pub fn partition_id(&self) -> PartitionId {
        self.partition_id
    }

    pub fn undo_log(&self) -> &Arc<dyn UndoLog> {
        &self.undo_log
    }

    pub(crate) fn register_undo(&self, record: UndoRecord) {
        self.undo_log.append(record);
    }
}

impl fmt::Debug for ExecutorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorContext")
            .field("site_id", &self.site_id)
            .field("partition_id", &self.partition_id)
            .finish_non_exhaustive()
    }
}
