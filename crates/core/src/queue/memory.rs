use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::model::{QueueItem, Status};

use super::{order, QueueError, QueueRepository};

/// In-memory queue storage. Not durable; used by tests and as the reference
/// for the repository contract. One lock serializes every call.
#[derive(Debug, Default)]
pub struct InMemoryQueueRepository {
    items: Mutex<HashMap<String, QueueItem>>,
}

impl InMemoryQueueRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, QueueItem>>, QueueError> {
        self.items
            .lock()
            .map_err(|_| QueueError::Storage(anyhow!("queue store lock poisoned")))
    }
}

impl QueueRepository for InMemoryQueueRepository {
    fn get(&self, id: &str) -> Result<QueueItem, QueueError> {
        self.lock()?.get(id).cloned().ok_or(QueueError::NotFound)
    }

    fn upsert(&self, item: &QueueItem) -> Result<(), QueueError> {
        self.lock()?.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn list(&self, status: Option<Status>) -> Result<Vec<QueueItem>, QueueError> {
        let items = self.lock()?;
        let mut out: Vec<QueueItem> = items
            .values()
            .filter(|it| status.map_or(true, |s| it.status == s))
            .cloned()
            .collect();
        order::sort_queue(&mut out);
        Ok(out)
    }

    fn find_oldest_stacked(&self) -> Result<QueueItem, QueueError> {
        let items = self.lock()?;
        order::oldest_stacked(items.values())
            .cloned()
            .ok_or(QueueError::NoStackedItems)
    }

    fn find_newest_stacked(&self) -> Result<QueueItem, QueueError> {
        let items = self.lock()?;
        order::newest_stacked(items.values())
            .cloned()
            .ok_or(QueueError::NoStackedItems)
    }
}
