use std::path::PathBuf;

use anyhow::Result;
use tsundoku_core::model::{QueueItem, Status};
use tsundoku_core::queue::{order, QueueError, QueueRepository};

use super::JsonFile;

/// Reading queue persisted as one JSON document.
pub struct FileQueueRepository {
    file: JsonFile<QueueItem>,
}

impl FileQueueRepository {
    /// Opens or creates the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            file: JsonFile::open(path)?,
        })
    }
}

impl QueueRepository for FileQueueRepository {
    fn get(&self, id: &str) -> Result<QueueItem, QueueError> {
        self.file
            .read(|items| items.get(id).cloned())?
            .ok_or(QueueError::NotFound)
    }

    fn upsert(&self, item: &QueueItem) -> Result<(), QueueError> {
        self.file.update(|items| {
            items.insert(item.id.clone(), item.clone());
        })?;
        Ok(())
    }

    fn list(&self, status: Option<Status>) -> Result<Vec<QueueItem>, QueueError> {
        let mut out = self.file.read(|items| {
            items
                .values()
                .filter(|it| status.map_or(true, |s| it.status == s))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        order::sort_queue(&mut out);
        Ok(out)
    }

    fn find_oldest_stacked(&self) -> Result<QueueItem, QueueError> {
        self.file
            .read(|items| order::oldest_stacked(items.values()).cloned())?
            .ok_or(QueueError::NoStackedItems)
    }

    fn find_newest_stacked(&self) -> Result<QueueItem, QueueError> {
        self.file
            .read(|items| order::newest_stacked(items.values()).cloned())?
            .ok_or(QueueError::NoStackedItems)
    }
}
