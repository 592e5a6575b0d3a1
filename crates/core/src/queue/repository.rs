use crate::model::{QueueItem, Status};

use super::QueueError;

/// Persistence port for queue items, keyed by item id.
///
/// Implementations only store what they are given: they never invent ids or
/// timestamps. Listing and the oldest/newest queries follow
/// [`order`](super::order). Every method may fail with
/// [`QueueError::Storage`].
pub trait QueueRepository: Send + Sync {
    /// Fails with [`QueueError::NotFound`] if absent.
    fn get(&self, id: &str) -> Result<QueueItem, QueueError>;

    /// Insert or fully replace by id. No partial write may become visible.
    fn upsert(&self, item: &QueueItem) -> Result<(), QueueError>;

    /// All items, or those with `status`, in queue order.
    fn list(&self, status: Option<Status>) -> Result<Vec<QueueItem>, QueueError>;

    /// Fails with [`QueueError::NoStackedItems`] if nothing is stacked.
    fn find_oldest_stacked(&self) -> Result<QueueItem, QueueError>;

    /// Fails with [`QueueError::NoStackedItems`] if nothing is stacked.
    fn find_newest_stacked(&self) -> Result<QueueItem, QueueError>;
}
