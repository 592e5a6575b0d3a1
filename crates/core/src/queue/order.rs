//! Queue ordering shared by every repository backend.
//!
//! Items sort by `added_at` ascending, ties by `id` ascending. "Oldest" and
//! "newest" stacked items are the two ends of that order, so a timestamp
//! collision still has exactly one answer on each side.

use std::cmp::Ordering;

use crate::model::{QueueItem, Status};

/// Total order over queue items.
pub fn queue_order(a: &QueueItem, b: &QueueItem) -> Ordering {
    a.added_at
        .cmp(&b.added_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts in place by [`queue_order`].
pub fn sort_queue(items: &mut [QueueItem]) {
    items.sort_by(queue_order);
}

/// First stacked item in queue order.
pub fn oldest_stacked<'a, I>(items: I) -> Option<&'a QueueItem>
where
    I: IntoIterator<Item = &'a QueueItem>,
{
    items
        .into_iter()
        .filter(|it| it.status == Status::Stacked)
        .min_by(|a, b| queue_order(a, b))
}

/// Last stacked item in queue order; on equal `added_at` the larger id wins.
pub fn newest_stacked<'a, I>(items: I) -> Option<&'a QueueItem>
where
    I: IntoIterator<Item = &'a QueueItem>,
{
    items
        .into_iter()
        .filter(|it| it.status == Status::Stacked)
        .max_by(|a, b| queue_order(a, b))
}
