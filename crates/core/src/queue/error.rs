use thiserror::Error;

/// Failure kinds raised by the queue service and its repositories.
#[derive(Debug, Error)]
pub enum QueueError {
    /// An item with this id is already queued and not done.
    #[error("tsundoku item already exists")]
    AlreadyExists,
    /// No item with the given id.
    #[error("tsundoku item not found")]
    NotFound,
    /// Nothing is waiting in the queue.
    #[error("no stacked items available")]
    NoStackedItems,
    /// Unknown status, or the item is in the wrong state for the transition.
    #[error("invalid tsundoku status")]
    InvalidStatus,
    /// Missing book id.
    #[error("invalid tsundoku input")]
    InvalidInput,
    /// Another item is already being read.
    #[error("reading item already in progress")]
    ReadingInProgress,
    /// Persistence failure; passed through untouched.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
