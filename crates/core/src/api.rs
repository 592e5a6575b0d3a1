//! Request/response bodies shared by the HTTP layer and its clients.

use serde::{Deserialize, Serialize};

use crate::model::Book;

/// `POST /api/tsundoku`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddQueueItemRequest {
    /// Book snapshot to stack; `book.id` is required.
    #[serde(default)]
    pub book: Book,
    /// Free-form note, trimmed before storing.
    #[serde(default)]
    pub note: String,
    /// Optional user priority. Does not affect ordering.
    #[serde(default)]
    pub priority: Option<i32>,
}

/// `POST /api/tsundoku/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// One of `stacked`, `reading`, `done`, exactly.
    pub status: String,
}

/// `GET /api/tsundoku` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQueueQuery {
    /// Status filter; blank lists everything.
    #[serde(default)]
    pub status: Option<String>,
}

/// `POST /api/favorites`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    /// Book to favorite; `book.id` is required.
    #[serde(default)]
    pub book: Book,
}

/// `GET /api/technical-books` query string.
///
/// Numbers stay strings so malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Search terms. Required.
    #[serde(default)]
    pub q: Option<String>,
    /// 1-based page, ignored when `startIndex` is present.
    #[serde(default)]
    pub page: Option<String>,
    /// Explicit result offset.
    #[serde(default)]
    pub start_index: Option<String>,
    /// `newest` or `relevance` (default).
    #[serde(default)]
    pub order_by: Option<String>,
    /// Language restriction; `all` disables it.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure message.
    pub error: String,
}
