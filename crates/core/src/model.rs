//! Domain records shared by the services, the stores and the wire.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Book metadata as returned by the external catalog.
///
/// Immutable once fetched; queue and favorite items embed a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Book {
    /// Catalog identifier, reused as the item id in every collection.
    pub id: String,
    /// Volume title.
    pub title: String,
    /// Author names in catalog order.
    pub authors: Vec<String>,
    /// Publication date as given by the catalog (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    pub published_date: String,
    /// Publisher description.
    pub description: String,
    /// Catalog subject categories.
    pub categories: Vec<String>,
    /// Page count; 0 when unknown.
    pub page_count: u32,
    /// Cover thumbnail URL.
    pub thumbnail: String,
    /// Catalog page for the volume.
    pub info_link: String,
}

/// Lifecycle state of a reading queue item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Waiting in the queue.
    Stacked,
    /// Currently being read. At most one item may be in this state.
    Reading,
    /// Finished. Can be restacked.
    Done,
}

impl Status {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Stacked => "stacked",
            Status::Reading => "reading",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stacked" => Ok(Status::Stacked),
            "reading" => Ok(Status::Reading),
            "done" => Ok(Status::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One entry of the reading queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Same as `book.id`.
    pub id: String,
    /// Snapshot taken when the item was added.
    pub book: Book,
    /// User note; empty when absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    /// User priority; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Current lifecycle state.
    pub status: Status,
    /// FIFO key among stacked items.
    pub added_at: DateTime<Utc>,
    /// Last mutation.
    pub updated_at: DateTime<Utc>,
    /// First entry into `reading`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Last entry into `done`; cleared when the item leaves `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input for adding a book to the reading queue.
#[derive(Debug, Clone, Default)]
pub struct AddParams {
    /// Book to stack; its id becomes the item id.
    pub book: Book,
    /// User note.
    pub note: String,
    /// User priority.
    pub priority: Option<i32>,
}

/// A favorited book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    /// Same as `book.id`.
    pub id: String,
    /// Snapshot taken when favorited.
    pub book: Book,
    /// When the book was favorited.
    pub added_at: DateTime<Utc>,
}

/// Result ordering requested from the catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Catalog relevance ranking.
    #[default]
    Relevance,
    /// Most recently published first.
    Newest,
}

impl OrderBy {
    /// Lenient parse: anything other than `newest` means relevance.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("newest") => OrderBy::Newest,
            _ => OrderBy::Relevance,
        }
    }

    /// Wire name understood by the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Relevance => "relevance",
            OrderBy::Newest => "newest",
        }
    }
}

/// Catalog search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Search terms.
    pub query: String,
    /// Offset of the first result.
    pub start_index: u32,
    /// Page size, clamped by the client.
    pub max_results: u32,
    /// Result ordering.
    pub order_by: OrderBy,
    /// Language restriction; empty or `all` disables it.
    pub lang: String,
}

/// One page of catalog results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Total matches reported by the catalog.
    pub total_items: u32,
    /// This page of results.
    pub items: Vec<Book>,
}
