//! Catalog search port.

use std::future::Future;

use crate::model::{SearchParams, SearchResult};

/// Results per page. The upstream catalog never returns more than this.
pub const PAGE_SIZE: u32 = 10;

/// External book catalog.
pub trait CatalogClient: Send + Sync {
    /// Runs one search request.
    fn search(
        &self,
        params: SearchParams,
    ) -> impl Future<Output = anyhow::Result<SearchResult>> + Send;
}

/// Book search over a catalog client.
pub struct BookService<C> {
    client: C,
}

impl<C: CatalogClient> BookService<C> {
    /// Wraps `client`.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Forwards one search to the catalog.
    pub async fn search(&self, params: SearchParams) -> anyhow::Result<SearchResult> {
        self.client.search(params).await
    }
}

/// Offset of the first result to fetch.
///
/// A present `start_index` wins (a malformed or negative one means 0);
/// otherwise the offset is derived from a 1-based `page`, which defaults to 1
/// when absent, malformed or not positive.
pub fn page_start(page: Option<&str>, start_index: Option<&str>) -> u32 {
    match start_index.filter(|s| !s.is_empty()) {
        Some(raw) => raw.trim().parse::<u32>().unwrap_or(0),
        None => {
            let page = page
                .and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|p| *p > 0)
                .unwrap_or(1);
            (page - 1).saturating_mul(PAGE_SIZE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Book;

    #[test]
    fn page_start_prefers_start_index() {
        assert_eq!(page_start(Some("3"), Some("7")), 7);
        assert_eq!(page_start(None, Some("0")), 0);
    }

    #[test]
    fn page_start_bad_start_index_is_zero() {
        assert_eq!(page_start(Some("3"), Some("-4")), 0);
        assert_eq!(page_start(Some("3"), Some("abc")), 0);
    }

    #[test]
    fn page_start_from_page() {
        assert_eq!(page_start(None, None), 0);
        assert_eq!(page_start(Some("1"), None), 0);
        assert_eq!(page_start(Some("3"), None), 20);
        assert_eq!(page_start(Some("0"), None), 0);
        assert_eq!(page_start(Some("nope"), Some("")), 0);
    }

    struct Canned;

    impl CatalogClient for Canned {
        async fn search(&self, params: SearchParams) -> anyhow::Result<SearchResult> {
            Ok(SearchResult {
                total_items: 1,
                items: vec![Book {
                    id: params.query,
                    ..Default::default()
                }],
            })
        }
    }

    #[tokio::test]
    async fn service_forwards_to_client() {
        let svc = BookService::new(Canned);
        let res = svc
            .search(SearchParams {
                query: "rust".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(res.total_items, 1);
        assert_eq!(res.items[0].id, "rust");
    }
}
