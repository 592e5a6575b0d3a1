//! Google Books catalog client.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tsundoku_core::books::{CatalogClient, PAGE_SIZE};
use tsundoku_core::model::{Book, SearchParams, SearchResult};

/// Public volumes endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Upper bound on the upstream body quoted in an error.
const ERROR_BODY_LIMIT: usize = 4096;

/// [`CatalogClient`] over the Google Books volumes API.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    /// `base_url` of `None` (or blank) targets the public API.
    pub fn new(base_url: Option<&str>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let raw = base_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw).with_context(|| format!("invalid books base url {raw:?}"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Request URL for one search.
    pub fn build_url(&self, params: &SearchParams) -> Result<Url> {
        let query = params.query.trim();
        if query.is_empty() {
            bail!("search query is required");
        }

        let max_results = match params.max_results {
            0 => PAGE_SIZE,
            n => n.min(PAGE_SIZE),
        };
        let lang = params.lang.trim();

        let mut pairs: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("printType", "books".to_string()),
            ("orderBy", params.order_by.as_str().to_string()),
            ("startIndex", params.start_index.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if !lang.is_empty() && lang != "all" {
            pairs.push(("langRestrict", lang.to_string()));
        }
        if let Some(key) = &self.api_key {
            pairs.push(("key", key.clone()));
        }

        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url)
    }
}

impl CatalogClient for GoogleBooksClient {
    async fn search(&self, params: SearchParams) -> Result<SearchResult> {
        let url = self.build_url(&params)?;
        let mut resp = self
            .http
            .get(url)
            .send()
            .await
            .context("books request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_capped(&mut resp, ERROR_BODY_LIMIT)
                .await
                .with_context(|| format!("books api returned {status}"))?;
            bail!(
                "books api returned {status}: {}",
                String::from_utf8_lossy(&body).trim()
            );
        }

        let volumes: VolumesResponse = resp.json().await.context("books decode")?;
        tracing::debug!(
            query = %params.query,
            total = volumes.total_items,
            returned = volumes.items.len(),
            "books search"
        );
        Ok(volumes.into())
    }
}

/// Reads at most `limit` bytes of the body, leaving the rest unread.
async fn read_capped(resp: &mut reqwest::Response, limit: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while buf.len() < limit {
        let Some(chunk) = resp.chunk().await.context("read error body")? else {
            break;
        };
        let take = chunk.len().min(limit - buf.len());
        buf.extend_from_slice(&chunk[..take]);
    }
    Ok(buf)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VolumesResponse {
    total_items: u32,
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Volume {
    id: String,
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VolumeInfo {
    title: String,
    authors: Vec<String>,
    published_date: String,
    description: String,
    categories: Vec<String>,
    page_count: u32,
    image_links: ImageLinks,
    info_link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageLinks {
    thumbnail: String,
}

impl From<Volume> for Book {
    fn from(v: Volume) -> Self {
        let info = v.volume_info;
        Book {
            id: v.id,
            title: info.title,
            authors: info.authors,
            published_date: info.published_date,
            description: info.description,
            categories: info.categories,
            page_count: info.page_count,
            thumbnail: info.image_links.thumbnail,
            info_link: info.info_link,
        }
    }
}

impl From<VolumesResponse> for SearchResult {
    fn from(r: VolumesResponse) -> Self {
        SearchResult {
            total_items: r.total_items,
            items: r.items.into_iter().map(Book::from).collect(),
        }
    }
}
