use std::collections::HashMap;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tsundoku_core::books::CatalogClient;
use tsundoku_core::model::{OrderBy, SearchParams};
use tsundoku_daemon::googlebooks::{GoogleBooksClient, DEFAULT_BASE_URL};

fn params(query: &str) -> SearchParams {
    SearchParams {
        query: query.into(),
        ..Default::default()
    }
}

fn query_map(url: &reqwest::Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn build_url_defaults() {
    let client = GoogleBooksClient::new(None, None, Duration::from_secs(5)).unwrap();
    let url = client.build_url(&params("  rust async  ")).unwrap();

    assert!(url.as_str().starts_with(DEFAULT_BASE_URL));
    let q = query_map(&url);
    assert_eq!(q["q"], "rust async");
    assert_eq!(q["printType"], "books");
    assert_eq!(q["orderBy"], "relevance");
    assert_eq!(q["startIndex"], "0");
    assert_eq!(q["maxResults"], "10");
    assert!(!q.contains_key("langRestrict"));
    assert!(!q.contains_key("key"));
}

#[test]
fn build_url_optional_params() {
    let client = GoogleBooksClient::new(
        Some("http://localhost:1234/v1/volumes"),
        Some("secret".into()),
        Duration::from_secs(5),
    )
    .unwrap();
    let url = client
        .build_url(&SearchParams {
            query: "go".into(),
            start_index: 30,
            max_results: 40,
            order_by: OrderBy::Newest,
            lang: "ja".into(),
        })
        .unwrap();

    assert_eq!(url.host_str(), Some("localhost"));
    assert_eq!(url.path(), "/v1/volumes");
    let q = query_map(&url);
    assert_eq!(q["startIndex"], "30");
    assert_eq!(q["maxResults"], "10");
    assert_eq!(q["orderBy"], "newest");
    assert_eq!(q["langRestrict"], "ja");
    assert_eq!(q["key"], "secret");
}

#[test]
fn build_url_lang_all_and_small_page() {
    let client = GoogleBooksClient::new(None, Some("  ".into()), Duration::from_secs(5)).unwrap();
    let url = client
        .build_url(&SearchParams {
            query: "sql".into(),
            max_results: 3,
            lang: "all".into(),
            ..Default::default()
        })
        .unwrap();

    let q = query_map(&url);
    assert_eq!(q["maxResults"], "3");
    assert!(!q.contains_key("langRestrict"));
    assert!(!q.contains_key("key"));
}

#[test]
fn build_url_rejects_blank_query() {
    let client = GoogleBooksClient::new(None, None, Duration::from_secs(5)).unwrap();
    assert!(client.build_url(&params("   ")).is_err());
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(GoogleBooksClient::new(Some("not a url"), None, Duration::from_secs(5)).is_err());
}

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/volumes")
}

#[tokio::test]
async fn search_maps_volumes() {
    async fn volumes(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(q.get("q").map(String::as_str), Some("ownership"));
        Json(json!({
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {
                    "id": "a1",
                    "volumeInfo": {
                        "title": "The Rust Programming Language",
                        "authors": ["Steve Klabnik", "Carol Nichols"],
                        "publishedDate": "2019-08-12",
                        "description": "Official book",
                        "categories": ["Computers"],
                        "pageCount": 560,
                        "imageLinks": {"thumbnail": "http://img/a1"},
                        "infoLink": "http://info/a1"
                    }
                },
                {"id": "a2", "volumeInfo": {"title": "Sparse"}}
            ]
        }))
    }
    let base = spawn_stub(Router::new().route("/volumes", get(volumes))).await;
    let client = GoogleBooksClient::new(Some(&base), None, Duration::from_secs(2)).unwrap();

    let res = client.search(params("ownership")).await.unwrap();

    assert_eq!(res.total_items, 2);
    assert_eq!(res.items.len(), 2);
    let first = &res.items[0];
    assert_eq!(first.id, "a1");
    assert_eq!(first.authors, ["Steve Klabnik", "Carol Nichols"]);
    assert_eq!(first.published_date, "2019-08-12");
    assert_eq!(first.page_count, 560);
    assert_eq!(first.thumbnail, "http://img/a1");
    assert_eq!(first.info_link, "http://info/a1");

    let sparse = &res.items[1];
    assert_eq!(sparse.title, "Sparse");
    assert!(sparse.authors.is_empty());
    assert_eq!(sparse.page_count, 0);
}

#[tokio::test]
async fn search_non_success_carries_status_and_body() {
    async fn denied() -> (StatusCode, &'static str) {
        (StatusCode::FORBIDDEN, "daily limit exceeded")
    }
    let base = spawn_stub(Router::new().route("/volumes", get(denied))).await;
    let client = GoogleBooksClient::new(Some(&base), None, Duration::from_secs(2)).unwrap();

    let err = client.search(params("rust")).await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("403"), "{msg}");
    assert!(msg.contains("daily limit exceeded"), "{msg}");
}

#[tokio::test]
async fn search_truncates_large_error_bodies() {
    async fn noisy() -> (StatusCode, String) {
        (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(10_000))
    }
    let base = spawn_stub(Router::new().route("/volumes", get(noisy))).await;
    let client = GoogleBooksClient::new(Some(&base), None, Duration::from_secs(2)).unwrap();

    let err = client.search(params("rust")).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("500"));
    assert_eq!(msg.matches('x').count(), 4096);
}

/// Announces a huge error body, sends 8 KiB of it and then stalls with the
/// connection open.
async fn spawn_stalling_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        while !req.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            req.extend_from_slice(&buf[..n]);
        }
        sock.write_all(
            b"HTTP/1.1 500 Internal Server Error\r\n\
              content-type: text/plain\r\n\
              content-length: 50000000\r\n\r\n",
        )
        .await
        .unwrap();
        sock.write_all(&[b'x'; 8192]).await.unwrap();
        sock.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });
    format!("http://{addr}/volumes")
}

#[tokio::test]
async fn search_stops_reading_error_body_at_limit() {
    let base = spawn_stalling_upstream().await;
    let client = GoogleBooksClient::new(Some(&base), None, Duration::from_secs(10)).unwrap();

    // Waiting for the full body would stall until the client timeout.
    let err = tokio::time::timeout(Duration::from_secs(3), client.search(params("rust")))
        .await
        .expect("error body read past the limit")
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("500"), "{msg}");
    assert_eq!(msg.matches('x').count(), 4096);
}
