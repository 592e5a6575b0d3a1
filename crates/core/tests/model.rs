//! Wire format of the shared model types.

use chrono::{TimeDelta, TimeZone, Utc};
use tsundoku_core::model::{Book, OrderBy, QueueItem, Status};

#[test]
fn test_status_serde() {
    for (status, wire) in [
        (Status::Stacked, r#""stacked""#),
        (Status::Reading, r#""reading""#),
        (Status::Done, r#""done""#),
    ] {
        assert_eq!(serde_json::to_string(&status).unwrap(), wire);
        let back: Status = serde_json::from_str(wire).unwrap();
        assert_eq!(back, status);
        assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
}

#[test]
fn test_status_parse_rejects_unknown() {
    assert!("bogus".parse::<Status>().is_err());
    assert!("Stacked".parse::<Status>().is_err());
    assert!("".parse::<Status>().is_err());
}

#[test]
fn test_book_missing_fields_default() {
    let book: Book = serde_json::from_str(r#"{"id":"abc","title":"Rust"}"#).unwrap();
    assert_eq!(book.id, "abc");
    assert_eq!(book.title, "Rust");
    assert!(book.authors.is_empty());
    assert_eq!(book.page_count, 0);
}

#[test]
fn test_queue_item_record_shape() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + TimeDelta::milliseconds(7);
    let item = QueueItem {
        id: "b1".into(),
        book: Book {
            id: "b1".into(),
            page_count: 320,
            info_link: "https://example.test/b1".into(),
            ..Default::default()
        },
        note: String::new(),
        priority: None,
        status: Status::Stacked,
        added_at: at,
        updated_at: at,
        started_at: None,
        completed_at: None,
    };

    let value = serde_json::to_value(&item).unwrap();
    let obj = value.as_object().unwrap();
    for key in ["id", "book", "status", "addedAt", "updatedAt"] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    for key in ["note", "priority", "startedAt", "completedAt"] {
        assert!(!obj.contains_key(key), "unexpected {key}");
    }
    assert_eq!(obj["book"]["pageCount"], 320);
    assert_eq!(obj["book"]["infoLink"], "https://example.test/b1");

    // Sub-second precision survives, which restack ordering relies on.
    let back: QueueItem = serde_json::from_value(value).unwrap();
    assert_eq!(back, item);
}

#[test]
fn test_order_by_lenient_parse() {
    assert_eq!(OrderBy::parse_lenient(Some("newest")), OrderBy::Newest);
    assert_eq!(OrderBy::parse_lenient(Some("relevance")), OrderBy::Relevance);
    assert_eq!(OrderBy::parse_lenient(Some("whatever")), OrderBy::Relevance);
    assert_eq!(OrderBy::parse_lenient(None), OrderBy::Relevance);
}
