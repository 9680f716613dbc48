//! Pagination over simulated collections of varying size.

use futures::executor::block_on;
use shelf_catalog::{CatalogSource, CatalogSync};
use shelf_core::{sample_catalog, ShowcaseConfig};
use shelf_data::{Method, MockTransport, Response};
use shelf_observability::{LogLevel, StructuredLogger};

const QUERY_URL: &str = "https://api.notion.com/v1/databases/db/query";

/// A mock collection of `total` records, served `page_size` at a time with
/// the cursor being the offset of the next page.
fn collection(total: usize) -> MockTransport {
    let mock = MockTransport::new();
    mock.respond_with(Method::Post, QUERY_URL, move |req| {
        let body = req.json_body().unwrap_or_default();
        let page_size = body["page_size"].as_u64().unwrap_or(100) as usize;
        let offset: usize = body["start_cursor"]
            .as_str()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);

        let end = (offset + page_size).min(total);
        let results: Vec<_> = (offset..end)
            .map(|i| {
                serde_json::json!({
                    "id": format!("rec-{}", i),
                    "created_time": format!("2024-01-01T00:00:{:02}.000Z", 59 - (i % 60)),
                    "properties": {}
                })
            })
            .collect();
        let has_more = end < total;
        let next_cursor = has_more.then(|| end.to_string());

        Ok(Response::json_body(&serde_json::json!({
            "results": results,
            "has_more": has_more,
            "next_cursor": next_cursor
        })))
    });
    mock
}

fn config(page_size: u32, max_pages: u32) -> ShowcaseConfig {
    ShowcaseConfig::default()
        .with_credentials("secret", "db")
        .with_page_size(page_size)
        .with_max_pages(max_pages)
}

#[test]
fn test_pagination_terminates_at_min_of_size_and_cap() {
    let cases = [
        (0usize, 10u32, 3u32),
        (1, 10, 3),
        (10, 10, 3),
        (25, 10, 3),
        (30, 10, 3),
        (31, 10, 3),
        (500, 7, 4),
        (250, 100, 500),
    ];

    for (total, page_size, max_pages) in cases {
        let mock = collection(total);
        let sync = CatalogSync::new(mock.clone(), &config(page_size, max_pages));
        let snapshot = block_on(sync.fetch_catalog(&StructuredLogger::in_memory()));

        let cap = (max_pages * page_size) as usize;
        assert_eq!(
            snapshot.products.len(),
            total.min(cap),
            "total={} page_size={} max_pages={}",
            total,
            page_size,
            max_pages
        );
        assert!(mock.request_count() <= max_pages as usize);

        let truncated = total > cap;
        assert!(matches!(
            snapshot.source,
            CatalogSource::Live { truncated: t, .. } if t == truncated
        ));
    }
}

#[test]
fn test_endless_server_is_capped() {
    let mock = MockTransport::new();
    mock.on(
        Method::Post,
        QUERY_URL,
        Ok(Response::json_body(&serde_json::json!({
            "results": [{"id": "same", "created_time": "2024-01-01T00:00:00.000Z"}],
            "has_more": true,
            "next_cursor": "forever"
        }))),
    );

    let logger = StructuredLogger::in_memory();
    let sync = CatalogSync::new(mock.clone(), &config(100, 500));
    let snapshot = block_on(sync.fetch_catalog(&logger));

    assert_eq!(mock.request_count(), 500);
    assert_eq!(snapshot.products.len(), 500);
    assert_eq!(
        snapshot.source,
        CatalogSource::Live {
            pages: 500,
            truncated: true
        }
    );
    assert_eq!(logger.entries_at(LogLevel::Warn).len(), 1);
}

#[test]
fn test_missing_credential_returns_exact_sample() {
    for config in [
        ShowcaseConfig::default(),
        ShowcaseConfig {
            api_key: Some("secret".to_string()),
            ..ShowcaseConfig::default()
        },
        ShowcaseConfig {
            database_id: Some("db".to_string()),
            ..ShowcaseConfig::default()
        },
    ] {
        let mock = collection(5);
        let sync = CatalogSync::new(mock.clone(), &config);
        let snapshot = block_on(sync.fetch_catalog(&StructuredLogger::in_memory()));

        assert_eq!(snapshot.products, sample_catalog());
        assert_eq!(mock.request_count(), 0);
    }
}
