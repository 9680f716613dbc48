//! Notion wire model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /databases/{id}/query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOptions {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
}

impl QueryOptions {
    /// Sorted by creation time, newest first.
    pub fn newest_first(page_size: u32) -> Self {
        Self {
            page_size,
            start_cursor: None,
            sorts: vec![Sort::created_time_descending()],
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub timestamp: String,
    pub direction: String,
}

impl Sort {
    pub fn created_time_descending() -> Self {
        Self {
            timestamp: "created_time".to_string(),
            direction: "descending".to_string(),
        }
    }
}

/// One page of collection query results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl QueryResponse {
    /// Cursor to continue with, when the server reports more pages.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref().filter(|c| !c.is_empty())
        } else {
            None
        }
    }
}

/// A database record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub cover: Option<FileObject>,
    /// Raw property values keyed by property name.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A file reference, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileObject {
    /// Externally hosted URL; stable.
    External { external: ExternalFile },
    /// Notion-hosted file behind a signed URL.
    File { file: HostedFile },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }

    /// Whether the URL is signed and will expire.
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_options_body() {
        let body = serde_json::to_value(QueryOptions::newest_first(100)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "page_size": 100,
                "sorts": [{"timestamp": "created_time", "direction": "descending"}]
            })
        );

        let body = serde_json::to_value(QueryOptions::newest_first(1).with_cursor(Some("c2".into())))
            .unwrap();
        assert_eq!(body["start_cursor"], "c2");
    }

    #[test]
    fn test_page_cover_variants() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "object": "page",
            "id": "p1",
            "created_time": "2024-01-01T00:00:00.000Z",
            "cover": {"type": "file", "file": {"url": "https://s3.amazonaws.com/x", "expiry_time": "2024-01-01T01:00:00.000Z"}},
            "properties": {}
        }))
        .unwrap();
        let cover = page.cover.unwrap();
        assert_eq!(cover.url(), "https://s3.amazonaws.com/x");
        assert!(cover.is_signed());

        let page: Page = serde_json::from_value(serde_json::json!({
            "id": "p2",
            "cover": {"type": "external", "external": {"url": "https://images.example/x.jpg"}}
        }))
        .unwrap();
        assert!(!page.cover.unwrap().is_signed());
    }

    #[test]
    fn test_continuation() {
        let resp: QueryResponse = serde_json::from_value(serde_json::json!({
            "results": [], "has_more": true, "next_cursor": "abc"
        }))
        .unwrap();
        assert_eq!(resp.continuation(), Some("abc"));

        let resp: QueryResponse = serde_json::from_value(serde_json::json!({
            "results": [], "has_more": true, "next_cursor": null
        }))
        .unwrap();
        assert_eq!(resp.continuation(), None);
    }
}
