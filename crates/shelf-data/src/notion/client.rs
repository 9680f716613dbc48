//! Typed Notion API client.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{FetchClient, FetchError, HttpTransport, Page, QueryOptions, QueryResponse};

pub const DEFAULT_NOTION_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Everything outside the unreserved set is escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the two Notion operations the showcase needs.
pub struct NotionClient<T: HttpTransport> {
    http: FetchClient<T>,
    api_key: String,
    version: String,
}

impl<T: HttpTransport> NotionClient<T> {
    /// `http` should not carry a base URL of its own.
    pub fn new(http: FetchClient<T>, api_key: impl Into<String>) -> Self {
        Self {
            http: http.with_base_url(DEFAULT_NOTION_BASE),
            api_key: api_key.into(),
            version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn http(&self) -> &FetchClient<T> {
        &self.http
    }

    /// `POST /databases/{id}/query`.
    pub async fn query_database(
        &self,
        database_id: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse, FetchError> {
        let path = format!(
            "/databases/{}/query",
            utf8_percent_encode(database_id, PATH_SEGMENT)
        );
        let request = self.authorized(self.http.post(&path)).json(options)?;
        self.http.send(request).await?.error_for_status()?.json()
    }

    /// `GET /pages/{id}`.
    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page, FetchError> {
        let path = format!("/pages/{}", utf8_percent_encode(page_id, PATH_SEGMENT));
        let request = self.authorized(self.http.get(&path));
        self.http.send(request).await?.error_for_status()?.json()
    }

    fn authorized(&self, request: crate::OutboundRequest) -> crate::OutboundRequest {
        request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", self.version.as_str())
            .accept("application/json")
    }
}

impl<T: HttpTransport> std::fmt::Debug for NotionClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("api_key", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::{Method, MockTransport, Response};

    const QUERY_URL: &str = "https://api.notion.com/v1/databases/db-1/query";

    fn client(mock: &MockTransport) -> NotionClient<MockTransport> {
        NotionClient::new(FetchClient::new(mock.clone()), "secret_abc")
    }

    #[test]
    fn test_query_sends_auth_version_and_body() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            QUERY_URL,
            Ok(Response::json_body(&serde_json::json!({
                "results": [{"id": "p1", "created_time": "2024-01-01T00:00:00.000Z", "properties": {}}],
                "has_more": false,
                "next_cursor": null
            }))),
        );

        let resp = block_on(client(&mock).query_database("db-1", &QueryOptions::newest_first(100)))
            .unwrap();
        assert_eq!(resp.results.len(), 1);

        let sent = &mock.requests()[0];
        assert_eq!(sent.header_value("Authorization"), Some("Bearer secret_abc"));
        assert_eq!(sent.header_value("Notion-Version"), Some(DEFAULT_NOTION_VERSION));
        assert_eq!(sent.json_body().unwrap()["page_size"], 100);
    }

    #[test]
    fn test_api_error_envelope() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://api.notion.com/v1/pages/p1",
            Ok(Response::status(404).with_body(
                br#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page"}"#.to_vec(),
            )),
        );

        let err = block_on(client(&mock).retrieve_page("p1")).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, FetchError::Api { .. }));
    }

    #[test]
    fn test_custom_base_url() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "http://localhost:9000/v1/pages/p%2F1", Ok(Response::json_body(
            &serde_json::json!({"id": "p/1"}),
        )));

        let client = client(&mock).with_base_url("http://localhost:9000/v1");
        let page = block_on(client.retrieve_page("p/1")).unwrap();
        assert_eq!(page.id, "p/1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mock = MockTransport::new();
        assert!(!format!("{:?}", client(&mock)).contains("secret_abc"));
    }
}
