//! The configured catalog collection.

use shelf_core::ShowcaseConfig;
use shelf_data::{
    FetchClient, FetchError, HttpTransport, NotionClient, Page, QueryOptions, QueryResponse,
    TimeoutConfig,
};

/// A Notion client bound to the catalog collection.
#[derive(Debug)]
pub struct NotionSource<T: HttpTransport> {
    client: NotionClient<T>,
    database_id: String,
}

impl<T: HttpTransport> NotionSource<T> {
    /// `None` when the credential or collection id is missing.
    pub fn from_config(transport: T, config: &ShowcaseConfig) -> Option<Self> {
        let (api_key, database_id) = config.credentials()?;
        let http = FetchClient::new(transport)
            .with_timeout(TimeoutConfig::from_total(config.fetch_timeout));
        let client = NotionClient::new(http, api_key)
            .with_base_url(config.api_base.as_str())
            .with_version(config.notion_version.as_str());

        Some(Self {
            client,
            database_id: database_id.to_string(),
        })
    }

    pub fn client(&self) -> &NotionClient<T> {
        &self.client
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// One page of the collection, newest first.
    pub async fn query_page(
        &self,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<QueryResponse, FetchError> {
        let options = QueryOptions::newest_first(page_size).with_cursor(cursor);
        self.client.query_database(&self.database_id, &options).await
    }

    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page, FetchError> {
        self.client.retrieve_page(page_id).await
    }

    /// Linear scan for a record by id, bounded to `max_pages` query pages.
    pub async fn find_record(
        &self,
        page_id: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Option<Page>, FetchError> {
        let mut cursor = None;
        for _ in 0..max_pages {
            let response = self.query_page(page_size, cursor).await?;
            let next = response.continuation().map(str::to_string);
            if let Some(found) = response
                .results
                .into_iter()
                .find(|p| same_record(&p.id, page_id))
            {
                return Ok(Some(found));
            }
            match next {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
        Ok(None)
    }
}

/// Record ids compare equal with or without dashes.
pub fn same_record(a: &str, b: &str) -> bool {
    let strip = |s: &str| s.chars().filter(|c| *c != '-').collect::<String>().to_ascii_lowercase();
    a == b || strip(a) == strip(b)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use shelf_data::{Method, MockTransport, Response};

    use super::*;

    const QUERY_URL: &str = "https://api.notion.com/v1/databases/db/query";

    fn source(mock: &MockTransport) -> NotionSource<MockTransport> {
        let config = ShowcaseConfig::default().with_credentials("secret", "db");
        NotionSource::from_config(mock.clone(), &config).unwrap()
    }

    #[test]
    fn test_unconfigured_has_no_source() {
        let config = ShowcaseConfig::default();
        assert!(NotionSource::from_config(MockTransport::new(), &config).is_none());
    }

    #[test]
    fn test_same_record_ignores_dashes() {
        assert!(same_record(
            "1a2b3c4d-0000-1111-2222-333344445555",
            "1a2b3c4d000011112222333344445555"
        ));
        assert!(!same_record("abc", "abd"));
    }

    #[test]
    fn test_find_record_walks_pages() {
        let mock = MockTransport::new();
        mock.on_sequence(
            Method::Post,
            QUERY_URL,
            vec![
                Ok(Response::json_body(&serde_json::json!({
                    "results": [{"id": "a"}], "has_more": true, "next_cursor": "c1"
                }))),
                Ok(Response::json_body(&serde_json::json!({
                    "results": [{"id": "b"}], "has_more": false, "next_cursor": null
                }))),
            ],
        );

        let found = block_on(source(&mock).find_record("b", 100, 500)).unwrap();
        assert_eq!(found.unwrap().id, "b");
        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.requests()[1].json_body().unwrap()["start_cursor"], "c1");
    }

    #[test]
    fn test_find_record_bounded() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            QUERY_URL,
            Ok(Response::json_body(&serde_json::json!({
                "results": [{"id": "other"}], "has_more": true, "next_cursor": "again"
            }))),
        );

        let found = block_on(source(&mock).find_record("missing", 100, 3)).unwrap();
        assert!(found.is_none());
        assert_eq!(mock.request_count(), 3);
    }
}
