//! Configuration and connectivity health report.

use serde::Serialize;
use shelf_core::ShowcaseConfig;
use shelf_data::{HttpTransport, QueryOptions};
use shelf_observability::StructuredLogger;

use crate::NotionSource;

/// Which configuration values are present. Never carries the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvPresence {
    pub has_notion_api_key: bool,
    pub has_database_id: bool,
}

/// Outcome of the single-record check query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityCheck {
    pub attempted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub ok: bool,
    pub env: EnvPresence,
    pub notion: ConnectivityCheck,
}

impl StatusReport {
    /// 500 only when a check was attempted and failed.
    pub fn status_code(&self) -> u16 {
        if self.ok {
            200
        } else {
            500
        }
    }
}

/// Report configuration presence and, when configured, query the collection
/// with a single-record request.
pub async fn check_status<T: HttpTransport>(
    transport: T,
    config: &ShowcaseConfig,
    logger: &StructuredLogger,
) -> StatusReport {
    let env = EnvPresence {
        has_notion_api_key: config.api_key.is_some(),
        has_database_id: config.database_id.is_some(),
    };

    let Some(source) = NotionSource::from_config(transport, config) else {
        return StatusReport {
            ok: true,
            env,
            notion: ConnectivityCheck {
                attempted: false,
                ok: None,
                results: None,
                error_name: None,
                error_message: None,
            },
        };
    };

    let query = QueryOptions {
        page_size: 1,
        start_cursor: None,
        sorts: Vec::new(),
    };

    match source
        .client()
        .query_database(source.database_id(), &query)
        .await
    {
        Ok(response) => StatusReport {
            ok: true,
            env,
            notion: ConnectivityCheck {
                attempted: true,
                ok: Some(true),
                results: Some(response.results.len()),
                error_name: None,
                error_message: None,
            },
        },
        Err(err) => {
            logger
                .warn_builder("status check failed")
                .field("error", err.to_string())
                .emit();
            StatusReport {
                ok: false,
                env,
                notion: ConnectivityCheck {
                    attempted: true,
                    ok: Some(false),
                    results: None,
                    error_name: Some(err.name().to_string()),
                    error_message: Some(err.to_string()),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use shelf_data::{Method, MockTransport, Response};

    use super::*;

    const QUERY_URL: &str = "https://api.notion.com/v1/databases/db/query";

    #[test]
    fn test_unconfigured_skips_check() {
        let mock = MockTransport::new();
        let config = ShowcaseConfig {
            database_id: Some("db".to_string()),
            ..ShowcaseConfig::default()
        };
        let report = block_on(check_status(mock.clone(), &config, &StructuredLogger::in_memory()));

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "ok": true,
                "env": {"hasNotionApiKey": false, "hasDatabaseId": true},
                "notion": {"attempted": false}
            })
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_check_success() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            QUERY_URL,
            Ok(Response::json_body(&serde_json::json!({
                "results": [{"id": "p1"}], "has_more": true, "next_cursor": "c"
            }))),
        );
        let config = ShowcaseConfig::default().with_credentials("secret_abc", "db");
        let report = block_on(check_status(mock.clone(), &config, &StructuredLogger::in_memory()));

        assert_eq!(report.status_code(), 200);
        assert_eq!(report.notion.results, Some(1));
        assert_eq!(mock.requests()[0].json_body().unwrap(), serde_json::json!({"page_size": 1}));
    }

    #[test]
    fn test_check_failure_never_echoes_secret() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            QUERY_URL,
            Ok(Response::status(401).with_body(
                br#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#.to_vec(),
            )),
        );
        let config = ShowcaseConfig::default().with_credentials("secret_abc", "db");
        let report = block_on(check_status(mock, &config, &StructuredLogger::in_memory()));

        assert_eq!(report.status_code(), 500);
        assert_eq!(report.notion.error_name.as_deref(), Some("APIResponseError"));
        let body = serde_json::to_string(&report).unwrap();
        assert!(!body.contains("secret_abc"));
    }
}
