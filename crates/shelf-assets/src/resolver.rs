//! Asset proxy resolution.

use std::time::Instant;

use shelf_core::ShowcaseConfig;
use shelf_data::{FetchClient, FetchError, HttpTransport, Response, TimeoutConfig};
use shelf_observability::StructuredLogger;
use url::Url;

use crate::{
    is_private_host, AssetQuery, CachePolicy, ManagedHosts, OriginKind, ResolveError, UrlRefresher,
};

/// Content type assumed when the upstream sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Identifies the proxy to managed storage. Signed URLs carry their own
/// credentials, so no authorization header is ever sent with them.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Upstream statuses that indicate an expired or revoked signature.
pub const STALE_STATUSES: [u16; 3] = [400, 403, 404];

/// Bytes ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub body: Vec<u8>,
    pub content_type: String,
    pub cache_control: String,
    /// Served from a freshly resolved URL.
    pub refreshed: bool,
}

impl AssetResponse {
    fn from_upstream(response: Response, policy: CachePolicy, refreshed: bool) -> Self {
        let content_type = response
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        Self {
            body: response.into_bytes(),
            content_type,
            cache_control: policy.cache_control_header(),
            refreshed,
        }
    }
}

/// Serves asset bytes, refreshing an expired signed URL at most once.
pub struct AssetResolver<T: HttpTransport> {
    http: FetchClient<T>,
    refresher: Option<UrlRefresher<T>>,
    managed: ManagedHosts,
    allow_private_origins: bool,
}

impl<T: HttpTransport + Clone> AssetResolver<T> {
    pub fn new(transport: T, config: &ShowcaseConfig) -> Self {
        Self {
            http: FetchClient::new(transport.clone())
                .with_timeout(TimeoutConfig::from_total(config.fetch_timeout)),
            refresher: UrlRefresher::from_config(transport, config),
            managed: ManagedHosts::from_config(config),
            allow_private_origins: config.allow_private_origins,
        }
    }
}

impl<T: HttpTransport> AssetResolver<T> {
    pub fn with_managed_hosts(mut self, managed: ManagedHosts) -> Self {
        self.managed = managed;
        self
    }

    pub fn can_refresh(&self) -> bool {
        self.refresher.is_some()
    }

    /// Validate `query.url`, fetch it and, for managed assets, refresh and
    /// retry once on staleness.
    pub async fn resolve(
        &self,
        query: &AssetQuery,
        logger: &StructuredLogger,
    ) -> Result<AssetResponse, ResolveError> {
        let started = Instant::now();
        let url = validate_url(query.url.as_deref())?;

        let result = match self.managed.classify(&url) {
            OriginKind::PassThrough => self.resolve_pass_through(&url).await,
            OriginKind::Managed => self.resolve_managed(&url, query, logger).await,
        };

        match &result {
            Ok(asset) => logger
                .debug_builder("asset served")
                .url("url", url.as_str())
                .field_u64("bytes", asset.body.len() as u64)
                .field_bool("refreshed", asset.refreshed)
                .duration_ms("duration_ms", started.elapsed())
                .emit(),
            Err(err) => logger
                .warn_builder("asset resolution failed")
                .url("url", url.as_str())
                .field("error", err.name())
                .field_u64("status", err.status_code() as u64)
                .duration_ms("duration_ms", started.elapsed())
                .emit(),
        }
        result
    }

    async fn resolve_pass_through(&self, url: &Url) -> Result<AssetResponse, ResolveError> {
        if !self.origin_allowed(url) {
            return Err(ResolveError::OriginNotAllowed(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }

        let response = self
            .http
            .send_checked(self.http.get(url.as_str()), |next| self.origin_allowed(next))
            .await
            .map_err(ResolveError::from_fetch)?;
        if !response.is_success() {
            return Err(ResolveError::Upstream {
                status: response.status,
            });
        }
        Ok(AssetResponse::from_upstream(
            response,
            CachePolicy::pass_through(),
            false,
        ))
    }

    async fn resolve_managed(
        &self,
        url: &Url,
        query: &AssetQuery,
        logger: &StructuredLogger,
    ) -> Result<AssetResponse, ResolveError> {
        let first = self.fetch_managed(url.as_str()).await;
        if let Err(FetchError::RedirectRefused(host)) = &first {
            return Err(ResolveError::OriginNotAllowed(host.clone()));
        }
        let stale = match &first {
            Ok(response) if response.is_success() => false,
            Ok(response) => STALE_STATUSES.contains(&response.status),
            Err(_) => true,
        };

        let asset = query.asset_ref().filter(|_| stale);
        let (Some(asset), Some(refresher)) = (asset, self.refresher.as_ref()) else {
            return match first {
                Ok(response) if response.is_success() => Ok(AssetResponse::from_upstream(
                    response,
                    CachePolicy::managed(),
                    false,
                )),
                Ok(response) if stale && query.page_id.is_some() => {
                    logger
                        .debug_builder("stale asset has no refreshable owner")
                        .field_u64("status", response.status as u64)
                        .emit();
                    Err(ResolveError::RefreshUnavailable)
                }
                Ok(response) => Err(ResolveError::Upstream {
                    status: response.status,
                }),
                Err(_) if query.page_id.is_some() => Err(ResolveError::RefreshUnavailable),
                Err(err) => Err(ResolveError::from_fetch(err)),
            };
        };

        logger
            .info_builder("signed asset looks stale, refreshing")
            .field("page_id", &asset.page_id)
            .field(
                "cause",
                match &first {
                    Ok(response) => response.status.to_string(),
                    Err(err) => err.name().to_string(),
                },
            )
            .emit();

        let fresh = refresher
            .refresh(&asset, logger)
            .await
            .ok_or(ResolveError::RefreshUnavailable)?;

        let retry = self
            .fetch_managed(&fresh)
            .await
            .map_err(ResolveError::from_fetch)?;
        if !retry.is_success() {
            return Err(ResolveError::Upstream {
                status: retry.status,
            });
        }
        Ok(AssetResponse::from_upstream(
            retry,
            CachePolicy::managed(),
            true,
        ))
    }

    async fn fetch_managed(&self, url: &str) -> Result<Response, FetchError> {
        let request = self
            .http
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT);
        self.http
            .send_checked(request, |next| self.origin_allowed(next))
            .await
    }

    /// Every hop, redirects included, must pass this check.
    fn origin_allowed(&self, url: &Url) -> bool {
        self.allow_private_origins || !is_private_host(url)
    }
}

/// Parse and check the requested URL before any network call.
fn validate_url(raw: Option<&str>) -> Result<Url, ResolveError> {
    let raw = raw.ok_or(ResolveError::MissingUrl)?;
    let url = Url::parse(raw).map_err(|err| ResolveError::InvalidUrl(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResolveError::InvalidUrl(format!(
            "unsupported scheme {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::executor::block_on;
    use shelf_data::{Method, MockTransport};
    use shelf_observability::LogLevel;

    use super::*;

    const SIGNED: &str = "https://s3.amazonaws.com/bucket/a.png?X-Amz-Signature=old";
    const FRESH: &str = "https://s3.amazonaws.com/bucket/a.png?X-Amz-Signature=new";
    const PAGE_URL: &str = "https://api.notion.com/v1/pages/p1";

    fn config() -> ShowcaseConfig {
        ShowcaseConfig::default().with_credentials("secret", "db")
    }

    fn png(body: &[u8]) -> Response {
        Response::status(200)
            .with_header("Content-Type", "image/png")
            .with_body(body.to_vec())
    }

    fn cover_page(url: &str) -> Response {
        Response::json_body(&serde_json::json!({
            "id": "p1",
            "cover": {"type": "file", "file": {"url": url}}
        }))
    }

    #[test]
    fn test_missing_and_invalid_url_make_no_requests() {
        let mock = MockTransport::new();
        let resolver = AssetResolver::new(mock.clone(), &config());
        let logger = StructuredLogger::in_memory();

        let err = block_on(resolver.resolve(&AssetQuery::default(), &logger)).unwrap_err();
        assert_eq!(err, ResolveError::MissingUrl);

        let err = block_on(resolver.resolve(&AssetQuery::default().with_url("not a url"), &logger))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("Invalid URL format: "));

        let err = block_on(
            resolver.resolve(&AssetQuery::default().with_url("file:///etc/passwd"), &logger),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 400);

        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_pass_through_is_verbatim() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://images.unsplash.com/photo?w=800",
            Ok(Response::status(200).with_body(b"jpeg-bytes".to_vec())),
        );
        let resolver = AssetResolver::new(mock.clone(), &config());

        let asset = block_on(resolver.resolve(
            &AssetQuery::default().with_url("https://images.unsplash.com/photo?w=800"),
            &StructuredLogger::in_memory(),
        ))
        .unwrap();

        assert_eq!(asset.body, b"jpeg-bytes");
        assert_eq!(asset.content_type, "image/jpeg");
        assert_eq!(asset.cache_control, "public, max-age=31536000, immutable");
        assert!(!asset.refreshed);
        assert!(mock.requests()[0].header_value("User-Agent").is_none());
    }

    #[test]
    fn test_pass_through_failure_is_never_refreshed() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "https://cdn.example/a.png", Ok(Response::status(403)));
        let resolver = AssetResolver::new(mock.clone(), &config());

        let query = AssetQuery::default()
            .with_url("https://cdn.example/a.png")
            .with_page_id("p1")
            .with_cover(true);
        let err = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();

        assert_eq!(err, ResolveError::Upstream { status: 403 });
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_private_pass_through_refused() {
        let mock = MockTransport::new();
        let resolver = AssetResolver::new(mock.clone(), &config());
        let query = AssetQuery::default().with_url("http://169.254.169.254/latest/meta-data");

        let err = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();
        assert!(matches!(err, ResolveError::OriginNotAllowed(_)));
        assert_eq!(mock.request_count(), 0);

        let permissive = AssetResolver::new(mock.clone(), &config().with_allow_private_origins(true));
        let err = block_on(permissive.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_redirect_into_private_network_refused() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://public.example/a.png",
            Ok(Response::status(302).with_header("Location", "http://169.254.169.254/latest/meta-data")),
        );
        mock.on(
            Method::Get,
            "http://169.254.169.254/latest/meta-data",
            Ok(Response::status(200).with_body(b"instance-credentials".to_vec())),
        );
        let resolver = AssetResolver::new(mock.clone(), &ShowcaseConfig::default());

        let query = AssetQuery::default().with_url("https://public.example/a.png");
        let err = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();

        assert_eq!(err, ResolveError::OriginNotAllowed("169.254.169.254".to_string()));
        assert_eq!(err.status_code(), 400);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(mock.requests()[0].url, "https://public.example/a.png");
    }

    #[test]
    fn test_managed_redirect_into_private_network_refused() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            SIGNED,
            Ok(Response::status(307).with_header("Location", "http://127.0.0.1:8080/admin")),
        );
        let resolver = AssetResolver::new(mock.clone(), &config());

        let query = AssetQuery::default()
            .with_url(SIGNED)
            .with_page_id("p1")
            .with_cover(true);
        let err = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();

        assert_eq!(err, ResolveError::OriginNotAllowed("127.0.0.1".to_string()));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_allowed_private_redirect_is_followed() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://public.example/a.png",
            Ok(Response::status(302).with_header("Location", "http://10.1.2.3/a.png")),
        );
        mock.on(
            Method::Get,
            "http://10.1.2.3/a.png",
            Ok(Response::status(200).with_body(b"lan".to_vec())),
        );
        let config = ShowcaseConfig::default().with_allow_private_origins(true);
        let resolver = AssetResolver::new(mock.clone(), &config);

        let query = AssetQuery::default().with_url("https://public.example/a.png");
        let asset = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap();

        assert_eq!(asset.body, b"lan");
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_managed_success_sends_browser_header_only() {
        let mock = MockTransport::new();
        mock.on(Method::Get, SIGNED, Ok(png(b"img")));
        let resolver = AssetResolver::new(mock.clone(), &config());

        let asset = block_on(resolver.resolve(
            &AssetQuery::default().with_url(SIGNED),
            &StructuredLogger::in_memory(),
        ))
        .unwrap();

        assert_eq!(asset.content_type, "image/png");
        assert_eq!(asset.cache_control, "public, max-age=3600, s-maxage=86400");
        let request = &mock.requests()[0];
        assert_eq!(request.header_value("User-Agent"), Some("Mozilla/5.0"));
        assert!(request.header_value("Authorization").is_none());
    }

    #[test]
    fn test_stale_cover_refreshes_once() {
        let mock = MockTransport::new();
        mock.on(Method::Get, SIGNED, Ok(Response::status(403)));
        mock.on(Method::Get, PAGE_URL, Ok(cover_page(FRESH)));
        mock.on(Method::Get, FRESH, Ok(png(b"fresh")));
        let resolver = AssetResolver::new(mock.clone(), &config());

        let query = AssetQuery::default()
            .with_url(SIGNED)
            .with_page_id("p1")
            .with_cover(true);
        let asset = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap();

        assert_eq!(asset.body, b"fresh");
        assert!(asset.refreshed);
        assert_eq!(mock.count_matching("https://s3.amazonaws.com/"), 2);

        let retry = &mock.requests()[2];
        assert!(retry.header_value("Authorization").is_none());
    }

    #[test]
    fn test_non_stale_status_is_not_refreshed() {
        let mock = MockTransport::new();
        mock.on(Method::Get, SIGNED, Ok(Response::status(500)));
        let resolver = AssetResolver::new(mock.clone(), &config());

        let query = AssetQuery::default()
            .with_url(SIGNED)
            .with_page_id("p1")
            .with_cover(true);
        let err = block_on(resolver.resolve(&query, &StructuredLogger::in_memory())).unwrap_err();

        assert_eq!(err, ResolveError::Upstream { status: 500 });
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_network_failure_without_page_id_is_500() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            SIGNED,
            Err(FetchError::Connection("reset".to_string())),
        );
        let resolver = AssetResolver::new(mock.clone(), &config());

        let err = block_on(resolver.resolve(
            &AssetQuery::default().with_url(SIGNED),
            &StructuredLogger::in_memory(),
        ))
        .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Failed to fetch image");
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            SIGNED,
            Err(FetchError::Timeout(Duration::from_secs(10))),
        );
        let resolver = AssetResolver::new(mock, &config());

        let err = block_on(resolver.resolve(
            &AssetQuery::default().with_url(SIGNED),
            &StructuredLogger::in_memory(),
        ))
        .unwrap_err();
        assert_eq!(err.status_code(), 504);
    }

    #[test]
    fn test_unconfigured_refresh_is_unavailable() {
        let mock = MockTransport::new();
        mock.on(Method::Get, SIGNED, Ok(Response::status(403)));
        let resolver = AssetResolver::new(mock.clone(), &ShowcaseConfig::default());
        assert!(!resolver.can_refresh());

        let query = AssetQuery::default()
            .with_url(SIGNED)
            .with_page_id("p1")
            .with_cover(true);
        let logger = StructuredLogger::in_memory();
        let err = block_on(resolver.resolve(&query, &logger)).unwrap_err();

        assert_eq!(err, ResolveError::RefreshUnavailable);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(logger.entries_at(LogLevel::Warn).len(), 1);
    }
}
