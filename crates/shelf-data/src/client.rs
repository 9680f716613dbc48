//! Fetch client layered over a transport.

use url::Url;

use crate::{
    FetchError, HttpTransport, Method, OutboundRequest, Response, TimeoutConfig, MAX_REDIRECTS,
};

/// HTTP client for outbound requests.
///
/// Applies default headers and the configured deadline to every request and
/// follows up to [`MAX_REDIRECTS`] redirect hops. Non-2xx responses are
/// returned as values; callers decide what a status means.
pub struct FetchClient<T: HttpTransport> {
    transport: T,
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    timeout: TimeoutConfig,
}

impl<T: HttpTransport> FetchClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: Vec::new(),
            timeout: TimeoutConfig::default(),
        }
    }

    /// Base URL prepended to relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Header added to every request unless the request sets it itself.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout(&self) -> TimeoutConfig {
        self.timeout
    }

    /// Start a GET request.
    pub fn get(&self, url: &str) -> OutboundRequest {
        self.request(Method::Get, url)
    }

    /// Start a POST request.
    pub fn post(&self, url: &str) -> OutboundRequest {
        self.request(Method::Post, url)
    }

    /// Start a request, resolving `url` against the base URL when relative.
    pub fn request(&self, method: Method, url: &str) -> OutboundRequest {
        let full_url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base, url)
            }
            _ => url.to_string(),
        };
        OutboundRequest::new(method, full_url)
    }

    /// Send a request, following redirects.
    pub async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        self.send_checked(request, |_| true).await
    }

    /// Send a request, following only redirects whose target `allow` accepts.
    /// A rejected hop fails with [`FetchError::RedirectRefused`] before the
    /// target is contacted.
    pub async fn send_checked<F>(&self, request: OutboundRequest, allow: F) -> Result<Response, FetchError>
    where
        F: Fn(&Url) -> bool,
    {
        let mut request = self.prepare(request);
        Url::parse(&request.url)?;

        let mut hops = 0;
        loop {
            let response = self.transport.send(request.clone()).await?;
            let Some(location) = response.redirect_location() else {
                return Ok(response);
            };
            if hops == MAX_REDIRECTS {
                return Err(FetchError::Request(format!(
                    "too many redirects (>{}) from {}",
                    MAX_REDIRECTS, request.url
                )));
            }
            hops += 1;

            let next = Url::parse(&request.url)?.join(location)?;
            if !allow(&next) {
                return Err(FetchError::RedirectRefused(
                    next.host_str().unwrap_or_default().to_string(),
                ));
            }
            let switch_to_get = response.status == 303
                || (matches!(response.status, 301 | 302) && request.method == Method::Post);
            request.url = next.to_string();
            if switch_to_get {
                request.method = Method::Get;
                request.body = None;
            }
        }
    }

    fn prepare(&self, mut request: OutboundRequest) -> OutboundRequest {
        for (key, value) in &self.default_headers {
            request = request.default_header(key.clone(), value.clone());
        }
        if request.timeout.is_none() {
            request.timeout = Some(self.timeout.total);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::executor::block_on;

    use super::*;
    use crate::MockTransport;

    #[test]
    fn test_default_headers_and_timeout_applied() {
        let mock = MockTransport::new();
        mock.on(Method::Get, "https://x.example/a", Ok(Response::status(200)));

        let client = FetchClient::new(mock.clone())
            .with_default_header("User-Agent", "shelf")
            .with_timeout(TimeoutConfig::from_millis(2500));
        let req = client.get("https://x.example/a").header("Accept", "image/*");
        block_on(client.send(req)).unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.header_value("user-agent"), Some("shelf"));
        assert_eq!(sent.header_value("accept"), Some("image/*"));
        assert_eq!(sent.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_base_url() {
        let client = FetchClient::new(MockTransport::new()).with_base_url("https://api.example/v1/");
        assert_eq!(client.get("/pages/1").url, "https://api.example/v1/pages/1");
        assert_eq!(client.get("https://other.example/").url, "https://other.example/");
    }

    #[test]
    fn test_follows_relative_redirect() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://x.example/old",
            Ok(Response::status(302).with_header("Location", "/new")),
        );
        mock.on(
            Method::Get,
            "https://x.example/new",
            Ok(Response::status(200).with_body(b"ok".to_vec())),
        );

        let client = FetchClient::new(mock.clone());
        let resp = block_on(client.send(client.get("https://x.example/old"))).unwrap();
        assert_eq!(resp.body, b"ok");
        assert_eq!(mock.request_count(), 2);
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://x.example/loop",
            Ok(Response::status(307).with_header("Location", "https://x.example/loop")),
        );

        let client = FetchClient::new(mock.clone());
        let err = block_on(client.send(client.get("https://x.example/loop"))).unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
        assert_eq!(mock.request_count(), MAX_REDIRECTS + 1);
    }

    #[test]
    fn test_refused_redirect_is_not_followed() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "https://x.example/a",
            Ok(Response::status(302).with_header("Location", "http://10.0.0.5/internal")),
        );

        let client = FetchClient::new(mock.clone());
        let only_public = |url: &Url| url.host_str() != Some("10.0.0.5");
        let err = block_on(client.send_checked(client.get("https://x.example/a"), only_public))
            .unwrap_err();

        assert_eq!(err, FetchError::RedirectRefused("10.0.0.5".to_string()));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_invalid_url_never_reaches_transport() {
        let mock = MockTransport::new();
        let client = FetchClient::new(mock.clone());
        let err = block_on(client.send(client.get("not a url"))).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert_eq!(mock.request_count(), 0);
    }
}
