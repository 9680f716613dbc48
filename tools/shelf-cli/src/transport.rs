//! Native outbound HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shelf_data::{
    with_deadline, FetchError, HttpTransport, OutboundRequest, Response, DEFAULT_TIMEOUT,
};

/// `reqwest` transport. Redirects are left to `FetchClient`, so the client
/// itself never follows them.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let deadline = request.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut builder = self.client.request(method, request.url.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(Response::new(status, headers, body.to_vec()))
        };

        let exchange = async { exchange.await.map_err(|err| classify(err, deadline)) };
        with_deadline(exchange, tokio::time::sleep(deadline), deadline).await
    }
}

fn classify(err: reqwest::Error, deadline: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(deadline)
    } else if err.is_builder() {
        FetchError::InvalidUrl(err.to_string())
    } else if err.is_connect() || err.is_request() || err.is_body() {
        FetchError::Connection(err.to_string())
    } else {
        FetchError::Request(err.to_string())
    }
}
