//! Transport seam for outbound HTTP.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{FetchError, OutboundRequest, Response};

/// Sends a single request and returns whatever the origin answered.
///
/// Transports do not follow redirects and do not turn non-2xx statuses into
/// errors; [`crate::FetchClient`] layers both on top. They must honour
/// `request.timeout` where the host allows it and report an expired deadline
/// as [`FetchError::Timeout`].
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Spin outbound HTTP.
///
/// Destinations must be listed in the component's `allowed_outbound_hosts`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for SpinTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request, Response as SpinResponse};

        use crate::Method;

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut builder = Request::builder();
        builder.method(method).uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder.body(body);
        }

        let limit = request.timeout.unwrap_or(crate::DEFAULT_TIMEOUT);
        let exchange = async {
            let response: SpinResponse = spin_sdk::http::send(builder.build())
                .await
                .map_err(|e| classify_send_error(e, limit))?;
            let status = *response.status();
            let headers = response
                .headers()
                .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
                .collect();
            Ok(Response::new(status, headers, response.into_body()))
        };

        crate::with_deadline(exchange, deadline::Deadline::after(limit), limit).await
    }
}

#[cfg(target_arch = "wasm32")]
fn classify_send_error(err: spin_sdk::http::SendError, limit: std::time::Duration) -> FetchError {
    use spin_sdk::http::{ErrorCode, SendError};

    match err {
        SendError::Http(
            ErrorCode::DnsTimeout
            | ErrorCode::ConnectionTimeout
            | ErrorCode::ConnectionReadTimeout
            | ErrorCode::ConnectionWriteTimeout
            | ErrorCode::HttpResponseTimeout,
        ) => FetchError::Timeout(limit),
        SendError::RequestConversion(e) => FetchError::Request(e.to_string()),
        other => FetchError::Connection(other.to_string()),
    }
}

/// Monotonic-clock timer driven by the Spin executor.
#[cfg(target_arch = "wasm32")]
mod deadline {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;

    use spin_executor::CancelOnDropToken;
    use spin_sdk::wit::wasi::clocks0_2_0::monotonic_clock;

    pub struct Deadline {
        at: monotonic_clock::Instant,
        registration: Option<CancelOnDropToken>,
    }

    impl Deadline {
        pub fn after(limit: Duration) -> Self {
            let nanos = u64::try_from(limit.as_nanos()).unwrap_or(u64::MAX);
            Self {
                at: monotonic_clock::now().saturating_add(nanos),
                registration: None,
            }
        }
    }

    impl Future for Deadline {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if monotonic_clock::now() >= self.at {
                self.registration = None;
                return Poll::Ready(());
            }
            let pollable = monotonic_clock::subscribe_instant(self.at);
            self.registration = Some(
                spin_executor::push_waker_and_get_token(pollable, cx.waker().clone()).into(),
            );
            Poll::Pending
        }
    }
}

