//! Timeout and redirect limits for outbound requests.

use std::future::Future;
use std::time::Duration;

use futures::future::{self, Either};

use crate::{FetchError, Response};

/// Default client-side abort.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Total operation timeout, including redirects.
    pub total: Duration,
}

impl TimeoutConfig {
    pub fn from_total(total: Duration) -> Self {
        Self { total }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::from_total(Duration::from_millis(ms))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            total: DEFAULT_TIMEOUT,
        }
    }
}

/// Race an exchange against a deadline timer. The timer finishing first is a
/// client-side abort and drops the exchange.
pub async fn with_deadline<F, D>(exchange: F, timer: D, limit: Duration) -> Result<Response, FetchError>
where
    F: Future<Output = Result<Response, FetchError>>,
    D: Future<Output = ()>,
{
    futures::pin_mut!(exchange);
    futures::pin_mut!(timer);
    match future::select(exchange, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(FetchError::Timeout(limit)),
    }
}
