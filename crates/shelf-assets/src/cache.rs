//! Cache directives for proxied assets.

use std::time::Duration;

/// One year, for content-addressed pass-through assets.
pub const PASS_THROUGH_MAX_AGE: Duration = Duration::from_secs(31_536_000);

/// Browser lifetime of a managed asset; bounded so an expired signature is
/// not replayed from a browser cache for long.
pub const MANAGED_MAX_AGE: Duration = Duration::from_secs(3_600);

/// Shared-cache lifetime of a managed asset.
pub const MANAGED_SHARED_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Cache visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    Public,
    Private,
    None,
}

impl CacheScope {
    pub fn cache_control_directive(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::None => "no-store",
        }
    }
}

/// `Cache-Control` policy for a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub scope: CacheScope,
    pub max_age: Duration,
    pub shared_max_age: Option<Duration>,
    pub immutable: bool,
}

impl CachePolicy {
    pub fn new(scope: CacheScope, max_age: Duration) -> Self {
        Self {
            scope,
            max_age,
            shared_max_age: None,
            immutable: false,
        }
    }

    pub fn pass_through() -> Self {
        Self::new(CacheScope::Public, PASS_THROUGH_MAX_AGE).with_immutable()
    }

    pub fn managed() -> Self {
        Self::new(CacheScope::Public, MANAGED_MAX_AGE).with_shared_max_age(MANAGED_SHARED_MAX_AGE)
    }

    /// For responses that must be recomputed on every request.
    pub fn no_store() -> Self {
        Self::new(CacheScope::None, Duration::ZERO)
    }

    pub fn with_shared_max_age(mut self, ttl: Duration) -> Self {
        self.shared_max_age = Some(ttl);
        self
    }

    pub fn with_immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Generate Cache-Control header value.
    pub fn cache_control_header(&self) -> String {
        if self.scope == CacheScope::None {
            return "no-store".to_string();
        }

        let mut parts = vec![self.scope.cache_control_directive().to_string()];
        parts.push(format!("max-age={}", self.max_age.as_secs()));

        if let Some(shared) = self.shared_max_age {
            parts.push(format!("s-maxage={}", shared.as_secs()));
        }

        if self.immutable {
            parts.push("immutable".to_string());
        }

        parts.join(", ")
    }
}
