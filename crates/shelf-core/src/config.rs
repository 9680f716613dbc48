//! Environment-provided configuration.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const ENV_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_DATABASE_ID: &str = "NOTION_DATABASE_ID";
pub const ENV_API_BASE: &str = "NOTION_API_BASE";
pub const ENV_NOTION_VERSION: &str = "NOTION_VERSION";
pub const ENV_CATALOG_FALLBACK: &str = "CATALOG_FALLBACK";
pub const ENV_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";
pub const ENV_MAX_PAGES: &str = "CATALOG_MAX_PAGES";
pub const ENV_FETCH_TIMEOUT_MS: &str = "FETCH_TIMEOUT_MS";
pub const ENV_MANAGED_HOSTS: &str = "ASSET_MANAGED_HOSTS";
pub const ENV_ALLOW_PRIVATE_ORIGINS: &str = "ASSET_ALLOW_PRIVATE_ORIGINS";

/// Every key read by [`ShowcaseConfig::from_lookup`].
pub const CONFIG_KEYS: &[&str] = &[
    ENV_API_KEY,
    ENV_DATABASE_ID,
    ENV_API_BASE,
    ENV_NOTION_VERSION,
    ENV_CATALOG_FALLBACK,
    ENV_PAGE_SIZE,
    ENV_MAX_PAGES,
    ENV_FETCH_TIMEOUT_MS,
    ENV_MANAGED_HOSTS,
    ENV_ALLOW_PRIVATE_ORIGINS,
];

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 500;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MANAGED_HOSTS: &[&str] =
    &["*.amazonaws.com", "amazonaws.com", "notion.so", "*.notion.so"];

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// What the catalog endpoint returns when a configured fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFallback {
    /// HTTP 200 with the sample catalog.
    #[default]
    Sample,
    /// HTTP 500 with `{error, products: []}`.
    Strict,
}

impl CatalogFallback {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sample" => Some(Self::Sample),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Strict => "strict",
        }
    }
}

/// Runtime configuration for the showcase services.
#[derive(Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    /// Notion integration secret. Never logged.
    pub api_key: Option<String>,
    /// Catalog collection id.
    pub database_id: Option<String>,
    pub api_base: String,
    pub notion_version: String,
    pub fallback: CatalogFallback,
    /// Records per catalog page (1..=100).
    pub page_size: u32,
    /// Pagination safety cap.
    pub max_pages: u32,
    /// Client-side abort for every outbound request.
    pub fetch_timeout: Duration,
    /// Host patterns whose URLs are treated as signed, refreshable assets.
    pub managed_hosts: Vec<String>,
    pub allow_private_origins: bool,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            database_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            fallback: CatalogFallback::default(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            managed_hosts: DEFAULT_MANAGED_HOSTS.iter().map(|h| h.to_string()).collect(),
            allow_private_origins: false,
        }
    }
}

impl fmt::Debug for ShowcaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowcaseConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("database_id", &self.database_id)
            .field("api_base", &self.api_base)
            .field("notion_version", &self.notion_version)
            .field("fallback", &self.fallback)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("managed_hosts", &self.managed_hosts)
            .field("allow_private_origins", &self.allow_private_origins)
            .finish()
    }
}

impl ShowcaseConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self {
            api_key: get(ENV_API_KEY),
            database_id: get(ENV_DATABASE_ID),
            ..Self::default()
        };

        if let Some(base) = get(ENV_API_BASE) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(version) = get(ENV_NOTION_VERSION) {
            config.notion_version = version;
        }
        if let Some(raw) = get(ENV_CATALOG_FALLBACK) {
            config.fallback = CatalogFallback::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_CATALOG_FALLBACK, &raw, "expected sample or strict")
            })?;
        }
        if let Some(raw) = get(ENV_PAGE_SIZE) {
            let size: u32 = parse_number(ENV_PAGE_SIZE, &raw)?;
            config.page_size = size.clamp(1, MAX_PAGE_SIZE);
        }
        if let Some(raw) = get(ENV_MAX_PAGES) {
            let pages: u32 = parse_number(ENV_MAX_PAGES, &raw)?;
            if pages == 0 {
                return Err(ConfigError::invalid(ENV_MAX_PAGES, &raw, "must be at least 1"));
            }
            config.max_pages = pages;
        }
        if let Some(raw) = get(ENV_FETCH_TIMEOUT_MS) {
            let ms: u64 = parse_number(ENV_FETCH_TIMEOUT_MS, &raw)?;
            if ms == 0 {
                return Err(ConfigError::invalid(ENV_FETCH_TIMEOUT_MS, &raw, "must be positive"));
            }
            config.fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(raw) = get(ENV_MANAGED_HOSTS) {
            config.managed_hosts = raw
                .split(',')
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect();
        }
        if let Some(raw) = get(ENV_ALLOW_PRIVATE_ORIGINS) {
            config.allow_private_origins = parse_flag(ENV_ALLOW_PRIVATE_ORIGINS, &raw)?;
        }

        Ok(config)
    }

    /// Credential and collection id, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.database_id) {
            (Some(key), Some(db)) => Some((key.as_str(), db.as_str())),
            _ => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, database_id: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.database_id = Some(database_id.into());
        self
    }

    pub fn with_fallback(mut self, fallback: CatalogFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_allow_private_origins(mut self, allow: bool) -> Self {
        self.allow_private_origins = allow;
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::invalid(key, raw, "expected a non-negative integer"))
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw, "expected a boolean")),
    }
}
