//! Re-resolving an expired signed URL from its owning record.

use shelf_catalog::NotionSource;
use shelf_core::{AssetTarget, ShowcaseConfig, SignedAssetRef};
use shelf_data::HttpTransport;
use shelf_observability::StructuredLogger;

/// Looks up the current URL of an asset.
pub struct UrlRefresher<T: HttpTransport> {
    source: NotionSource<T>,
    page_size: u32,
    max_pages: u32,
}

impl<T: HttpTransport> UrlRefresher<T> {
    pub fn new(source: NotionSource<T>, page_size: u32, max_pages: u32) -> Self {
        Self {
            source,
            page_size,
            max_pages,
        }
    }

    /// `None` when the content service is not configured.
    pub fn from_config(transport: T, config: &ShowcaseConfig) -> Option<Self> {
        NotionSource::from_config(transport, config)
            .map(|source| Self::new(source, config.page_size, config.max_pages))
    }

    /// Current URL of `asset`, or `None` when it cannot be determined.
    ///
    /// Lookup failures are logged at debug level only; the caller decides
    /// whether a missing URL is worth a warning.
    pub async fn refresh(&self, asset: &SignedAssetRef, logger: &StructuredLogger) -> Option<String> {
        let page = match self.source.retrieve_page(&asset.page_id).await {
            Ok(page) => Some(page),
            Err(err) => {
                logger
                    .debug_builder("page retrieve failed during refresh")
                    .field("page_id", &asset.page_id)
                    .field("error", err.to_string())
                    .emit();
                None
            }
        };

        match &asset.target {
            AssetTarget::Cover => page.and_then(|p| p.cover_url().map(str::to_string)),
            AssetTarget::Property(name) => {
                if let Some(url) = page.as_ref().and_then(|p| p.first_file_url(name)) {
                    return Some(url.to_string());
                }
                self.scan_for_property(&asset.page_id, name, logger).await
            }
        }
    }

    async fn scan_for_property(
        &self,
        page_id: &str,
        property: &str,
        logger: &StructuredLogger,
    ) -> Option<String> {
        match self
            .source
            .find_record(page_id, self.page_size, self.max_pages)
            .await
        {
            Ok(Some(page)) => page.first_file_url(property).map(str::to_string),
            Ok(None) => {
                logger
                    .debug_builder("record not found in collection scan")
                    .field("page_id", page_id)
                    .emit();
                None
            }
            Err(err) => {
                logger
                    .debug_builder("collection scan failed during refresh")
                    .field("page_id", page_id)
                    .field("error", err.to_string())
                    .emit();
                None
            }
        }
    }
}
