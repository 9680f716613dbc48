//! Paginated catalog fetch.

use std::cmp::Ordering;

use shelf_core::{sample_catalog, Product, ShowcaseConfig};
use shelf_data::HttpTransport;
use shelf_observability::StructuredLogger;

use crate::{normalize_page, CatalogError, CatalogSnapshot, CatalogSource, NotionSource};

/// Result of a completed pagination run.
struct LiveFetch {
    products: Vec<Product>,
    pages: u32,
    truncated: bool,
}

/// Fetches the full product collection.
///
/// Pages are requested one at a time, following the server's cursor until it
/// reports no more pages or `max_pages` is reached.
pub struct CatalogSync<T: HttpTransport> {
    source: Option<NotionSource<T>>,
    page_size: u32,
    max_pages: u32,
}

impl<T: HttpTransport> CatalogSync<T> {
    pub fn new(transport: T, config: &ShowcaseConfig) -> Self {
        Self {
            source: NotionSource::from_config(transport, config),
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch the catalog. Never fails: on any error the sample catalog is
    /// substituted and the cause is logged once.
    pub async fn fetch_catalog(&self, logger: &StructuredLogger) -> CatalogSnapshot {
        let Some(source) = &self.source else {
            logger.info("catalog source not configured, serving sample catalog");
            return CatalogSnapshot {
                products: sample_catalog(),
                source: CatalogSource::Unconfigured,
            };
        };

        match self.fetch_live(source).await {
            Ok(live) => {
                if live.truncated {
                    logger
                        .warn_builder("catalog pagination hit page cap")
                        .field_u64("pages", live.pages as u64)
                        .field_u64("products", live.products.len() as u64)
                        .emit();
                } else {
                    logger
                        .info_builder("catalog fetched")
                        .field_u64("pages", live.pages as u64)
                        .field_u64("products", live.products.len() as u64)
                        .emit();
                }
                CatalogSnapshot {
                    products: live.products,
                    source: CatalogSource::Live {
                        pages: live.pages,
                        truncated: live.truncated,
                    },
                }
            }
            Err(err) => {
                let aborted = err.is_aborted();
                logger
                    .error_builder("catalog fetch failed, serving sample catalog")
                    .field("error", err.to_string())
                    .field_bool("aborted", aborted)
                    .emit();
                CatalogSnapshot {
                    products: sample_catalog(),
                    source: CatalogSource::Fallback {
                        reason: err.to_string(),
                        aborted,
                    },
                }
            }
        }
    }

    async fn fetch_live(&self, source: &NotionSource<T>) -> Result<LiveFetch, CatalogError> {
        let mut products = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let response = source
                .query_page(self.page_size, cursor.take())
                .await
                .map_err(|source| CatalogError::Query {
                    page: pages + 1,
                    source,
                })?;
            pages += 1;

            products.extend(response.results.iter().map(normalize_page));

            match response.continuation() {
                Some(next) if pages < self.max_pages => cursor = Some(next.to_string()),
                Some(_) => {
                    sort_newest_first(&mut products);
                    return Ok(LiveFetch {
                        products,
                        pages,
                        truncated: true,
                    });
                }
                None => break,
            }
        }

        sort_newest_first(&mut products);
        Ok(LiveFetch {
            products,
            pages,
            truncated: false,
        })
    }
}

/// Stable descending sort on `createdTime`; unparsable timestamps sink.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| match (a.created_at(), b.created_at()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
