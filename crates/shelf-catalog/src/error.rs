//! Catalog errors. Never escape `fetch_catalog`.

use shelf_data::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A collection query failed part-way through pagination.
    #[error("collection query failed on page {page}: {source}")]
    Query {
        page: u32,
        #[source]
        source: FetchError,
    },
}

impl CatalogError {
    /// The request was abandoned at the client-side deadline.
    pub fn is_aborted(&self) -> bool {
        match self {
            Self::Query { source, .. } => source.is_timeout(),
        }
    }
}
