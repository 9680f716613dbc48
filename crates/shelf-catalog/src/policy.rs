//! Catalog snapshot and the fallback policy applied to it.

use serde::Serialize;
use shelf_core::{CatalogFallback, Product};

/// Where a snapshot's products came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CatalogSource {
    /// Fetched from the collection.
    Live {
        pages: u32,
        /// Pagination stopped at the page cap with more pages pending.
        truncated: bool,
    },
    /// Credential or collection id absent; sample catalog by design.
    Unconfigured,
    /// Fetch failed; sample catalog substituted.
    Fallback {
        reason: String,
        /// The failure was a client-side abort.
        aborted: bool,
    },
}

/// Result of one catalog fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

impl CatalogSnapshot {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, CatalogSource::Fallback { .. })
    }

    /// Apply the deployment's fallback policy to produce the endpoint reply.
    pub fn into_reply(self, policy: CatalogFallback) -> CatalogReply {
        match (&self.source, policy) {
            (CatalogSource::Fallback { reason, .. }, CatalogFallback::Strict) => {
                CatalogReply::Failed {
                    error: reason.clone(),
                }
            }
            _ => CatalogReply::Products(self.products),
        }
    }
}

/// What the catalog endpoint answers.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogReply {
    /// `200 {products}`.
    Products(Vec<Product>),
    /// `500 {error, products: []}`.
    Failed { error: String },
}

impl CatalogReply {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Products(_) => 200,
            Self::Failed { .. } => 500,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Products(products) => serde_json::json!({ "products": products }),
            Self::Failed { error } => serde_json::json!({ "error": error, "products": [] }),
        }
    }
}
