//! Signed-asset resolver for the product showcase.
//!
//! This crate provides:
//! - `AssetQuery` - Raw query-string extraction tolerant of embedded `&`
//! - `ManagedHosts` - Which origins serve signed, refreshable URLs
//! - `CachePolicy` - `Cache-Control` directives for proxied assets
//! - `AssetResolver` - Fetch, detect staleness, refresh once, retry once

mod cache;
mod error;
mod origin;
mod query;
mod refresh;
mod resolver;

pub use cache::*;
pub use error::*;
pub use origin::*;
pub use query::*;
pub use refresh::*;
pub use resolver::*;
