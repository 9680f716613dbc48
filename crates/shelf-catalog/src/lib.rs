//! Catalog sync engine for the product showcase.
//!
//! This crate provides:
//! - `CatalogSync` - Paginated collection fetch that never fails its caller
//! - `CatalogSnapshot` - Products plus where they came from
//! - `normalize_page` - Tolerant mapping of a raw record onto `Product`
//! - `NotionSource` - Configured client + collection id, shared with the asset resolver
//! - `check_status` - Configuration and connectivity health report

mod error;
mod fields;
mod normalize;
mod policy;
mod source;
mod status;
mod sync;

pub use error::*;
pub use fields::*;
pub use normalize::*;
pub use policy::*;
pub use source::*;
pub use status::*;
pub use sync::*;
