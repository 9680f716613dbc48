//! Core types for the product showcase.
//!
//! This crate provides:
//! - `Product` - The normalized catalog unit
//! - `Category` - Closed category set with synonym normalization
//! - `KnownBrand` - Recommended brand set for UI affordances
//! - `SignedAssetRef` - Identifies the record/property that owns an image
//! - `ShowcaseConfig` - Environment-provided configuration and fallback policy
//! - `sample_catalog` - Deterministic catalog used when the source is unavailable
//! - `RequestId` - Request correlation identifier

mod asset;
mod brand;
mod category;
mod config;
mod context;
mod product;
mod sample;

pub use asset::*;
pub use brand::*;
pub use category::*;
pub use config::*;
pub use context::*;
pub use product::*;
pub use sample::*;
