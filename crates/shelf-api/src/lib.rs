//! HTTP surface of the product showcase, independent of the hosting runtime.
//!
//! This crate provides:
//! - `Route` - Matching of inbound method and path onto an endpoint
//! - `ApiRequest` / `ApiResponse` - Plain request and response values
//! - `ShowcaseApi` - Dispatch onto the catalog sync engine and asset resolver
//!
//! Endpoints:
//! - `GET /api/products` - Product catalog
//! - `GET /api/products/status` - Configuration and connectivity report
//! - `GET /api/images?url=...` - Image proxy with signed URL refresh

mod handlers;
mod request;
mod response;
mod routes;
mod server;

pub use request::*;
pub use response::*;
pub use routes::*;
pub use server::*;
