//! Outbound HTTP for the product showcase.
//!
//! This crate provides:
//! - `OutboundRequest` / `Response` - Transport-neutral request and response values
//! - `HttpTransport` - The seam every outbound call goes through
//! - `FetchClient` - Default headers, timeouts and redirect following over a transport
//! - `SpinTransport` - Spin outbound HTTP (wasm32 only)
//! - `MockTransport` - Scripted in-memory transport for tests and offline runs
//! - `NotionClient` - Typed collection query and page retrieval
//!
//! # Example
//!
//! ```rust,ignore
//! use shelf_data::{FetchClient, NotionClient, QueryOptions, SpinTransport};
//!
//! let client = NotionClient::new(FetchClient::new(SpinTransport), api_key);
//! let page = client
//!     .query_database(database_id, &QueryOptions::newest_first(100))
//!     .await?;
//! ```

mod client;
mod error;
pub mod mock;
pub mod notion;
mod request;
mod response;
mod timeout;
mod transport;

pub use client::*;
pub use error::*;
pub use mock::MockTransport;
pub use notion::*;
pub use request::*;
pub use response::*;
pub use timeout::*;
pub use transport::*;
