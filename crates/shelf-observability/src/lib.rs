//! Observability for the product showcase services.
//!
//! This crate provides:
//! - `StructuredLogger` - Request-scoped structured logging (JSON or human)
//! - `LogBuilder` - Fluent API for entries with typed fields
//! - `LogSink` - Where entries go: stderr, or memory for tests

mod logging;

pub use logging::*;

// Re-export RequestId from shelf-core for convenience
pub use shelf_core::RequestId;
