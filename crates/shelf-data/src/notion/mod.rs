//! Notion API client and wire model.

mod client;
mod model;
mod properties;

pub use client::*;
pub use model::*;
