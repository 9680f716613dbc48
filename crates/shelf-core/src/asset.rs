//! Theme flag and signed asset references.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters left unescaped in a query component (`encodeURIComponent` set).
pub const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Visual theme of the rendering surface.
///
/// Passed explicitly into asset selection and re-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Where a product's cover URL was read from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CoverOrigin {
    /// The page-level cover object.
    PageCover,
    /// A files-typed property.
    Property { name: String },
    /// No cover was found.
    #[default]
    Missing,
}

impl CoverOrigin {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// The part of a record that holds an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetTarget {
    /// The page-level cover.
    Cover,
    /// A named files-typed property.
    Property(String),
}

/// Identifies the record and property owning a possibly-expired signed URL.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAssetRef {
    pub page_id: String,
    pub target: AssetTarget,
}

impl SignedAssetRef {
    pub fn cover(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            target: AssetTarget::Cover,
        }
    }

    pub fn property(page_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            target: AssetTarget::Property(name.into()),
        }
    }

    /// Render the asset proxy query string for `url`.
    ///
    /// `url` always comes first so the proxy can find its boundary by
    /// searching for the trailing parameter names.
    pub fn proxy_query(&self, url: &str) -> String {
        let mut query = format!(
            "url={}&pageId={}",
            utf8_percent_encode(url, QUERY_COMPONENT),
            utf8_percent_encode(&self.page_id, QUERY_COMPONENT)
        );
        match &self.target {
            AssetTarget::Cover => query.push_str("&cover=true"),
            AssetTarget::Property(name) => {
                query.push_str("&property=");
                query.extend(utf8_percent_encode(name, QUERY_COMPONENT));
            }
        }
        query
    }
}
