//! Asset proxy query-string extraction.

use percent_encoding::percent_decode_str;
use shelf_core::SignedAssetRef;
use url::form_urlencoded;

/// Parameters that may follow `url`. Their first occurrence marks the end of
/// the `url` value.
const TRAILING_MARKERS: [&str; 3] = ["&pageId=", "&property=", "&cover="];

/// Parsed asset proxy request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    /// Decoded image URL; `None` when absent or empty.
    pub url: Option<String>,
    pub page_id: Option<String>,
    pub property: Option<String>,
    /// Only the literal `true` sets this.
    pub cover: bool,
}

impl AssetQuery {
    /// Parse a raw query string (with or without the leading `?`).
    ///
    /// The `url` value may itself contain `&` when the caller did not encode
    /// it, so its end is located by searching for the known trailing
    /// parameter names rather than splitting on `&`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);

        let Some(start) = find_url_param(raw) else {
            return Self::from_params(raw, None);
        };

        let value_start = start + "url=".len();
        let value = &raw[value_start..];
        let value_len = TRAILING_MARKERS
            .iter()
            .filter_map(|marker| value.find(marker))
            .min()
            .unwrap_or(value.len());

        let encoded = &value[..value_len];
        let decoded = percent_decode_str(encoded)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| encoded.to_string());

        let rest = format!("{}{}", &raw[..start], &value[value_len..]);
        Self::from_params(&rest, Some(decoded).filter(|u| !u.is_empty()))
    }

    fn from_params(params: &str, url: Option<String>) -> Self {
        let mut query = Self {
            url,
            ..Self::default()
        };
        for (key, value) in form_urlencoded::parse(params.as_bytes()) {
            match key.as_ref() {
                "pageId" if query.page_id.is_none() && !value.is_empty() => {
                    query.page_id = Some(value.into_owned())
                }
                "property" if query.property.is_none() && !value.is_empty() => {
                    query.property = Some(value.into_owned())
                }
                "cover" => query.cover = value == "true",
                _ => {}
            }
        }
        query
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_cover(mut self, cover: bool) -> Self {
        self.cover = cover;
        self
    }

    /// The record/property owning the asset; cover wins over property.
    pub fn asset_ref(&self) -> Option<SignedAssetRef> {
        let page_id = self.page_id.as_deref()?;
        if self.cover {
            Some(SignedAssetRef::cover(page_id))
        } else {
            self.property
                .as_deref()
                .map(|name| SignedAssetRef::property(page_id, name))
        }
    }
}

/// Offset of a `url=` parameter at the start or after a `&`.
fn find_url_param(raw: &str) -> Option<usize> {
    if raw.starts_with("url=") {
        return Some(0);
    }
    raw.find("&url=").map(|i| i + 1)
}
