//! The normalized catalog product.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::{CoverOrigin, SignedAssetRef, Theme};
use crate::brand::clean_brand;
use crate::category::Category;

/// Name used when a record has no usable title.
pub const PLACEHOLDER_NAME: &str = "Untitled";

/// A product in the showcase catalog.
///
/// Produced fresh on every catalog fetch and treated as an immutable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier from the source database.
    pub id: String,
    /// Display title.
    pub name: String,
    /// Optional brand label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Category from the closed set.
    pub category: Category,
    /// Non-negative price, zero when absent.
    #[serde(default)]
    pub price: f64,
    /// Free-text annotation.
    #[serde(default)]
    pub note: String,
    /// Outbound link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Primary visual asset. May be a time-limited signed URL.
    #[serde(default)]
    pub cover_image: String,
    /// Dark theme variant of the cover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode_cover_image: Option<String>,
    /// ISO-8601 display date.
    #[serde(default)]
    pub date: String,
    /// ISO-8601 creation timestamp; authoritative for default ordering.
    #[serde(default)]
    pub created_time: String,
    /// Where `cover_image` was read from.
    #[serde(default, skip_serializing_if = "CoverOrigin::is_missing")]
    pub cover_origin: CoverOrigin,
    /// Property that held `dark_mode_cover_image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_cover_property: Option<String>,
}

impl Product {
    /// Create a product with defaults for every optional field.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            name
        };

        Self {
            id: id.into(),
            name,
            brand: None,
            category: Category::default(),
            price: 0.0,
            note: String::new(),
            url: None,
            cover_image: String::new(),
            dark_mode_cover_image: None,
            date: String::new(),
            created_time: String::new(),
            cover_origin: CoverOrigin::Missing,
            dark_cover_property: None,
        }
    }

    /// Set the brand (trimmed, empty is dropped).
    pub fn with_brand(mut self, brand: Option<&str>) -> Self {
        self.brand = clean_brand(brand);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the price; negative or non-finite values become zero.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = if price.is_finite() && price > 0.0 {
            price
        } else {
            0.0
        };
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Set the outbound link; empty strings are dropped.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_cover(mut self, url: impl Into<String>, origin: CoverOrigin) -> Self {
        let url = url.into();
        self.cover_origin = if url.is_empty() {
            CoverOrigin::Missing
        } else {
            origin
        };
        self.cover_image = url;
        self
    }

    pub fn with_dark_cover(mut self, url: impl Into<String>, property: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.dark_mode_cover_image = Some(url);
            self.dark_cover_property = Some(property.into());
        }
        self
    }

    pub fn with_dates(mut self, date: impl Into<String>, created_time: impl Into<String>) -> Self {
        self.date = date.into();
        self.created_time = created_time.into();
        self
    }

    fn uses_dark_cover(&self, theme: Theme) -> bool {
        theme.is_dark()
            && self
                .dark_mode_cover_image
                .as_deref()
                .is_some_and(|u| !u.is_empty())
    }

    /// Cover URL to display for a theme.
    pub fn cover_for(&self, theme: Theme) -> &str {
        if self.uses_dark_cover(theme) {
            self.dark_mode_cover_image.as_deref().unwrap_or(&self.cover_image)
        } else {
            &self.cover_image
        }
    }

    /// Reference to the record/property owning the cover shown for `theme`.
    pub fn asset_ref(&self, theme: Theme) -> Option<SignedAssetRef> {
        if self.uses_dark_cover(theme) {
            return self
                .dark_cover_property
                .as_ref()
                .map(|name| SignedAssetRef::property(&self.id, name));
        }

        match &self.cover_origin {
            CoverOrigin::PageCover => Some(SignedAssetRef::cover(&self.id)),
            CoverOrigin::Property { name } => Some(SignedAssetRef::property(&self.id, name)),
            CoverOrigin::Missing => None,
        }
    }

    /// Asset proxy query string for the cover shown with `theme`.
    pub fn cover_proxy_query(&self, theme: Theme) -> Option<String> {
        let url = self.cover_for(theme);
        if url.is_empty() {
            return None;
        }
        self.asset_ref(theme).map(|asset| asset.proxy_query(url))
    }

    /// Parsed creation timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_time)
    }

    /// Whether the product is a digital good.
    pub fn is_digital(&self) -> bool {
        self.category.is_digital()
    }
}

/// Parse an ISO-8601 timestamp or plain date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetTarget;

    fn product() -> Product {
        Product::new("page-1", "Desk Lamp")
            .with_cover("https://s3.amazonaws.com/a.png", CoverOrigin::Property {
                name: "Cover Image".to_string(),
            })
            .with_dates("2024-01-04", "2024-01-04T10:00:00.000Z")
    }

    #[test]
    fn test_placeholder_name() {
        assert_eq!(Product::new("x", "  ").name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_price_clamped() {
        assert_eq!(Product::new("x", "y").with_price(-3.0).price, 0.0);
        assert_eq!(Product::new("x", "y").with_price(f64::NAN).price, 0.0);
        assert_eq!(Product::new("x", "y").with_price(12.5).price, 12.5);
    }

    #[test]
    fn test_cover_for_theme() {
        let p = product();
        assert_eq!(p.cover_for(Theme::Dark), "https://s3.amazonaws.com/a.png");

        let p = p.with_dark_cover("https://s3.amazonaws.com/dark.png", "Dark Cover");
        assert_eq!(p.cover_for(Theme::Light), "https://s3.amazonaws.com/a.png");
        assert_eq!(p.cover_for(Theme::Dark), "https://s3.amazonaws.com/dark.png");
    }

    #[test]
    fn test_asset_ref_follows_theme() {
        let p = product().with_dark_cover("https://s3.amazonaws.com/dark.png", "Dark Cover");

        let light = p.asset_ref(Theme::Light).unwrap();
        assert_eq!(light.target, AssetTarget::Property("Cover Image".to_string()));

        let dark = p.asset_ref(Theme::Dark).unwrap();
        assert_eq!(dark.target, AssetTarget::Property("Dark Cover".to_string()));
    }

    #[test]
    fn test_missing_cover_has_no_ref() {
        let p = Product::new("x", "y").with_cover("", CoverOrigin::PageCover);
        assert_eq!(p.cover_origin, CoverOrigin::Missing);
        assert!(p.asset_ref(Theme::Light).is_none());
        assert!(p.cover_proxy_query(Theme::Light).is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(product()).unwrap();
        assert_eq!(json["coverImage"], "https://s3.amazonaws.com/a.png");
        assert_eq!(json["createdTime"], "2024-01-04T10:00:00.000Z");
        assert_eq!(json["category"], "essential");
        assert!(json.get("darkModeCoverImage").is_none());
    }

    #[test]
    fn test_created_at() {
        assert!(product().created_at().is_some());
        let p = Product::new("x", "y").with_dates("", "2024-01-04");
        assert!(p.created_at().is_some());
        assert!(Product::new("x", "y").created_at().is_none());
    }
}
