//! Raw record → `Product`.

use shelf_core::{Category, CoverOrigin, Product};
use shelf_data::Page;

use crate::fields::{
    resolve, resolve_price, resolve_value, FieldSource, BRAND_SOURCES, CATEGORY_SOURCES,
    COVER_SOURCES, DARK_COVER_SOURCES, DATE_SOURCES, NAME_SOURCES, NOTE_SOURCES, URL_SOURCES,
};

/// Map one raw record onto the product schema.
///
/// Total: every missing field takes its documented default.
pub fn normalize_page(page: &Page) -> Product {
    let name = resolve_value(page, NAME_SOURCES).unwrap_or_default();

    let (cover, origin) = match resolve(page, COVER_SOURCES) {
        Some((url, source)) => (url, source.cover_origin()),
        None => ("", CoverOrigin::Missing),
    };

    let date = resolve_value(page, DATE_SOURCES).unwrap_or(page.created_time.as_str());

    let mut product = Product::new(page.id.as_str(), name.trim())
        .with_brand(resolve_value(page, BRAND_SOURCES))
        .with_category(Category::normalize_opt(resolve_value(page, CATEGORY_SOURCES)))
        .with_price(resolve_price(page).unwrap_or(0.0))
        .with_note(resolve_value(page, NOTE_SOURCES).unwrap_or_default())
        .with_url(resolve_value(page, URL_SOURCES).map(str::to_string))
        .with_cover(cover, origin)
        .with_dates(date, page.created_time.as_str());

    if let Some((url, FieldSource::Files(property))) = resolve(page, DARK_COVER_SOURCES) {
        product = product.with_dark_cover(url, property);
    }

    product
}
