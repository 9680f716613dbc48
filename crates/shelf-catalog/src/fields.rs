//! Field-resolution cascades.
//!
//! The catalog schema has drifted over time, so every logical field lists the
//! property shapes it has been stored under, most recent first. The first
//! source yielding a non-empty value wins. Schema drift fixes belong here and
//! nowhere else.

use shelf_core::CoverOrigin;
use shelf_data::Page;

/// One place a field value can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Title(&'static str),
    RichText(&'static str),
    Select(&'static str),
    /// First option of a multi-select.
    MultiSelect(&'static str),
    Url(&'static str),
    /// `start` of a date property.
    Date(&'static str),
    /// First entry of a files property.
    Files(&'static str),
    /// The page-level cover object.
    PageCover,
}

impl FieldSource {
    pub fn read<'a>(&self, page: &'a Page) -> Option<&'a str> {
        match *self {
            Self::Title(name) => page.title(name),
            Self::RichText(name) => page.rich_text(name),
            Self::Select(name) => page.select(name),
            Self::MultiSelect(name) => page.first_multi_select(name),
            Self::Url(name) => page.url_value(name),
            Self::Date(name) => page.date_start(name),
            Self::Files(name) => page.first_file_url(name),
            Self::PageCover => page.cover_url(),
        }
    }

    /// Where a cover read from this source lives.
    pub fn cover_origin(&self) -> CoverOrigin {
        match *self {
            Self::PageCover => CoverOrigin::PageCover,
            Self::Files(name) => CoverOrigin::Property {
                name: name.to_string(),
            },
            _ => CoverOrigin::Missing,
        }
    }

    /// Property name, if the source is a property.
    pub fn property_name(&self) -> Option<&'static str> {
        match *self {
            Self::Title(n)
            | Self::RichText(n)
            | Self::Select(n)
            | Self::MultiSelect(n)
            | Self::Url(n)
            | Self::Date(n)
            | Self::Files(n) => Some(n),
            Self::PageCover => None,
        }
    }
}

pub const NAME_SOURCES: &[FieldSource] = &[
    FieldSource::Title("Product Name"),
    FieldSource::Title("Name"),
    FieldSource::Title("Title"),
];

pub const BRAND_SOURCES: &[FieldSource] = &[
    FieldSource::Select("Brand"),
    FieldSource::RichText("Brand"),
    FieldSource::Title("Brand"),
    FieldSource::Select("Vendor"),
];

pub const CATEGORY_SOURCES: &[FieldSource] = &[
    FieldSource::Select("Category"),
    FieldSource::MultiSelect("Category"),
    FieldSource::Select("Type"),
];

/// Number-typed properties holding the price.
pub const PRICE_PROPERTIES: &[&str] = &["Price"];

pub const NOTE_SOURCES: &[FieldSource] = &[
    FieldSource::RichText("Note"),
    FieldSource::RichText("Description"),
];

pub const URL_SOURCES: &[FieldSource] = &[FieldSource::Url("URL"), FieldSource::Url("Link")];

/// Falls back to the record's `created_time` when exhausted.
pub const DATE_SOURCES: &[FieldSource] = &[FieldSource::Date("Date"), FieldSource::Date("Date Added")];

/// The page cover outranks file properties.
pub const COVER_SOURCES: &[FieldSource] = &[
    FieldSource::PageCover,
    FieldSource::Files("Cover Image"),
    FieldSource::Files("Image"),
];

pub const DARK_COVER_SOURCES: &[FieldSource] = &[
    FieldSource::Files("Dark Mode Cover Image"),
    FieldSource::Files("Dark Cover Image"),
    FieldSource::Files("Dark Cover"),
];

/// First non-empty value along a cascade, with the source that produced it.
pub fn resolve<'a>(page: &'a Page, sources: &[FieldSource]) -> Option<(&'a str, FieldSource)> {
    sources
        .iter()
        .find_map(|source| source.read(page).map(|value| (value, *source)))
}

/// First non-empty value along a cascade.
pub fn resolve_value<'a>(page: &'a Page, sources: &[FieldSource]) -> Option<&'a str> {
    resolve(page, sources).map(|(value, _)| value)
}

/// First numeric price property.
pub fn resolve_price(page: &Page) -> Option<f64> {
    PRICE_PROPERTIES.iter().find_map(|name| page.number(name))
}
