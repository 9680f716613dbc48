//! Typed accessors over raw page properties.
//!
//! Each accessor returns `None` when the property is missing, has another
//! shape, or holds an empty value.

use serde_json::Value;

use super::model::Page;

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    fn first_plain_text(&self, name: &str, kind: &str) -> Option<&str> {
        self.property(name)?
            .get(kind)?
            .get(0)?
            .get("plain_text")?
            .as_str()
            .and_then(non_empty)
    }

    /// First fragment of a `title` property.
    pub fn title(&self, name: &str) -> Option<&str> {
        self.first_plain_text(name, "title")
    }

    /// First fragment of a `rich_text` property.
    pub fn rich_text(&self, name: &str) -> Option<&str> {
        self.first_plain_text(name, "rich_text")
    }

    /// Name of a `select` option.
    pub fn select(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .get("select")?
            .get("name")?
            .as_str()
            .and_then(non_empty)
    }

    /// Name of the first `multi_select` option.
    pub fn first_multi_select(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .get("multi_select")?
            .get(0)?
            .get("name")?
            .as_str()
            .and_then(non_empty)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name)?.get("number")?.as_f64()
    }

    /// Value of a `url` property.
    pub fn url_value(&self, name: &str) -> Option<&str> {
        self.property(name)?.get("url")?.as_str().and_then(non_empty)
    }

    /// `start` of a `date` property.
    pub fn date_start(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .get("date")?
            .get("start")?
            .as_str()
            .and_then(non_empty)
    }

    /// URL of the first entry of a `files` property, hosted before external.
    pub fn first_file_url(&self, name: &str) -> Option<&str> {
        let first = self.property(name)?.get("files")?.get(0)?;
        first
            .get("file")
            .and_then(|f| f.get("url"))
            .and_then(Value::as_str)
            .and_then(non_empty)
            .or_else(|| {
                first
                    .get("external")
                    .and_then(|f| f.get("url"))
                    .and_then(Value::as_str)
                    .and_then(non_empty)
            })
    }

    /// URL of the page-level cover.
    pub fn cover_url(&self) -> Option<&str> {
        self.cover.as_ref().map(|c| c.url()).and_then(non_empty)
    }
}
