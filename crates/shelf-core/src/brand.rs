//! Recommended brand labels.

use std::fmt;

/// Brands the UI has dedicated affordances for (filter chips, logos).
///
/// Product brands stay free strings; this set is only a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBrand {
    Apple,
    Floyd,
    Ikea,
    Nomatiq,
    Sharge,
    Xiaomi,
    SecretLab,
    RaybanMeta,
    Anker,
    Blunt,
    NighCollective,
}

impl KnownBrand {
    pub const ALL: [KnownBrand; 11] = [
        Self::Apple,
        Self::Floyd,
        Self::Ikea,
        Self::Nomatiq,
        Self::Sharge,
        Self::Xiaomi,
        Self::SecretLab,
        Self::RaybanMeta,
        Self::Anker,
        Self::Blunt,
        Self::NighCollective,
    ];

    /// Display label as stored in the catalog.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apple => "Apple",
            Self::Floyd => "Floyd",
            Self::Ikea => "Ikea",
            Self::Nomatiq => "Nomatiq",
            Self::Sharge => "Sharge",
            Self::Xiaomi => "Xiaomi",
            Self::SecretLab => "Secret Lab",
            Self::RaybanMeta => "Rayban Meta",
            Self::Anker => "Anker",
            Self::Blunt => "Blunt",
            Self::NighCollective => "Nigh Collective",
        }
    }

    /// Case-insensitive lookup of a raw brand string.
    pub fn lookup(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for KnownBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clean a raw brand value: trimmed, empty becomes `None`.
///
/// Recognized brands are returned with their canonical spelling.
pub fn clean_brand(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        KnownBrand::lookup(trimmed)
            .map(|b| b.label().to_string())
            .unwrap_or_else(|| trimmed.to_string()),
    )
}
