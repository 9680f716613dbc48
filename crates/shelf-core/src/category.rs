//! Closed category set for catalog products.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Product category.
///
/// Downstream rendering switches exhaustively on this enum, so every raw value
/// coming from the catalog source is folded into one of these members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Tech,
    Home,
    Workspace,
    Pet,
    /// Default bucket for unknown values.
    #[default]
    Essential,
    Wishlist,
    Game,
    Software,
    Watchlist,
}

/// Raw spellings folded onto a canonical name before the membership test.
const SYNONYMS: &[(&str, &str)] = &[
    ("games", "game"),
    ("sw", "software"),
    ("essentials", "essential"),
    ("watch list", "watchlist"),
    ("watch-list", "watchlist"),
    ("wish list", "wishlist"),
];

impl Category {
    /// Every member, in display order.
    pub const ALL: [Category; 9] = [
        Self::Tech,
        Self::Home,
        Self::Workspace,
        Self::Pet,
        Self::Essential,
        Self::Wishlist,
        Self::Game,
        Self::Software,
        Self::Watchlist,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Home => "home",
            Self::Workspace => "workspace",
            Self::Pet => "pet",
            Self::Essential => "essential",
            Self::Wishlist => "wishlist",
            Self::Game => "game",
            Self::Software => "software",
            Self::Watchlist => "watchlist",
        }
    }

    /// Parse a canonical name. Returns `None` for anything outside the set.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Normalize an arbitrary raw value.
    ///
    /// Trims, lower-cases, applies the synonym table and falls back to the
    /// default category. Total and idempotent.
    pub fn normalize(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        let folded = SYNONYMS
            .iter()
            .find(|(from, _)| *from == lowered)
            .map(|(_, to)| *to)
            .unwrap_or(lowered.as_str());

        Self::from_canonical(folded).unwrap_or_default()
    }

    /// Normalize an optional raw value; absent values take the default.
    pub fn normalize_opt(raw: Option<&str>) -> Self {
        raw.map(Self::normalize).unwrap_or_default()
    }

    /// Digital goods are rendered without price/brand affordances.
    pub fn is_digital(&self) -> bool {
        matches!(self, Self::Game | Self::Software | Self::Watchlist)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}
