//! Generated items - the records behind every composed wallpaper.

use serde::{Deserialize, Serialize};

/// Which list an item belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A still wallpaper.
    #[default]
    Image,
    /// A single-frame pseudo-animated wallpaper.
    Animated,
}

impl ItemKind {
    /// Both kinds, in favorites aggregation order.
    pub const ALL: [Self; 2] = [Self::Image, Self::Animated];

    /// Storage key holding this kind's list.
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Image => "generated-images",
            Self::Animated => "generated-gifs",
        }
    }

    /// Label used in synthesized filenames.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Animated => "animated",
        }
    }

    /// File extension for downloads of this kind.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Animated => "gif",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "wallpaper" | "png" => Ok(Self::Image),
            "animated" | "gif" => Ok(Self::Animated),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// One composed image and its metadata.
///
/// Serialized with camelCase keys so lists stay readable by any consumer of
/// the `generated-images` / `generated-gifs` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    /// Time-derived identifier, unique within its list.
    pub id: String,
    /// Data URI, `blob:` reference or remote URL.
    pub url: String,
    /// Trimmed prompt the image was generated from.
    pub prompt: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Set only by explicit user action.
    #[serde(default)]
    pub is_favorite: bool,
}

impl GeneratedItem {
    /// Create a non-favorite item.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        prompt: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            prompt: prompt.into(),
            timestamp,
            is_favorite: false,
        }
    }
}

/// Read-time projection of a favorite item from either list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteItem {
    /// Item identifier within its source list.
    pub id: String,
    /// Image reference.
    pub url: String,
    /// Prompt text.
    pub prompt: String,
    /// Creation time in milliseconds.
    pub timestamp: i64,
    /// Source list.
    pub kind: ItemKind,
}

impl FavoriteItem {
    pub(crate) fn from_item(item: &GeneratedItem, kind: ItemKind) -> Self {
        Self {
            id: item.id.clone(),
            url: item.url.clone(),
            prompt: item.prompt.clone(),
            timestamp: item.timestamp,
            kind,
        }
    }
}

/// Which favorites to include in the aggregated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteFilter {
    /// Favorites from both lists.
    #[default]
    All,
    /// Only one kind.
    Only(ItemKind),
}

impl FavoriteFilter {
    /// Whether a favorite of `kind` passes this filter.
    #[must_use]
    pub fn accepts(self, kind: ItemKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}
