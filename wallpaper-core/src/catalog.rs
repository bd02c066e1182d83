//! Premade wallpapers shipped with the app.

use serde::Serialize;

/// Catalog grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Landscapes and seascapes.
    Nature,
    /// Non-representational art.
    Abstract,
    /// Urban skylines.
    Cityscape,
    /// Illustrated scenes.
    Anime,
}

impl Category {
    /// Lowercase name used on the command line and in JSON.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Nature => "nature",
            Self::Abstract => "abstract",
            Self::Cityscape => "cityscape",
            Self::Anime => "anime",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nature" => Ok(Self::Nature),
            "abstract" => Ok(Self::Abstract),
            "cityscape" | "city" => Ok(Self::Cityscape),
            "anime" => Ok(Self::Anime),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// A remote wallpaper that can be downloaded without generating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremadeWallpaper {
    /// Stable identifier.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Remote image URL.
    pub image_url: &'static str,
    /// Catalog grouping.
    pub category: Category,
}

const CATALOG: &[PremadeWallpaper] = &[
    PremadeWallpaper {
        id: "nature-1",
        title: "Mountain Sunrise",
        description: "Serene mountain landscape with a golden sunrise and pine forest",
        image_url: "https://images.pexels.com/photos/1261728/pexels-photo-1261728.jpeg",
        category: Category::Nature,
    },
    PremadeWallpaper {
        id: "nature-2",
        title: "Ocean Waves",
        description: "Dramatic ocean waves during sunset with vibrant colors",
        image_url: "https://images.pexels.com/photos/1435752/pexels-photo-1435752.jpeg",
        category: Category::Nature,
    },
    PremadeWallpaper {
        id: "abstract-1",
        title: "Cosmic Spiral",
        description: "Abstract cosmic spiral with vibrant orange and red hues",
        image_url: "https://images.pexels.com/photos/3075993/pexels-photo-3075993.jpeg",
        category: Category::Abstract,
    },
    PremadeWallpaper {
        id: "abstract-2",
        title: "Neon Dreams",
        description: "Abstract neon patterns creating a dreamy atmosphere",
        image_url: "https://images.pexels.com/photos/2486168/pexels-photo-2486168.jpeg",
        category: Category::Abstract,
    },
    PremadeWallpaper {
        id: "cityscape-1",
        title: "Neon City",
        description: "Futuristic cityscape with neon lights and tall skyscrapers",
        image_url: "https://images.pexels.com/photos/1563256/pexels-photo-1563256.jpeg",
        category: Category::Cityscape,
    },
    PremadeWallpaper {
        id: "cityscape-2",
        title: "City Sunset",
        description: "Modern city skyline during a beautiful sunset",
        image_url: "https://images.pexels.com/photos/1519088/pexels-photo-1519088.jpeg",
        category: Category::Cityscape,
    },
    PremadeWallpaper {
        id: "anime-1",
        title: "Cherry Blossoms",
        description: "Anime-style scene with falling cherry blossoms",
        image_url: "https://images.pexels.com/photos/1440476/pexels-photo-1440476.jpeg",
        category: Category::Anime,
    },
    PremadeWallpaper {
        id: "anime-2",
        title: "Rainy Day",
        description: "Anime-inspired cityscape on a rainy evening",
        image_url: "https://images.pexels.com/photos/1624496/pexels-photo-1624496.jpeg",
        category: Category::Anime,
    },
];

/// All premade wallpapers in display order.
#[must_use]
pub fn premade_wallpapers() -> &'static [PremadeWallpaper] {
    CATALOG
}

impl PremadeWallpaper {
    /// Find a catalog entry by id.
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        CATALOG.iter().find(|w| w.id == id)
    }
}
