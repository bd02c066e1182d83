//! Ordered keyword tables that drive palette, background and motif choice.
//!
//! Every table is an explicit, immutable list. Lookups test the lowercased
//! prompt for substring containment in table order, so the same prompt
//! always yields the same palette, background theme and motif set.

use crate::palette::{Palette, DEFAULT_PALETTE, PALETTE_KEYWORDS};

/// Ordered keyword → value list.
#[derive(Debug, Clone)]
pub struct KeywordTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> KeywordTable<T> {
    /// Build a table; iteration order is match priority.
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, T)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v))
                .collect(),
        }
    }

    /// First entry whose keyword occurs in `lowered`.
    #[must_use]
    pub fn first_match(&self, lowered: &str) -> Option<(&str, &T)> {
        self.entries
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(keyword, value)| (keyword.as_str(), value))
    }

    /// Keywords in priority order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: PartialEq + Copy> KeywordTable<T> {
    /// Every distinct value with at least one matching keyword, in the order
    /// its first matching entry appears.
    #[must_use]
    pub fn all_matches(&self, lowered: &str) -> Vec<T> {
        let mut out: Vec<T> = Vec::new();
        for (keyword, value) in &self.entries {
            if lowered.contains(keyword.as_str()) && !out.contains(value) {
                out.push(*value);
            }
        }
        out
    }
}

/// Themed background replacing the plain gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Two-tone vertical gradient with a filled sine wave.
    Waves,
    /// Radial glow with a drifting particle band.
    Particles,
    /// Pulsing radial glow with concentric rings.
    PulsingRings,
}

/// Overlay drawn on top of the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motif {
    /// Scattered white dots.
    Starfield,
    /// Translucent rectangles.
    Shapes,
    /// Rotated arm of dots around the center.
    Spiral,
    /// Stacked sine-wave strokes.
    Flow,
}

/// All keyword tables used by the composer.
#[derive(Debug, Clone)]
pub struct KeywordTables {
    /// First match picks the palette.
    pub palettes: KeywordTable<Palette>,
    /// First match picks a themed background.
    pub themes: KeywordTable<Theme>,
    /// Every matching motif is drawn, in table order.
    pub motifs: KeywordTable<Motif>,
    /// Palette used when nothing matches.
    pub default_palette: Palette,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            palettes: KeywordTable::new(PALETTE_KEYWORDS.iter().copied()),
            themes: KeywordTable::new([
                ("wave", Theme::Waves),
                ("ocean", Theme::Waves),
                ("water", Theme::Waves),
                ("particle", Theme::Particles),
                ("space", Theme::Particles),
                ("star", Theme::Particles),
                ("pulse", Theme::PulsingRings),
                ("glow", Theme::PulsingRings),
                ("light", Theme::PulsingRings),
            ]),
            motifs: KeywordTable::new([
                ("space", Motif::Starfield),
                ("cosmic", Motif::Starfield),
                ("star", Motif::Starfield),
                ("abstract", Motif::Shapes),
                ("geometric", Motif::Shapes),
                ("spiral", Motif::Spiral),
                ("swirl", Motif::Spiral),
                ("flow", Motif::Flow),
                ("stream", Motif::Flow),
            ]),
            default_palette: DEFAULT_PALETTE,
        }
    }
}

/// What the tables chose for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Keyword that picked the palette, if any.
    pub palette_keyword: Option<String>,
    /// Chosen palette.
    pub palette: Palette,
    /// Themed background, if any keyword matched.
    pub theme: Option<Theme>,
    /// Overlays in draw order.
    pub motifs: Vec<Motif>,
}

impl KeywordTables {
    /// Resolve palette, theme and motifs for `prompt`.
    #[must_use]
    pub fn select(&self, prompt: &str) -> Selection {
        let lowered = prompt.to_lowercase();
        let (palette_keyword, palette) = match self.palettes.first_match(&lowered) {
            Some((keyword, palette)) => (Some(keyword.to_string()), *palette),
            None => (None, self.default_palette),
        };
        Selection {
            palette_keyword,
            palette,
            theme: self.themes.first_match(&lowered).map(|(_, theme)| *theme),
            motifs: self.motifs.all_matches(&lowered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_respects_table_order() {
        let table = KeywordTable::new([("b", 2), ("a", 1)]);
        assert_eq!(table.first_match("a b"), Some(("b", &2)));
        assert_eq!(table.first_match("zzz"), None);
    }

    #[test]
    fn test_keywords_lowercased() {
        let table = KeywordTable::new([("Ocean", 1)]);
        assert_eq!(table.keywords().collect::<Vec<_>>(), vec!["ocean"]);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_all_matches_dedupes_in_table_order() {
        let tables = KeywordTables::default();
        let motifs = tables.motifs.all_matches("a swirling cosmic star stream");
        assert_eq!(motifs, vec![Motif::Starfield, Motif::Spiral, Motif::Flow]);
    }

    #[test]
    fn test_select_default() {
        let selection = KeywordTables::default().select("quiet morning");
        assert_eq!(selection.palette, DEFAULT_PALETTE);
        assert!(selection.palette_keyword.is_none());
        assert!(selection.theme.is_none());
        assert!(selection.motifs.is_empty());
    }

    #[test]
    fn test_select_is_case_insensitive() {
        let selection = KeywordTables::default().select("DRAGON Lair");
        assert_eq!(selection.palette_keyword.as_deref(), Some("dragon"));
    }

    #[test]
    fn test_theme_first_match() {
        let tables = KeywordTables::default();
        assert_eq!(tables.select("glowing star").theme, Some(Theme::Particles));
        assert_eq!(tables.select("ocean glow").theme, Some(Theme::Waves));
        assert_eq!(tables.select("soft light").theme, Some(Theme::PulsingRings));
    }

    #[test]
    fn test_custom_tables() {
        let tables = KeywordTables {
            palettes: KeywordTable::new([("neon", Palette::hex([0xff00ff, 0x00ffff, 0xffff00, 0x000000]))]),
            ..KeywordTables::default()
        };
        let selection = tables.select("neon fire");
        assert_eq!(selection.palette_keyword.as_deref(), Some("neon"));
    }
}
