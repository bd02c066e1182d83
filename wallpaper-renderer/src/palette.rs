//! Colors and the keyword palette table.

use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Build a color from a `0xRRGGBB` literal.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Four-color gradient palette, darkest stop first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [Color; 4]);

impl Palette {
    /// Build a palette from four `0xRRGGBB` literals.
    #[must_use]
    pub const fn hex(colors: [u32; 4]) -> Self {
        Self([
            Color::hex(colors[0]),
            Color::hex(colors[1]),
            Color::hex(colors[2]),
            Color::hex(colors[3]),
        ])
    }

    /// Colors in stop order.
    #[must_use]
    pub fn colors(&self) -> &[Color; 4] {
        &self.0
    }

    /// Color at `index`.
    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        self.0[index % self.0.len()]
    }
}

/// Palette used when no keyword matches.
pub const DEFAULT_PALETTE: Palette = Palette::hex([0x6366f1, 0x8b5cf6, 0xec4899, 0xf59e0b]);

const FIRE: Palette = Palette::hex([0xcc0000, 0xff3300, 0xff6600, 0xffaa00]);
const WATER: Palette = Palette::hex([0x0066cc, 0x0099ff, 0x66ccff, 0x99ddff]);
const FOREST: Palette = Palette::hex([0x228833, 0x44aa44, 0x66cc66, 0x88dd88]);
const SUN: Palette = Palette::hex([0xff6600, 0xff9900, 0xffcc00, 0xffdd44]);
const SPACE: Palette = Palette::hex([0x000033, 0x330066, 0x660099, 0x9900cc]);
const FROST: Palette = Palette::hex([0x66ccff, 0x99ddff, 0xcceeee, 0xffffff]);

/// Keyword → palette pairs in match priority order.
///
/// The first keyword contained in the lowercased prompt wins, so
/// `"ocean sunset"` resolves to the `ocean` palette.
pub const PALETTE_KEYWORDS: &[(&str, Palette)] = &[
    ("dragon", Palette::hex([0xff4444, 0xff8800, 0xffaa00, 0xff6600])),
    ("fire", FIRE),
    ("ocean", WATER),
    ("water", WATER),
    ("sea", WATER),
    ("forest", FOREST),
    ("nature", FOREST),
    ("tree", FOREST),
    ("sunset", SUN),
    ("sunrise", SUN),
    ("space", SPACE),
    ("cosmic", SPACE),
    ("galaxy", SPACE),
    ("ice", FROST),
    ("snow", FROST),
    ("mountain", Palette::hex([0x666666, 0x888888, 0xaaaaaa, 0xcccccc])),
    ("desert", Palette::hex([0xcc9966, 0xddaa77, 0xeebb88, 0xffcc99])),
    ("purple", Palette::hex([0x6600cc, 0x8833dd, 0xaa66ee, 0xcc99ff])),
    ("blue", Palette::hex([0x0066cc, 0x3388dd, 0x66aaee, 0x99ccff])),
    ("red", Palette::hex([0xcc0000, 0xdd3333, 0xee6666, 0xff9999])),
    ("green", Palette::hex([0x00cc00, 0x33dd33, 0x66ee66, 0x99ff99])),
    ("abstract", DEFAULT_PALETTE),
    ("minimal", Palette::hex([0xf8fafc, 0xe2e8f0, 0xcbd5e1, 0x94a3b8])),
];
