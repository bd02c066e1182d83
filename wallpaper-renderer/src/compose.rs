//! Procedural wallpaper composition.
//!
//! A composition picks a palette, an optional themed background and a set of
//! motifs from the prompt, draws them into an SVG document laid out on a
//! 1920×1080 reference grid, and rasterizes that document to PNG at the
//! configured output size.
//!
//! Draw order is fixed: background, motif overlays, then a faint uppercase
//! echo of the prompt's first three words.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RenderResult;
use crate::image::{encode_data_uri, normalize_texture};
use crate::keywords::{KeywordTables, Motif, Selection, Theme};
use crate::palette::Palette;
use crate::raster::{acquire_surface, rasterize_to_png};
use crate::svg::{Paint, Stop, SvgDocument, BLACK};

/// Default output width in pixels.
pub const CANVAS_WIDTH: u32 = 1920;

/// Default output height in pixels.
pub const CANVAS_HEIGHT: u32 = 1080;

/// Reference grid every shape is positioned on.
pub(crate) const VIEW_W: f64 = 1920.0;
pub(crate) const VIEW_H: f64 = 1080.0;
pub(crate) const CENTER: (f64, f64) = (VIEW_W / 2.0, VIEW_H / 2.0);

/// Configuration for a [`Composer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Seed for motif jitter. `None` draws from OS entropy, so repeated calls
    /// with the same prompt differ in detail but not in palette or motifs.
    pub seed: Option<u64>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            seed: None,
        }
    }
}

/// A rasterized composition.
#[derive(Debug, Clone)]
pub struct ComposedImage {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// What the keyword tables chose.
    pub selection: Selection,
}

impl ComposedImage {
    /// Embeddable `data:image/png;base64,...` reference.
    #[must_use]
    pub fn data_uri(&self) -> String {
        encode_data_uri("image/png", &self.png)
    }
}

/// Which composition flavor is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Still,
    Animated,
}

/// Draws wallpapers from prompts using explicit keyword tables.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    tables: KeywordTables,
    options: ComposeOptions,
}

impl Composer {
    /// Create a composer with the given tables and options.
    #[must_use]
    pub fn new(tables: KeywordTables, options: ComposeOptions) -> Self {
        Self { tables, options }
    }

    /// Create a composer with the default tables and options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Replace the jitter seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.options.seed = seed;
        self
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Keyword tables in use.
    #[must_use]
    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// Resolve palette, theme and motifs for `prompt` without drawing.
    #[must_use]
    pub fn select(&self, prompt: &str) -> Selection {
        self.tables.select(prompt)
    }

    /// Build the SVG for a still wallpaper.
    #[must_use]
    pub fn compose_svg(&self, prompt: &str) -> String {
        let selection = self.select(prompt);
        self.still_svg(prompt, &selection, &mut self.rng())
    }

    /// Compose a still wallpaper.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Context`](crate::RenderError::Context) if the
    /// drawing surface cannot be acquired, or an encoding error.
    pub fn compose(&self, prompt: &str) -> RenderResult<ComposedImage> {
        let surface = acquire_surface(self.options.width, self.options.height)?;
        let selection = self.select(prompt);
        let svg = self.still_svg(prompt, &selection, &mut self.rng());
        let png = rasterize_to_png(&svg, surface)?;
        tracing::debug!(
            "Composed still for {:?} (palette keyword {:?}, {} motifs)",
            prompt,
            selection.palette_keyword,
            selection.motifs.len()
        );
        Ok(self.finish(png, selection))
    }

    /// Compose a still wallpaper over a fetched background photo.
    ///
    /// The photo is scaled to cover the canvas and darkened top to bottom
    /// before the text overlay is drawn; keyword motifs are not drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be acquired or the texture
    /// cannot be decoded. Callers fall back to [`compose`](Self::compose).
    pub fn compose_textured(&self, prompt: &str, texture: &[u8]) -> RenderResult<ComposedImage> {
        let surface = acquire_surface(self.options.width, self.options.height)?;
        let normalized = normalize_texture(texture, self.options.width, self.options.height)?;
        let selection = self.select(prompt);

        let mut doc = self.document();
        doc.image(0.0, 0.0, VIEW_W, VIEW_H, &encode_data_uri("image/png", &normalized));
        doc.linear_gradient(
            "shade",
            (0.0, 0.0),
            (0.0, VIEW_H),
            &[
                Stop { offset: 0.0, color: BLACK, opacity: 0.3 },
                Stop { offset: 1.0, color: BLACK, opacity: 0.7 },
            ],
        );
        doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("shade"));
        draw_text_overlay(&mut doc, prompt);

        let png = rasterize_to_png(&doc.finish(), surface)?;
        Ok(self.finish(png, selection))
    }

    fn still_svg(&self, prompt: &str, selection: &Selection, rng: &mut StdRng) -> String {
        let mut doc = self.document();
        draw_background(&mut doc, Style::Still, selection, rng);
        draw_motifs(&mut doc, &selection.motifs, rng);
        draw_text_overlay(&mut doc, prompt);
        doc.finish()
    }

    pub(crate) fn document(&self) -> SvgDocument {
        SvgDocument::new(self.options.width, self.options.height, VIEW_W, VIEW_H)
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub(crate) fn finish(&self, png: Vec<u8>, selection: Selection) -> ComposedImage {
        ComposedImage {
            png,
            width: self.options.width,
            height: self.options.height,
            selection,
        }
    }
}

/// Evenly spaced stops across all palette colors.
#[allow(clippy::cast_precision_loss)]
fn palette_stops(palette: &Palette) -> Vec<Stop> {
    let colors = palette.colors();
    let last = (colors.len() - 1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| Stop::solid(i as f64 / last, *color))
        .collect()
}

pub(crate) fn draw_background(doc: &mut SvgDocument, style: Style, selection: &Selection, rng: &mut StdRng) {
    let palette = &selection.palette;
    // Where in the pulse/drift cycle this frame sits.
    let progress: f64 = rng.random();

    match selection.theme {
        Some(Theme::Waves) => {
            doc.linear_gradient(
                "bg",
                (0.0, 0.0),
                (0.0, VIEW_H),
                &[Stop::solid(0.0, palette.color(0)), Stop::solid(1.0, palette.color(1))],
            );
            doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("bg"));

            let phase = progress * TAU * 2.0;
            let mut points = vec![(0.0, CENTER.1)];
            points.extend((0..=1920u32).step_by(20).map(|x| {
                let x = f64::from(x);
                (x, CENTER.1 + (x * 0.008 + phase).sin() * 72.0)
            }));
            points.push((VIEW_W, VIEW_H));
            points.push((0.0, VIEW_H));
            doc.polygon(&points, Paint::Solid(palette.color(2), 1.0));
        }
        Some(Theme::Particles) => {
            doc.radial_gradient(
                "bg",
                CENTER,
                VIEW_W / 2.0,
                &[Stop::solid(0.0, palette.color(0)), Stop::solid(1.0, palette.color(1))],
            );
            doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("bg"));

            for i in 0..50u32 {
                let i = f64::from(i);
                let x = (i * 38.4 + progress * 240.0) % VIEW_W;
                let y = 180.0 + (progress * TAU + i * 0.5).sin() * 360.0;
                let size = (2.0 + (progress * TAU * 2.0 + i).sin() * 2.0).max(0.5) * 2.0;
                let alpha = (0.3 + (progress * TAU + i).sin() * 0.3).max(0.0);
                doc.circle(x, y, size, Paint::white(alpha));
            }
        }
        Some(Theme::PulsingRings) => {
            let pulse = 0.5 + (progress * TAU * 2.0).sin() * 0.3;
            doc.radial_gradient(
                "bg",
                CENTER,
                VIEW_W / 2.0 * pulse,
                &[Stop::solid(0.0, palette.color(0)), Stop::solid(1.0, palette.color(1))],
            );
            doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("bg"));

            let max_radius = VIEW_W / 2.0;
            for i in 0..3u32 {
                let radius = (120.0 + f64::from(i) * 192.0 + progress * 480.0) % max_radius;
                let alpha = 0.3 - radius / max_radius * 0.3;
                doc.ring(CENTER.0, CENTER.1, radius, Paint::white(alpha), 6.0);
            }
        }
        None => match style {
            Style::Still => {
                doc.radial_gradient("bg", CENTER, VIEW_W / 2.0, &palette_stops(palette));
                doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("bg"));
            }
            Style::Animated => {
                let offset = progress * VIEW_W;
                doc.linear_gradient(
                    "bg",
                    (-offset, 0.0),
                    (VIEW_W - offset, VIEW_H),
                    &palette_stops(palette),
                );
                doc.rect(0.0, 0.0, VIEW_W, VIEW_H, Paint::Gradient("bg"));
            }
        },
    }
}

pub(crate) fn draw_motifs(doc: &mut SvgDocument, motifs: &[Motif], rng: &mut StdRng) {
    for motif in motifs {
        match motif {
            Motif::Starfield => {
                for _ in 0..80 {
                    let x = rng.random::<f64>() * VIEW_W;
                    let y = rng.random::<f64>() * VIEW_H;
                    let r = rng.random::<f64>() * 4.0 + 1.0;
                    let alpha = rng.random::<f64>() * 0.8 + 0.2;
                    doc.circle(x, y, r, Paint::white(alpha));
                }
            }
            Motif::Shapes => {
                for _ in 0..15 {
                    let x = rng.random::<f64>() * 1600.0 + 160.0;
                    let y = rng.random::<f64>() * 800.0 + 140.0;
                    let w = rng.random::<f64>() * 300.0 + 80.0;
                    let h = rng.random::<f64>() * 200.0 + 60.0;
                    let alpha = rng.random::<f64>() * 0.3 + 0.1;
                    doc.rect(x, y, w, h, Paint::white(alpha));
                }
            }
            Motif::Spiral => {
                let rotation = rng.random::<f64>() * TAU;
                for i in 0..8u32 {
                    let i = f64::from(i);
                    let angle = i / 8.0 * TAU + rotation;
                    let radius = 90.0 + i * 36.0;
                    doc.circle(
                        CENTER.0 + angle.cos() * radius,
                        CENTER.1 + angle.sin() * radius,
                        9.0,
                        Paint::white(0.8 - i * 0.1),
                    );
                }
            }
            Motif::Flow => {
                let phase = rng.random::<f64>() * TAU;
                for i in 0..5u32 {
                    let i = f64::from(i);
                    let base = 216.0 + i * 144.0;
                    let points: Vec<(f64, f64)> = (0..=1920u32)
                        .step_by(48)
                        .map(|x| {
                            let x = f64::from(x);
                            (x, base + (x * 0.004 + phase + i).sin() * 54.0)
                        })
                        .collect();
                    doc.polyline(&points, Paint::white(0.4 - i * 0.05), 6.0);
                }
            }
        }
    }
}

pub(crate) fn draw_text_overlay(doc: &mut SvgDocument, prompt: &str) {
    for (i, word) in prompt.split_whitespace().take(3).enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = 400.0 + i as f64 * 100.0;
        doc.text(CENTER.0, y, 64.0, "middle", Paint::white(0.1), &word.to_uppercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::palette::{Palette, DEFAULT_PALETTE};

    fn small(seed: Option<u64>) -> Composer {
        Composer::new(
            KeywordTables::default(),
            ComposeOptions {
                width: 192,
                height: 108,
                seed,
            },
        )
    }

    const WATER: Palette = Palette::hex([0x0066cc, 0x0099ff, 0x66ccff, 0x99ddff]);

    #[test]
    fn test_ocean_sunset_uses_ocean_palette() {
        let selection = Composer::with_defaults().select("ocean sunset");
        assert_eq!(selection.palette_keyword.as_deref(), Some("ocean"));
        assert_eq!(selection.palette, WATER);
    }

    #[test]
    fn test_conflicting_keywords_first_in_table_wins() {
        // "fire" appears first in the prompt but "dragon" ranks higher.
        let selection = Composer::with_defaults().select("fire breathing dragon");
        assert_eq!(selection.palette_keyword.as_deref(), Some("dragon"));
    }

    #[test]
    fn test_unknown_prompt_uses_default_palette() {
        let selection = Composer::with_defaults().select("quiet morning coffee");
        assert_eq!(selection.palette, DEFAULT_PALETTE);
        assert!(selection.motifs.is_empty());
    }

    #[test]
    fn test_default_still_is_radial_gradient() {
        let svg = small(Some(1)).compose_svg("quiet morning coffee");
        assert!(svg.contains("<radialGradient id=\"bg\""));
        assert!(svg.contains("stop-color=\"#6366f1\""));
        assert!(svg.contains("stop-color=\"#f59e0b\""));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_text_overlay_first_three_words() {
        let svg = small(Some(1)).compose_svg("majestic dragon flying over castles");
        assert!(svg.contains(">MAJESTIC</text>"));
        assert!(svg.contains(">DRAGON</text>"));
        assert!(svg.contains(">FLYING</text>"));
        assert!(!svg.contains(">OVER</text>"));
        assert!(svg.contains("fill-opacity=\"0.100\""));
    }

    #[test]
    fn test_starfield_draws_eighty_dots() {
        // "cosmic" selects the starfield without a themed background.
        let svg = small(Some(7)).compose_svg("cosmic");
        assert_eq!(svg.matches("<circle").count(), 80);
    }

    #[test]
    fn test_shapes_motif() {
        let svg = small(Some(7)).compose_svg("geometric");
        assert_eq!(svg.matches("<rect").count(), 1 + 15);
    }

    #[test]
    fn test_wave_theme_background() {
        let svg = small(Some(3)).compose_svg("ocean waves");
        assert!(svg.contains("<linearGradient id=\"bg\""));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let a = small(Some(42)).compose_svg("abstract cosmic spiral flow");
        let b = small(Some(42)).compose_svg("abstract cosmic spiral flow");
        let c = small(Some(43)).compose_svg("abstract cosmic spiral flow");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_compose_produces_png_data_uri() {
        let image = small(Some(9)).compose("sunset over mountains").expect("compose");
        assert_eq!(&image.png[0..4], &[137, 80, 78, 71]);
        assert_eq!((image.width, image.height), (192, 108));
        assert!(image.data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(image.selection.palette_keyword.as_deref(), Some("sunset"));
    }

    #[test]
    fn test_zero_size_surface_fails() {
        let composer = Composer::new(
            KeywordTables::default(),
            ComposeOptions {
                width: 0,
                height: 108,
                seed: None,
            },
        );
        assert!(matches!(composer.compose("anything"), Err(RenderError::Context(_))));
    }

    #[test]
    fn test_textured_rejects_undecodable_texture() {
        let result = small(None).compose_textured("forest", b"<html>rate limited</html>");
        assert!(matches!(result, Err(RenderError::Resource(_))));
    }

    #[test]
    fn test_textured_composition() {
        let texture = small(Some(1)).compose("blue").expect("texture").png;
        let image = small(Some(2))
            .compose_textured("misty forest", &texture)
            .expect("textured");
        assert_eq!(&image.png[0..4], &[137, 80, 78, 71]);
    }
}
