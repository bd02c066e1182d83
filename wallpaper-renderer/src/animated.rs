//! Pseudo-animated compositions.
//!
//! An "animated" wallpaper is a single still frame drawn with motion cues:
//! a drifting gradient (or themed background), flowing strokes, pulsing
//! rings and a `GIF` marker in the top-right corner. It is encoded as PNG.

use rand::rngs::StdRng;
use rand::Rng;

use crate::compose::{draw_background, draw_motifs, ComposedImage, Composer, Style, VIEW_H, VIEW_W};
use crate::error::RenderResult;
use crate::keywords::Selection;
use crate::raster::{acquire_surface, rasterize_to_png};
use crate::svg::{Paint, SvgDocument};

/// Text drawn in the corner of every animated frame.
pub const ANIMATED_MARKER: &str = "GIF";

const FLOWING_LINES: u32 = 8;
const PULSING_RINGS: u32 = 12;

impl Composer {
    /// Build the SVG for a pseudo-animated wallpaper.
    #[must_use]
    pub fn compose_animated_svg(&self, prompt: &str) -> String {
        let selection = self.select(prompt);
        self.animated_svg(&selection, &mut self.rng())
    }

    /// Compose a pseudo-animated wallpaper frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Context`](crate::RenderError::Context) if the
    /// drawing surface cannot be acquired, or an encoding error.
    pub fn compose_animated(&self, prompt: &str) -> RenderResult<ComposedImage> {
        let surface = acquire_surface(self.options().width, self.options().height)?;
        let selection = self.select(prompt);
        let svg = self.animated_svg(&selection, &mut self.rng());
        let png = rasterize_to_png(&svg, surface)?;
        tracing::debug!("Composed animated frame for {:?}", prompt);
        Ok(self.finish(png, selection))
    }

    fn animated_svg(&self, selection: &Selection, rng: &mut StdRng) -> String {
        let mut doc = self.document();
        draw_background(&mut doc, Style::Animated, selection, rng);
        draw_motifs(&mut doc, &selection.motifs, rng);
        draw_motion_cues(&mut doc, rng);
        doc.text(1850.0, 60.0, 32.0, "end", Paint::white(0.9), ANIMATED_MARKER);
        doc.finish()
    }
}

fn draw_motion_cues(doc: &mut SvgDocument, rng: &mut StdRng) {
    for i in 0..FLOWING_LINES {
        let i = f64::from(i);
        let mut points = vec![(0.0, rng.random::<f64>() * VIEW_H)];
        points.extend((0..1920u32).step_by(80).map(|x| {
            let x = f64::from(x);
            (x, (x * 0.008 + i).sin() * 150.0 + VIEW_H / 2.0)
        }));
        let alpha = rng.random::<f64>() * 0.3 + 0.1;
        doc.polyline(&points, Paint::white(alpha), 3.0);
    }

    for _ in 0..PULSING_RINGS {
        let x = rng.random::<f64>() * VIEW_W;
        let y = rng.random::<f64>() * VIEW_H;
        let r = rng.random::<f64>() * 60.0 + 25.0;
        let alpha = rng.random::<f64>() * 0.4 + 0.2;
        doc.ring(x, y, r, Paint::white(alpha), 4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeOptions;
    use crate::keywords::KeywordTables;

    fn small() -> Composer {
        Composer::new(
            KeywordTables::default(),
            ComposeOptions {
                width: 192,
                height: 108,
                seed: Some(5),
            },
        )
    }

    #[test]
    fn test_animated_has_marker_and_motion_cues() {
        let svg = small().compose_animated_svg("quiet morning");
        assert!(svg.contains(">GIF</text>"));
        assert!(svg.contains("text-anchor=\"end\""));
        assert_eq!(svg.matches("<polyline").count(), 8);
        assert_eq!(svg.matches("fill=\"none\" stroke=").count(), 8 + 12);
    }

    #[test]
    fn test_animated_default_background_is_linear() {
        let svg = small().compose_animated_svg("quiet morning");
        assert!(svg.contains("<linearGradient id=\"bg\""));
        assert!(!svg.contains("<radialGradient"));
    }

    #[test]
    fn test_animated_uses_theme_and_motifs() {
        let svg = small().compose_animated_svg("space");
        assert!(svg.contains("<radialGradient id=\"bg\""));
        // 50 particles, 80 stars, 12 rings.
        assert_eq!(svg.matches("<circle").count(), 50 + 80 + 12);
    }

    #[test]
    fn test_animated_has_no_prompt_echo() {
        let svg = small().compose_animated_svg("neon city");
        assert!(!svg.contains(">NEON</text>"));
    }

    #[test]
    fn test_compose_animated_png() {
        let image = small().compose_animated("sunset").expect("animated");
        assert_eq!(&image.png[0..4], &[137, 80, 78, 71]);
        assert_eq!(image.selection.palette_keyword.as_deref(), Some("sunset"));
    }
}
