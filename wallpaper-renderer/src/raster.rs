//! SVG → PNG rasterization via resvg/tiny-skia.

use std::sync::{Arc, OnceLock};

use crate::error::{RenderError, RenderResult};

/// Shared font database, loaded from the system once per process.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!("Loaded {} font faces for text overlays", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Allocate the drawing surface for one composition.
///
/// # Errors
///
/// Returns [`RenderError::Context`] if a pixmap of this size cannot be
/// created (zero or oversized dimensions).
pub fn acquire_surface(width: u32, height: u32) -> RenderResult<tiny_skia::Pixmap> {
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        RenderError::Context(format!("cannot allocate a {width}x{height} surface"))
    })
}

/// Draw `svg` onto `pixmap` and encode the result as PNG.
///
/// # Errors
///
/// Returns an error if the SVG cannot be parsed or the PNG cannot be encoded.
#[allow(clippy::cast_precision_loss)]
pub fn rasterize_to_png(svg: &str, mut pixmap: tiny_skia::Pixmap) -> RenderResult<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

    let sx = pixmap.width() as f32 / tree.size().width();
    let sy = pixmap.height() as f32 / tree.size().height();
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
}
