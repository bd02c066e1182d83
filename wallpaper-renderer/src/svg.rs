//! Minimal SVG document writer used by the composer.

use std::fmt::Write;

use crate::palette::Color;

/// Paint for fills and strokes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Paint<'a> {
    /// Solid color with opacity.
    Solid(Color, f64),
    /// Reference to a gradient defined earlier in the document.
    Gradient(&'a str),
}

pub(crate) const WHITE: Color = Color::hex(0xffffff);
pub(crate) const BLACK: Color = Color::hex(0x000000);

impl Paint<'_> {
    pub(crate) fn white(opacity: f64) -> Self {
        Paint::Solid(WHITE, opacity)
    }
}

/// Gradient color stop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stop {
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

impl Stop {
    pub(crate) fn solid(offset: f64, color: Color) -> Self {
        Self {
            offset,
            color,
            opacity: 1.0,
        }
    }
}

/// SVG document in a fixed reference coordinate space scaled to the output
/// size.
pub(crate) struct SvgDocument {
    buf: String,
}

impl SvgDocument {
    pub(crate) fn new(out_w: u32, out_h: u32, view_w: f64, view_h: f64) -> Self {
        let mut buf = String::with_capacity(16 * 1024);
        let _ = write!(
            buf,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\" preserveAspectRatio=\"none\">",
        );
        Self { buf }
    }

    pub(crate) fn linear_gradient(&mut self, id: &str, from: (f64, f64), to: (f64, f64), stops: &[Stop]) {
        let _ = write!(
            self.buf,
            "<defs><linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
            from.0, from.1, to.0, to.1,
        );
        self.stops(stops);
        self.buf.push_str("</linearGradient></defs>");
    }

    pub(crate) fn radial_gradient(&mut self, id: &str, center: (f64, f64), radius: f64, stops: &[Stop]) {
        let _ = write!(
            self.buf,
            "<defs><radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{0}\" cy=\"{1}\" fx=\"{0}\" fy=\"{1}\" r=\"{radius}\">",
            center.0, center.1,
        );
        self.stops(stops);
        self.buf.push_str("</radialGradient></defs>");
    }

    fn stops(&mut self, stops: &[Stop]) {
        for stop in stops {
            let _ = write!(
                self.buf,
                "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
                stop.offset, stop.color, stop.opacity,
            );
        }
    }

    pub(crate) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint<'_>) {
        let _ = write!(self.buf, "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\"");
        self.fill(paint);
        self.buf.push_str("/>");
    }

    pub(crate) fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: Paint<'_>) {
        let _ = write!(self.buf, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\"");
        self.fill(paint);
        self.buf.push_str("/>");
    }

    pub(crate) fn ring(&mut self, cx: f64, cy: f64, r: f64, stroke: Paint<'_>, width: f64) {
        let _ = write!(self.buf, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"none\"");
        self.stroke(stroke, width);
        self.buf.push_str("/>");
    }

    pub(crate) fn polyline(&mut self, points: &[(f64, f64)], stroke: Paint<'_>, width: f64) {
        self.buf.push_str("<polyline points=\"");
        self.points(points);
        self.buf.push_str("\" fill=\"none\"");
        self.stroke(stroke, width);
        self.buf.push_str("/>");
    }

    pub(crate) fn polygon(&mut self, points: &[(f64, f64)], paint: Paint<'_>) {
        self.buf.push_str("<polygon points=\"");
        self.points(points);
        self.buf.push('"');
        self.fill(paint);
        self.buf.push_str("/>");
    }

    pub(crate) fn text(&mut self, x: f64, y: f64, size: f64, anchor: &str, paint: Paint<'_>, content: &str) {
        let _ = write!(
            self.buf,
            "<text x=\"{x}\" y=\"{y}\" font-size=\"{size}\" font-weight=\"bold\" font-family=\"Arial, Helvetica, sans-serif\" text-anchor=\"{anchor}\"",
        );
        self.fill(paint);
        let _ = write!(self.buf, ">{}</text>", escape_xml(content));
    }

    pub(crate) fn image(&mut self, x: f64, y: f64, w: f64, h: f64, href: &str) {
        let _ = write!(
            self.buf,
            "<image x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"none\" href=\"{}\"/>",
            escape_xml(href),
        );
    }

    pub(crate) fn finish(mut self) -> String {
        self.buf.push_str("</svg>");
        self.buf
    }

    fn points(&mut self, points: &[(f64, f64)]) {
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                self.buf.push(' ');
            }
            let _ = write!(self.buf, "{x:.2},{y:.2}");
        }
    }

    fn fill(&mut self, paint: Paint<'_>) {
        match paint {
            Paint::Solid(color, opacity) => {
                let _ = write!(self.buf, " fill=\"{color}\" fill-opacity=\"{opacity:.3}\"");
            }
            Paint::Gradient(id) => {
                let _ = write!(self.buf, " fill=\"url(#{id})\"");
            }
        }
    }

    fn stroke(&mut self, paint: Paint<'_>, width: f64) {
        match paint {
            Paint::Solid(color, opacity) => {
                let _ = write!(
                    self.buf,
                    " stroke=\"{color}\" stroke-opacity=\"{opacity:.3}\" stroke-width=\"{width}\"",
                );
            }
            Paint::Gradient(id) => {
                let _ = write!(self.buf, " stroke=\"url(#{id})\" stroke-width=\"{width}\"");
            }
        }
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wraps_viewbox() {
        let svg = SvgDocument::new(192, 108, 1920.0, 1080.0).finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"192\""));
        assert!(svg.contains("viewBox=\"0 0 1920 1080\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_gradient_reference() {
        let mut doc = SvgDocument::new(10, 10, 10.0, 10.0);
        doc.radial_gradient(
            "bg",
            (5.0, 5.0),
            5.0,
            &[Stop::solid(0.0, Color::hex(0xff0000)), Stop::solid(1.0, Color::hex(0x0000ff))],
        );
        doc.rect(0.0, 0.0, 10.0, 10.0, Paint::Gradient("bg"));
        let svg = doc.finish();
        assert!(svg.contains("<radialGradient id=\"bg\""));
        assert!(svg.contains("stop-color=\"#ff0000\""));
        assert!(svg.contains("fill=\"url(#bg)\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = SvgDocument::new(10, 10, 10.0, 10.0);
        doc.text(0.0, 0.0, 12.0, "middle", Paint::white(0.1), "A<B & \"C\"");
        let svg = doc.finish();
        assert!(svg.contains("A&lt;B &amp; &quot;C&quot;"));
    }

    #[test]
    fn test_polyline_points() {
        let mut doc = SvgDocument::new(10, 10, 10.0, 10.0);
        doc.polyline(&[(0.0, 1.0), (2.5, 3.0)], Paint::white(0.5), 3.0);
        let svg = doc.finish();
        assert!(svg.contains("points=\"0.00,1.00 2.50,3.00\""));
        assert!(svg.contains("stroke-width=\"3\""));
    }
}
