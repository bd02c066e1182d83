//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while composing or encoding an image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface could not be acquired.
    #[error("Could not acquire drawing surface: {0}")]
    Context(String),

    /// The composed SVG could not be parsed.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// The raster could not be encoded.
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// An input image or data URI could not be decoded.
    #[error("Failed to load resource: {0}")]
    Resource(String),
}
