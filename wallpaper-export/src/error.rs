//! Export error types.

use thiserror::Error;
use wallpaper_core::StoreError;
use wallpaper_renderer::RenderError;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while resolving, fetching or saving an image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// HTTP layer failed (connection, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// A URL could not be parsed or built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A `blob:` reference is not registered in this process.
    #[error("blob not found: {0}")]
    BlobNotFound(String),

    /// A payload could not be decoded.
    #[error("failed to decode image data: {0}")]
    Decode(String),

    /// The download surface rejected an operation.
    #[error("download surface error: {0}")]
    Surface(String),

    /// The platform bridge failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Local composition failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Persisting the result failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors reported by a platform bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The native call raised an error.
    #[error("platform bridge call failed: {0}")]
    Call(String),

    /// The bridge refused this payload.
    #[error("platform bridge rejected the download: {0}")]
    Rejected(String),
}
