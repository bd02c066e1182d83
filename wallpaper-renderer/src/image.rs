//! Image bytes, data URIs and background textures.
//!
//! Supports decoding base64 and percent-encoded data URIs, sniffing formats
//! from magic bytes, and normalizing fetched photos into PNG textures.

use base64::Engine;

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// GIF.
    Gif,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            "image/gif" => Self::Gif,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type for this format.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Decoded payload of a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared media type (defaults to `text/plain` when omitted).
    pub mime: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Parse a data URI such as `data:image/png;base64,iVBORw0KGgo...`.
///
/// # Errors
///
/// Returns an error if the URI is malformed or the payload cannot be decoded.
pub fn parse_data_uri(uri: &str) -> RenderResult<DataUri> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded_data) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let is_base64 = metadata.ends_with(";base64");
    let mime = metadata
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_string();

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        percent_decode(encoded_data)?
    };

    Ok(DataUri { mime, bytes })
}

/// Encode bytes as a base64 data URI.
#[must_use]
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Simple URL decoding (percent-encoding).
fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(hex);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}

/// Decode a fetched photo, crop-scale it to cover `width`×`height`, and
/// re-encode it as PNG so the rasterizer always receives one format.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
pub fn normalize_texture(data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    let filled = img.resize_to_fill(width, height, image::imageops::FilterType::Triangle);

    let mut buf = std::io::Cursor::new(Vec::new());
    filled
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}
