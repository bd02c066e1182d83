//! In-process binary blobs and their `blob:` references.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use wallpaper_renderer::{encode_data_uri, ImageFormat};

/// Raw bytes with a media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Payload.
    pub bytes: Vec<u8>,
    /// Media type, e.g. `image/png`.
    pub mime: String,
}

impl Blob {
    /// Create a blob with an explicit media type.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// Create a blob, guessing the media type from magic bytes.
    #[must_use]
    pub fn sniffed(bytes: Vec<u8>) -> Self {
        let mime = ImageFormat::from_magic_bytes(&bytes).mime();
        Self::new(bytes, mime)
    }

    /// Format detected from the payload itself.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        ImageFormat::from_magic_bytes(&self.bytes)
    }

    /// Base64 data URI carrying this blob.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.mime, &self.bytes)
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Registry backing `blob:` references for the lifetime of the process.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl BlobRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `blob` and return its new `blob:<uuid>` reference.
    pub fn register(&self, blob: Blob) -> String {
        let reference = format!("blob:{}", uuid::Uuid::new_v4());
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reference.clone(), blob);
        reference
    }

    /// Look up a reference.
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<Blob> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .cloned()
    }

    /// Drop a reference. Returns whether it existed.
    pub fn revoke(&self, reference: &str) -> bool {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(reference)
            .is_some()
    }

    /// Number of live references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no references are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = BlobRegistry::new();
        let reference = registry.register(Blob::new(b"GIF89a".to_vec(), "image/gif"));
        assert!(reference.starts_with("blob:"));
        assert_eq!(registry.get(&reference).map(|b| b.mime), Some("image/gif".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_revoke() {
        let registry = BlobRegistry::new();
        let reference = registry.register(Blob::new(vec![1, 2, 3], "application/octet-stream"));
        assert!(registry.revoke(&reference));
        assert!(!registry.revoke(&reference));
        assert!(registry.get(&reference).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let a = BlobRegistry::new();
        let b = a.clone();
        let reference = a.register(Blob::sniffed(b"GIF89a".to_vec()));
        assert!(b.get(&reference).is_some());
    }

    #[test]
    fn test_sniffed_mime_and_data_uri() {
        let blob = Blob::sniffed(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]);
        assert_eq!(blob.mime, "image/png");
        assert_eq!(blob.format(), ImageFormat::Png);
        assert!(blob.to_data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(blob.len(), 6);
    }
}
