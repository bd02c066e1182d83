//! Native platform bridge.
//!
//! On hosts that embed the app (e.g. an Android WebView) downloads are handed
//! to native code instead of the browser. A bridge must implement
//! [`download_file`](PlatformBridge::download_file); the kind-specific entry
//! points and the storage query are optional and report absence with `None`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use wallpaper_renderer::parse_data_uri;

use crate::error::BridgeError;

/// Host-provided download capability.
#[async_trait]
pub trait PlatformBridge: Send + Sync {
    /// Save `data` (a data URI or a remote URL) under `filename`.
    async fn download_file(&self, data: &str, filename: &str) -> Result<(), BridgeError>;

    /// Save a still wallpaper. `None` when the host has no such entry point.
    async fn download_wallpaper(
        &self,
        _data: &str,
        _filename: &str,
    ) -> Option<Result<(), BridgeError>> {
        None
    }

    /// Save an animated wallpaper. `None` when the host has no such entry point.
    async fn download_gif(&self, _data: &str, _filename: &str) -> Option<Result<(), BridgeError>> {
        None
    }

    /// Free space on the device in bytes. `None` when unsupported.
    async fn available_storage(&self) -> Option<Result<u64, BridgeError>> {
        None
    }
}

/// Bridge that files downloads into a gallery folder tree, one
/// subdirectory per kind. It accepts only data URIs.
#[derive(Debug, Clone)]
pub struct GalleryBridge {
    root: PathBuf,
}

impl GalleryBridge {
    /// Gallery rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Gallery root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn save(&self, folder: &str, data: &str, filename: &str) -> Result<(), BridgeError> {
        if !data.starts_with("data:") {
            return Err(BridgeError::Rejected(format!(
                "gallery only accepts inline data, got {}",
                data.chars().take(32).collect::<String>()
            )));
        }
        let decoded = parse_data_uri(data).map_err(|e| BridgeError::Rejected(e.to_string()))?;
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| BridgeError::Rejected(format!("invalid filename: {filename}")))?;

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BridgeError::Call(e.to_string()))?;
        let path = dir.join(name);
        tokio::fs::write(&path, &decoded.bytes)
            .await
            .map_err(|e| BridgeError::Call(e.to_string()))?;
        tracing::info!("Saved {} to gallery", path.display());
        Ok(())
    }
}

#[async_trait]
impl PlatformBridge for GalleryBridge {
    async fn download_file(&self, data: &str, filename: &str) -> Result<(), BridgeError> {
        self.save("Downloads", data, filename).await
    }

    async fn download_wallpaper(&self, data: &str, filename: &str) -> Option<Result<(), BridgeError>> {
        Some(self.save("Wallpapers", data, filename).await)
    }

    async fn download_gif(&self, data: &str, filename: &str) -> Option<Result<(), BridgeError>> {
        Some(self.save("GIFs", data, filename).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MinimalBridge;

    #[async_trait]
    impl PlatformBridge for MinimalBridge {
        async fn download_file(&self, _data: &str, _filename: &str) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_optional_methods_default_to_absent() {
        let bridge = MinimalBridge;
        assert!(bridge.download_wallpaper("data:,x", "a.png").await.is_none());
        assert!(bridge.download_gif("data:,x", "a.gif").await.is_none());
        assert!(bridge.available_storage().await.is_none());
    }

    #[tokio::test]
    async fn test_gallery_files_by_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gallery = GalleryBridge::new(dir.path());

        gallery
            .download_gif("data:image/gif;base64,R0lGODlh", "loop.gif")
            .await
            .expect("present")
            .expect("saved");
        let saved = std::fs::read(dir.path().join("GIFs").join("loop.gif")).expect("read");
        assert_eq!(saved, b"GIF89a");
    }

    #[tokio::test]
    async fn test_gallery_rejects_remote_urls_and_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gallery = GalleryBridge::new(dir.path());

        let remote = gallery.download_file("https://example.com/a.png", "a.png").await;
        assert!(matches!(remote, Err(BridgeError::Rejected(_))));

        gallery
            .download_file("data:,hi", "../../escape.txt")
            .await
            .expect("saved under gallery");
        assert!(dir.path().join("Downloads").join("escape.txt").exists());
    }
}
