//! Dual-path download resolver.
//!
//! A download first goes to the platform bridge when one is installed. If
//! there is no bridge, or the bridge fails for any reason, the browser path
//! runs: resolve the reference to bytes (locally for `data:` and `blob:`,
//! over the network otherwise with one proxy retry) and save it through the
//! [`DownloadSurface`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;
use wallpaper_core::{default_filename, ItemKind};
use wallpaper_renderer::parse_data_uri;

use crate::blob::{Blob, BlobRegistry};
use crate::bridge::PlatformBridge;
use crate::error::{ExportError, ExportResult};
use crate::fetch::{proxied_url, Fetcher};
use crate::reference::ImageRef;
use crate::surface::{save_blob, DownloadSurface};

/// Default CORS proxy base.
pub const DEFAULT_PROXY_BASE: &str = "https://api.allorigins.win/raw";

/// Default pause between batch entries.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Proxy that receives the target as its `url` query parameter.
    pub proxy_base: String,
    /// Pause between consecutive batch entries.
    pub batch_delay: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            proxy_base: DEFAULT_PROXY_BASE.to_string(),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

/// Per-download options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Explicit filename. Synthesized from the kind and current time if unset.
    pub filename: Option<String>,
    /// Item kind; selects the bridge entry point and default extension.
    pub kind: ItemKind,
}

impl DownloadOptions {
    /// Options for `kind` with a synthesized filename.
    #[must_use]
    pub fn new(kind: ItemKind) -> Self {
        Self {
            filename: None,
            kind,
        }
    }

    /// Set an explicit filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    fn resolve_filename(&self) -> String {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| default_filename(self.kind, Utc::now()), ToString::to_string)
    }
}

/// Which path completed a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRoute {
    /// Handed to the platform bridge.
    Bridge,
    /// Decoded from a `data:` URI or `blob:` reference without network.
    Local,
    /// Fetched directly.
    Direct,
    /// Fetched through the proxy after the direct fetch failed.
    Proxy,
}

impl fmt::Display for DownloadRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bridge => "bridge",
            Self::Local => "local",
            Self::Direct => "direct",
            Self::Proxy => "proxy",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    /// Filename the image was saved under.
    pub filename: String,
    /// Path that completed the download.
    pub route: DownloadRoute,
}

/// One entry of a batch download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Image reference.
    pub url: String,
    /// Optional explicit filename.
    pub filename: Option<String>,
    /// Item kind.
    pub kind: ItemKind,
}

impl BatchEntry {
    /// Entry with a synthesized filename.
    #[must_use]
    pub fn new(url: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            url: url.into(),
            filename: None,
            kind,
        }
    }

    /// Set an explicit filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Batch tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries saved.
    pub success: usize,
    /// Entries that failed on every path.
    pub failed: usize,
}

/// Resolves image references and saves them.
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    surface: Arc<dyn DownloadSurface>,
    blobs: BlobRegistry,
    bridge: Option<Arc<dyn PlatformBridge>>,
    config: DownloadConfig,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("blobs", &self.blobs.len())
            .field("bridge", &self.bridge.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Create a downloader without a platform bridge.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        surface: Arc<dyn DownloadSurface>,
        blobs: BlobRegistry,
        config: DownloadConfig,
    ) -> Self {
        Self {
            fetcher,
            surface,
            blobs,
            bridge: None,
            config,
        }
    }

    /// Prefer `bridge` for every download.
    #[must_use]
    pub fn with_bridge(mut self, bridge: Arc<dyn PlatformBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Whether a platform bridge is installed.
    #[must_use]
    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Save one image.
    ///
    /// # Errors
    ///
    /// Fails only when the browser path fails after every fallback: an
    /// undecodable `data:` URI, an unknown `blob:` reference, a remote fetch
    /// that failed both directly and through the proxy, or a surface error.
    pub async fn download(
        &self,
        image_ref: &str,
        options: &DownloadOptions,
    ) -> ExportResult<DownloadReceipt> {
        let filename = options.resolve_filename();

        if let Some(bridge) = &self.bridge {
            match self
                .download_via_bridge(bridge.as_ref(), image_ref, &filename, options.kind)
                .await
            {
                Ok(()) => {
                    info!("Downloaded {} via platform bridge", filename);
                    return Ok(DownloadReceipt {
                        filename,
                        route: DownloadRoute::Bridge,
                    });
                }
                Err(e) => warn!("Platform bridge download failed, using browser download: {e}"),
            }
        }

        let (blob, route) = self.resolve(image_ref).await?;
        save_blob(self.surface.as_ref(), &blob, &filename)?;
        debug!("Downloaded {} ({} bytes, {})", filename, blob.len(), route);
        Ok(DownloadReceipt { filename, route })
    }

    /// Save every entry in order, pausing between attempts.
    ///
    /// A failing entry is counted and logged; the batch continues.
    pub async fn download_batch(&self, entries: &[BatchEntry]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, entry) in entries.iter().enumerate() {
            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            let options = DownloadOptions {
                filename: entry.filename.clone(),
                kind: entry.kind,
            };
            match self.download(&entry.url, &options).await {
                Ok(_) => report.success += 1,
                Err(e) => {
                    warn!("Batch entry {} failed: {e}", index + 1);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Batch download finished: {} saved, {} failed",
            report.success, report.failed
        );
        report
    }

    /// Free device storage reported by the bridge, if it can tell.
    pub async fn available_storage(&self) -> Option<u64> {
        let bridge = self.bridge.as_ref()?;
        match bridge.available_storage().await? {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Storage query failed: {e}");
                None
            }
        }
    }

    async fn download_via_bridge(
        &self,
        bridge: &dyn PlatformBridge,
        image_ref: &str,
        filename: &str,
        kind: ItemKind,
    ) -> ExportResult<()> {
        let payload = match ImageRef::classify(image_ref) {
            ImageRef::Data(uri) => decode_data_uri(uri)?.to_data_uri(),
            ImageRef::Blob(reference) => self.lookup_blob(reference)?.to_data_uri(),
            ImageRef::Remote(url) => url.to_string(),
        };

        let specific = match kind {
            ItemKind::Image => bridge.download_wallpaper(&payload, filename).await,
            ItemKind::Animated => bridge.download_gif(&payload, filename).await,
        };
        match specific {
            Some(result) => result?,
            None => bridge.download_file(&payload, filename).await?,
        }
        Ok(())
    }

    async fn resolve(&self, image_ref: &str) -> ExportResult<(Blob, DownloadRoute)> {
        match ImageRef::classify(image_ref) {
            ImageRef::Data(uri) => Ok((decode_data_uri(uri)?, DownloadRoute::Local)),
            ImageRef::Blob(reference) => Ok((self.lookup_blob(reference)?, DownloadRoute::Local)),
            ImageRef::Remote(url) => self.fetch_with_proxy(url).await,
        }
    }

    fn lookup_blob(&self, reference: &str) -> ExportResult<Blob> {
        self.blobs
            .get(reference)
            .ok_or_else(|| ExportError::BlobNotFound(reference.to_string()))
    }

    async fn fetch_with_proxy(&self, url: &str) -> ExportResult<(Blob, DownloadRoute)> {
        let direct = match Url::parse(url) {
            Ok(parsed) => self.fetcher.fetch(&parsed).await,
            Err(e) => Err(ExportError::InvalidUrl(format!("{url}: {e}"))),
        };

        match direct {
            Ok(blob) => Ok((blob, DownloadRoute::Direct)),
            Err(e) => {
                warn!("Direct fetch of {url} failed ({e}), retrying through proxy");
                let proxied = proxied_url(&self.config.proxy_base, url)?;
                let blob = self.fetcher.fetch(&proxied).await?;
                Ok((blob, DownloadRoute::Proxy))
            }
        }
    }
}

fn decode_data_uri(uri: &str) -> ExportResult<Blob> {
    let decoded = parse_data_uri(uri).map_err(|e| ExportError::Decode(e.to_string()))?;
    Ok(Blob::new(decoded.bytes, decoded.mime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that must never be called.
    struct NoNetwork(AtomicUsize);

    #[async_trait]
    impl Fetcher for NoNetwork {
        async fn fetch(&self, url: &Url) -> ExportResult<Blob> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ExportError::InvalidUrl(url.to_string()))
        }
    }

    fn downloader(surface: Arc<MemorySurface>, fetcher: Arc<NoNetwork>) -> Downloader {
        Downloader::new(fetcher, surface, BlobRegistry::new(), DownloadConfig::default())
    }

    #[test]
    fn test_filename_resolution() {
        let explicit = DownloadOptions::new(ItemKind::Image).with_filename("test.png");
        assert_eq!(explicit.resolve_filename(), "test.png");

        let blank = DownloadOptions::new(ItemKind::Animated).with_filename("  ");
        let name = blank.resolve_filename();
        assert!(name.starts_with("animated-"));
        assert!(name.ends_with(".gif"));

        let image = DownloadOptions::new(ItemKind::Image).resolve_filename();
        assert!(image.starts_with("image-"));
        assert!(image.ends_with(".png"));
        assert!(!image.contains(':'));
    }

    #[tokio::test]
    async fn test_data_uri_is_local() {
        let surface = Arc::new(MemorySurface::new());
        let fetcher = Arc::new(NoNetwork(AtomicUsize::new(0)));
        let downloader = downloader(surface.clone(), fetcher.clone());

        let receipt = downloader
            .download(
                "data:image/gif;base64,R0lGODlh",
                &DownloadOptions::new(ItemKind::Animated).with_filename("test.gif"),
            )
            .await
            .expect("download");

        assert_eq!(receipt.route, DownloadRoute::Local);
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 0);
        assert_eq!(surface.clicks(), 1);
        assert!(surface.is_clean());
        assert_eq!(surface.saved()[0].1.bytes, b"GIF89a");
    }

    #[tokio::test]
    async fn test_unknown_blob_fails_without_network() {
        let surface = Arc::new(MemorySurface::new());
        let fetcher = Arc::new(NoNetwork(AtomicUsize::new(0)));
        let downloader = downloader(surface.clone(), fetcher.clone());

        let result = downloader
            .download("blob:nope", &DownloadOptions::default())
            .await;
        assert!(matches!(result, Err(ExportError::BlobNotFound(_))));
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 0);
        assert!(surface.events().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_remote_url_tries_proxy_once() {
        let surface = Arc::new(MemorySurface::new());
        let fetcher = Arc::new(NoNetwork(AtomicUsize::new(0)));
        let downloader = downloader(surface, fetcher.clone());

        let result = downloader
            .download("/relative/wallpaper.png", &DownloadOptions::default())
            .await;
        assert!(result.is_err());
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_available_storage_without_bridge() {
        let downloader = downloader(
            Arc::new(MemorySurface::new()),
            Arc::new(NoNetwork(AtomicUsize::new(0))),
        );
        assert!(!downloader.has_bridge());
        assert_eq!(downloader.available_storage().await, None);
    }

    #[test]
    fn test_route_display() {
        assert_eq!(DownloadRoute::Proxy.to_string(), "proxy");
        assert_eq!(DownloadRoute::Bridge.to_string(), "bridge");
    }
}
