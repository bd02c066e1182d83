//! Browser-style download surface.
//!
//! A download materializes a blob as a transient object URL, attaches a
//! hidden anchor carrying the filename, clicks it once and tears both down.
//! The guards in this module make that teardown unconditional: the anchor is
//! removed and the object URL revoked on every exit path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::blob::Blob;
use crate::error::{ExportError, ExportResult};

/// Handle to an anchor appended to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u64);

/// Primitives a download needs from its host document.
pub trait DownloadSurface: Send + Sync {
    /// Materialize `blob` and return a URL that refers to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot hold the blob.
    fn create_object_url(&self, blob: &Blob) -> ExportResult<String>;

    /// Release an object URL.
    fn revoke_object_url(&self, url: &str);

    /// Attach a hidden anchor pointing at `href` with a `download` filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the anchor cannot be attached.
    fn append_anchor(&self, href: &str, filename: &str) -> ExportResult<AnchorId>;

    /// Activate the anchor.
    ///
    /// # Errors
    ///
    /// Returns an error if activation fails.
    fn click(&self, anchor: AnchorId) -> ExportResult<()>;

    /// Detach the anchor.
    fn remove_anchor(&self, anchor: AnchorId);
}

/// Revokes its object URL when dropped.
pub(crate) struct ObjectUrlGuard<'a> {
    surface: &'a dyn DownloadSurface,
    url: String,
}

impl<'a> ObjectUrlGuard<'a> {
    pub(crate) fn create(surface: &'a dyn DownloadSurface, blob: &Blob) -> ExportResult<Self> {
        let url = surface.create_object_url(blob)?;
        Ok(Self { surface, url })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrlGuard<'_> {
    fn drop(&mut self) {
        self.surface.revoke_object_url(&self.url);
    }
}

/// Removes its anchor when dropped.
pub(crate) struct AnchorGuard<'a> {
    surface: &'a dyn DownloadSurface,
    anchor: AnchorId,
}

impl<'a> AnchorGuard<'a> {
    pub(crate) fn append(
        surface: &'a dyn DownloadSurface,
        href: &str,
        filename: &str,
    ) -> ExportResult<Self> {
        let anchor = surface.append_anchor(href, filename)?;
        Ok(Self { surface, anchor })
    }

    pub(crate) fn click(&self) -> ExportResult<()> {
        self.surface.click(self.anchor)
    }
}

impl Drop for AnchorGuard<'_> {
    fn drop(&mut self) {
        self.surface.remove_anchor(self.anchor);
    }
}

/// Save one blob through `surface` under `filename`.
///
/// The anchor guard is declared last so it drops first.
pub(crate) fn save_blob(surface: &dyn DownloadSurface, blob: &Blob, filename: &str) -> ExportResult<()> {
    let object_url = ObjectUrlGuard::create(surface, blob)?;
    let anchor = AnchorGuard::append(surface, object_url.url(), filename)?;
    anchor.click()
}

#[derive(Debug, Default)]
struct SurfaceState {
    objects: HashMap<String, Blob>,
    anchors: HashMap<AnchorId, (String, String)>,
}

fn lock(state: &Mutex<SurfaceState>) -> std::sync::MutexGuard<'_, SurfaceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Surface whose anchor clicks write files into a directory.
#[derive(Debug)]
pub struct DirectorySurface {
    dir: PathBuf,
    state: Mutex<SurfaceState>,
    next_id: AtomicU64,
}

impl DirectorySurface {
    /// Save downloads into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Surface`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| ExportError::Surface(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            state: Mutex::new(SurfaceState::default()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Object URLs not yet revoked.
    #[must_use]
    pub fn live_object_urls(&self) -> usize {
        lock(&self.state).objects.len()
    }

    /// Anchors not yet removed.
    #[must_use]
    pub fn live_anchors(&self) -> usize {
        lock(&self.state).anchors.len()
    }
}

impl DownloadSurface for DirectorySurface {
    fn create_object_url(&self, blob: &Blob) -> ExportResult<String> {
        let url = format!("blob:{}", uuid::Uuid::new_v4());
        lock(&self.state).objects.insert(url.clone(), blob.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        lock(&self.state).objects.remove(url);
    }

    fn append_anchor(&self, href: &str, filename: &str) -> ExportResult<AnchorId> {
        let id = AnchorId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.state)
            .anchors
            .insert(id, (href.to_string(), filename.to_string()));
        Ok(id)
    }

    fn click(&self, anchor: AnchorId) -> ExportResult<()> {
        let (bytes, filename) = {
            let state = lock(&self.state);
            let (href, filename) = state
                .anchors
                .get(&anchor)
                .ok_or_else(|| ExportError::Surface(format!("unknown anchor {}", anchor.0)))?;
            let blob = state
                .objects
                .get(href)
                .ok_or_else(|| ExportError::Surface(format!("object URL {href} was revoked")))?;
            (blob.bytes.clone(), filename.clone())
        };

        let name = Path::new(&filename)
            .file_name()
            .ok_or_else(|| ExportError::Surface(format!("invalid filename: {filename}")))?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)
            .map_err(|e| ExportError::Surface(format!("{}: {e}", path.display())))?;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    fn remove_anchor(&self, anchor: AnchorId) {
        lock(&self.state).anchors.remove(&anchor);
    }
}

/// Observable surface operation, recorded by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// An object URL was created.
    CreateObjectUrl(String),
    /// An anchor was appended.
    AppendAnchor {
        /// Object URL the anchor points at.
        href: String,
        /// Download filename.
        filename: String,
    },
    /// An anchor was clicked.
    Click(AnchorId),
    /// An anchor was removed.
    RemoveAnchor(AnchorId),
    /// An object URL was revoked.
    RevokeObjectUrl(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<SurfaceEvent>,
    saved: Vec<(String, Blob)>,
    anchors: HashMap<AnchorId, (String, String)>,
    objects: HashMap<String, Blob>,
    next_id: u64,
}

/// In-memory surface that records every operation.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
    fail_clicks: bool,
}

impl MemorySurface {
    /// Surface whose clicks succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose clicks always fail.
    #[must_use]
    pub fn failing_clicks() -> Self {
        Self {
            fail_clicks: true,
            ..Self::default()
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Operations in the order they happened.
    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.state().events.clone()
    }

    /// Files "downloaded" so far.
    #[must_use]
    pub fn saved(&self) -> Vec<(String, Blob)> {
        self.state().saved.clone()
    }

    /// Number of clicks recorded.
    #[must_use]
    pub fn clicks(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Click(_)))
            .count()
    }

    /// Whether every object URL was revoked and every anchor removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        let state = self.state();
        state.anchors.is_empty() && state.objects.is_empty()
    }
}

impl DownloadSurface for MemorySurface {
    fn create_object_url(&self, blob: &Blob) -> ExportResult<String> {
        let mut state = self.state();
        state.next_id += 1;
        let url = format!("blob:memory/{}", state.next_id);
        state.objects.insert(url.clone(), blob.clone());
        state.events.push(SurfaceEvent::CreateObjectUrl(url.clone()));
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        let mut state = self.state();
        state.objects.remove(url);
        state.events.push(SurfaceEvent::RevokeObjectUrl(url.to_string()));
    }

    fn append_anchor(&self, href: &str, filename: &str) -> ExportResult<AnchorId> {
        let mut state = self.state();
        state.next_id += 1;
        let id = AnchorId(state.next_id);
        state.anchors.insert(id, (href.to_string(), filename.to_string()));
        state.events.push(SurfaceEvent::AppendAnchor {
            href: href.to_string(),
            filename: filename.to_string(),
        });
        Ok(id)
    }

    fn click(&self, anchor: AnchorId) -> ExportResult<()> {
        let mut state = self.state();
        state.events.push(SurfaceEvent::Click(anchor));
        if self.fail_clicks {
            return Err(ExportError::Surface("click was blocked".to_string()));
        }
        let (href, filename) = state
            .anchors
            .get(&anchor)
            .cloned()
            .ok_or_else(|| ExportError::Surface(format!("unknown anchor {}", anchor.0)))?;
        let blob = state
            .objects
            .get(&href)
            .cloned()
            .ok_or_else(|| ExportError::Surface(format!("object URL {href} was revoked")))?;
        state.saved.push((filename, blob));
        Ok(())
    }

    fn remove_anchor(&self, anchor: AnchorId) {
        let mut state = self.state();
        state.anchors.remove(&anchor);
        state.events.push(SurfaceEvent::RemoveAnchor(anchor));
    }
}
