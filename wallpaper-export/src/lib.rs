//! # Wallpaper Studio Export
//!
//! Turns prompts into image references and image references into files.
//!
//! ## Download paths
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Downloader                  │
//! ├─────────────────────────────────────────────┤
//! │  Platform bridge (if installed)             │
//! │   blob/data → base64 data URI → native save │
//! │        │ any failure                        │
//! │        ▼                                    │
//! │  Browser path                               │
//! │   data: → decode     blob: → registry       │
//! │   remote → fetch → (fail) → proxy fetch     │
//! │        │                                    │
//! │        ▼                                    │
//! │   object URL → anchor → click → cleanup     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blob;
pub mod bridge;
pub mod download;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod reference;
pub mod surface;

pub use blob::{Blob, BlobRegistry};
pub use bridge::{GalleryBridge, PlatformBridge};
pub use download::{
    BatchEntry, BatchReport, DownloadConfig, DownloadOptions, DownloadReceipt, DownloadRoute,
    Downloader,
};
pub use error::{BridgeError, ExportError, ExportResult};
pub use fetch::{proxied_url, Fetcher, HttpFetcher};
pub use generate::{Generation, GenerationSource, Generator, GeneratorConfig};
pub use reference::ImageRef;
pub use surface::{AnchorId, DirectorySurface, DownloadSurface, MemorySurface, SurfaceEvent};
