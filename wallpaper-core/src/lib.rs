//! # Wallpaper Studio Core
//!
//! Data model and persistence for prompt-generated wallpapers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               wallpaper-core                │
//! ├─────────────────────────────────────────────┤
//! │  Items            │  Store                  │
//! │  - GeneratedItem  │  - Two flat lists       │
//! │  - ItemKind       │  - Full-list rewrites   │
//! │  - FavoriteItem   │  - Derived favorites    │
//! ├─────────────────────────────────────────────┤
//! │  Storage          │  Filenames / Catalog    │
//! │  - Memory         │  - Timestamped names    │
//! │  - JSON files     │  - Prompt slugs         │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod filename;
pub mod item;
pub mod storage;
pub mod store;

pub use catalog::{premade_wallpapers, Category, PremadeWallpaper};
pub use error::{StoreError, StoreResult};
pub use filename::{default_filename, favorite_filename, prompt_filename, prompt_slug};
pub use item::{FavoriteFilter, FavoriteItem, GeneratedItem, ItemKind};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::ItemStore;

/// Wallpaper core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
