//! # Wallpaper Studio Renderer
//!
//! Procedural wallpaper composer: prompts in, PNG data URIs out.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Keyword Tables                 │
//! │   prompt → palette, theme, motif set        │
//! ├─────────────────────────────────────────────┤
//! │              SVG Composition                │
//! │   background → motifs → text / GIF marker   │
//! ├─────────────────────────────────────────────┤
//! │      Rasterization (resvg + tiny-skia)      │
//! │   1920×1080 reference grid → PNG bytes      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animated;
pub mod compose;
pub mod error;
pub mod image;
pub mod keywords;
pub mod palette;
pub mod raster;
mod svg;

pub use animated::ANIMATED_MARKER;
pub use compose::{ComposeOptions, ComposedImage, Composer, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use error::{RenderError, RenderResult};
pub use image::{encode_data_uri, parse_data_uri, DataUri, ImageFormat};
pub use keywords::{KeywordTable, KeywordTables, Motif, Selection, Theme};
pub use palette::{Color, Palette, DEFAULT_PALETTE};
