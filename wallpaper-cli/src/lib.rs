//! # Wallpaper Studio CLI
//!
//! Command-line host for the wallpaper composer, item store and download
//! resolver.
//!
//! ## Usage
//!
//! ```bash
//! wallpaper-studio generate "ocean sunset"
//! wallpaper-studio animate "cosmic swirl" --download
//! wallpaper-studio favorites --kind animated
//! wallpaper-studio download-all --favorites
//! ```
//!
//! ## Offline, reproducible output:
//!
//! ```bash
//! wallpaper-studio --offline --seed 42 generate "forest flow"
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Storage locations, endpoints and composer options
//! - `Studio` - Wires the store, generator and downloader and runs commands

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod studio;

pub use studio::Studio;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use wallpaper_core::{Category, ItemKind};
use wallpaper_export::download::DEFAULT_PROXY_BASE;
use wallpaper_export::generate::{DEFAULT_GENERATION_URL, DEFAULT_TEXTURE_URL};
use wallpaper_export::{DownloadConfig, GeneratorConfig};
use wallpaper_renderer::{ComposeOptions, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Command-line arguments for wallpaper-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "wallpaper-studio")]
#[command(about = "Prompt-driven wallpaper generator with favorites and downloads")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding the generated item lists
    #[arg(long, env = "WALLPAPER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory downloads are saved into (default: current directory)
    #[arg(long, env = "WALLPAPER_OUT_DIR", global = true)]
    pub out_dir: Option<PathBuf>,

    /// Hand downloads to a gallery folder tree instead of the output directory
    #[arg(long, env = "WALLPAPER_GALLERY_DIR", global = true)]
    pub gallery_dir: Option<PathBuf>,

    /// Remote prompt-to-image endpoint
    #[arg(long, env = "WALLPAPER_GENERATION_URL", default_value = DEFAULT_GENERATION_URL, global = true)]
    pub generation_url: String,

    /// Placeholder photo endpoint for textured wallpapers
    #[arg(long, env = "WALLPAPER_TEXTURE_URL", default_value = DEFAULT_TEXTURE_URL, global = true)]
    pub texture_url: String,

    /// CORS proxy used when a direct fetch fails
    #[arg(long, env = "WALLPAPER_PROXY_URL", default_value = DEFAULT_PROXY_BASE, global = true)]
    pub proxy_url: String,

    /// Pause between batch downloads in milliseconds
    #[arg(long, default_value = "500", global = true)]
    pub batch_delay_ms: u64,

    /// Never call remote services; compose everything locally
    #[arg(long, global = true)]
    pub offline: bool,

    /// Seed for motif jitter (reproducible output)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Output width in pixels
    #[arg(long, default_value_t = CANVAS_WIDTH, global = true)]
    pub width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = CANVAS_HEIGHT, global = true)]
    pub height: u32,

    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Studio commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate a still wallpaper and add it to the history
    Generate {
        /// Prompt text
        prompt: String,
        /// Compose over a placeholder photo instead of calling the generator
        #[arg(long)]
        textured: bool,
        /// Also save the result to the output directory
        #[arg(long)]
        download: bool,
    },
    /// Generate a pseudo-animated wallpaper and add it to the history
    Animate {
        /// Prompt text
        prompt: String,
        /// Also save the result to the output directory
        #[arg(long)]
        download: bool,
    },
    /// List generated items, newest first
    List {
        /// Item kind (image or animated)
        #[arg(long, default_value = "image")]
        kind: ItemKind,
    },
    /// List favorites from both histories, newest first
    Favorites {
        /// Only this kind
        #[arg(long)]
        kind: Option<ItemKind>,
    },
    /// Flip an item's favorite flag
    Toggle {
        /// Item id
        id: String,
        /// Item kind
        #[arg(long, default_value = "image")]
        kind: ItemKind,
    },
    /// Delete an item
    Delete {
        /// Item id
        id: String,
        /// Item kind
        #[arg(long, default_value = "image")]
        kind: ItemKind,
    },
    /// Delete every item of one kind
    Clear {
        /// Item kind
        #[arg(long)]
        kind: ItemKind,
    },
    /// Download an item by id, or any data/remote image reference
    Download {
        /// Item id or image reference
        target: String,
        /// Item kind
        #[arg(long, default_value = "image")]
        kind: ItemKind,
        /// Explicit filename
        #[arg(long)]
        filename: Option<String>,
    },
    /// Download a whole history, or every favorite
    DownloadAll {
        /// Item kind (ignored with --favorites)
        #[arg(long, default_value = "image")]
        kind: ItemKind,
        /// Download favorites from both histories
        #[arg(long)]
        favorites: bool,
    },
    /// List premade wallpapers, or download one
    Catalog {
        /// Only this category
        #[arg(long)]
        category: Option<Category>,
        /// Download the entry with this id
        #[arg(long)]
        download: Option<String>,
    },
    /// Report free device storage, when the platform can tell
    Storage,
}

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Directory holding the persisted lists.
    pub data_dir: PathBuf,
    /// Directory downloads are saved into.
    pub out_dir: PathBuf,
    /// Gallery root for the platform bridge, if any.
    pub gallery_dir: Option<PathBuf>,
    /// Composer options.
    pub compose: ComposeOptions,
    /// Generator endpoints and mode.
    pub generator: GeneratorConfig,
    /// Download resolver settings.
    pub download: DownloadConfig,
    /// Print listings as JSON.
    pub json: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Configuration with the platform data directory and default services.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_dir: default_data_dir(),
            out_dir: PathBuf::from("."),
            gallery_dir: None,
            compose: ComposeOptions::default(),
            generator: GeneratorConfig::default(),
            download: DownloadConfig::default(),
            json: false,
        }
    }
}

impl From<CliArgs> for StudioConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
            out_dir: args.out_dir.unwrap_or_else(|| PathBuf::from(".")),
            gallery_dir: args.gallery_dir,
            compose: ComposeOptions {
                width: args.width,
                height: args.height,
                seed: args.seed,
            },
            generator: GeneratorConfig {
                generation_url: args.generation_url,
                texture_url: args.texture_url,
                offline: args.offline,
            },
            download: DownloadConfig {
                proxy_base: args.proxy_url,
                batch_delay: Duration::from_millis(args.batch_delay_ms),
            },
            json: args.json,
        }
    }
}

/// `<platform data dir>/wallpaper-studio`, or `./wallpaper-studio` when the
/// platform has none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wallpaper-studio")
}
