//! Command execution against a file-backed store.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use wallpaper_core::{
    favorite_filename, premade_wallpapers, prompt_filename, FavoriteFilter, FileStorage,
    GeneratedItem, ItemKind, ItemStore, PremadeWallpaper, StoreError,
};
use wallpaper_export::{
    BatchEntry, BlobRegistry, DirectorySurface, DownloadOptions, Downloader, Fetcher,
    GalleryBridge, Generator, HttpFetcher,
};
use wallpaper_renderer::{Composer, KeywordTables};

use crate::{Command, StudioConfig};

/// Longest image reference shown in text listings.
const URL_PREVIEW_CHARS: usize = 48;

/// Store, generator and downloader wired from one [`StudioConfig`].
#[derive(Debug)]
pub struct Studio {
    store: ItemStore,
    generator: Generator,
    downloader: Downloader,
    json: bool,
}

impl Studio {
    /// Open the store and build the service stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the data or output directory cannot be created,
    /// or the HTTP client fails to build.
    pub fn open(config: &StudioConfig) -> anyhow::Result<Self> {
        let storage = FileStorage::with_data_dir(config.data_dir.clone())
            .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
        let store = ItemStore::new(storage);

        let blobs = BlobRegistry::new();
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
        let composer = Composer::new(KeywordTables::default(), config.compose);
        let generator = Generator::new(
            composer,
            Arc::clone(&fetcher),
            blobs.clone(),
            config.generator.clone(),
        );

        let surface = DirectorySurface::new(config.out_dir.clone())
            .with_context(|| format!("opening output directory {}", config.out_dir.display()))?;
        let mut downloader =
            Downloader::new(fetcher, Arc::new(surface), blobs, config.download.clone());
        if let Some(gallery) = &config.gallery_dir {
            tracing::info!("Downloads go to gallery at {}", gallery.display());
            downloader = downloader.with_bridge(Arc::new(GalleryBridge::new(gallery.clone())));
        }

        Ok(Self {
            store,
            generator,
            downloader,
            json: config.json,
        })
    }

    /// The item store.
    #[must_use]
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Run one command, writing user-facing output to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or output cannot be written.
    pub async fn run(&self, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
        match command {
            Command::Generate {
                prompt,
                textured,
                download,
            } => {
                let item = if textured {
                    self.generate_textured(&prompt).await?
                } else {
                    self.generator
                        .generate_into(&self.store, ItemKind::Image, &prompt)
                        .await?
                };
                writeln!(out, "Generated image {} for \"{}\"", item.id, item.prompt)?;
                if download {
                    let filename = prompt_filename(&item.prompt, 0);
                    self.download_one(&item.url, ItemKind::Image, Some(filename), out)
                        .await?;
                }
            }
            Command::Animate { prompt, download } => {
                let item = self
                    .generator
                    .generate_into(&self.store, ItemKind::Animated, &prompt)
                    .await?;
                writeln!(out, "Generated animated {} for \"{}\"", item.id, item.prompt)?;
                if download {
                    self.download_one(&item.url, ItemKind::Animated, None, out).await?;
                }
            }
            Command::List { kind } => {
                let items = self.store.items(kind);
                if self.json {
                    serde_json::to_writer_pretty(&mut *out, &items)?;
                    writeln!(out)?;
                } else if items.is_empty() {
                    writeln!(out, "No {kind} items yet")?;
                } else {
                    for item in &items {
                        write_item(out, item)?;
                    }
                }
            }
            Command::Favorites { kind } => {
                let filter = kind.map_or(FavoriteFilter::All, FavoriteFilter::Only);
                let favorites = self.store.favorites(filter);
                if self.json {
                    serde_json::to_writer_pretty(&mut *out, &favorites)?;
                    writeln!(out)?;
                } else if favorites.is_empty() {
                    writeln!(out, "No favorites yet")?;
                } else {
                    for favorite in &favorites {
                        writeln!(
                            out,
                            "{}  {:<8}  {}  {}",
                            favorite.id,
                            favorite.kind.label(),
                            favorite.prompt,
                            preview(&favorite.url)
                        )?;
                    }
                }
            }
            Command::Toggle { id, kind } => {
                let favorite = self.store.toggle_favorite(kind, &id)?;
                let state = if favorite { "added to" } else { "removed from" };
                writeln!(out, "{id} {state} favorites")?;
            }
            Command::Delete { id, kind } => {
                let removed = self.store.delete(kind, &id)?;
                writeln!(out, "Deleted {} (\"{}\")", removed.id, removed.prompt)?;
            }
            Command::Clear { kind } => {
                let count = self.store.clear(kind)?;
                writeln!(out, "Cleared {count} {kind} items")?;
            }
            Command::Download {
                target,
                kind,
                filename,
            } => {
                let url = self
                    .store
                    .get(kind, &target)
                    .map_or(target, |item| item.url);
                self.download_one(&url, kind, filename, out).await?;
            }
            Command::DownloadAll { kind, favorites } => {
                let entries = if favorites {
                    self.favorite_entries()
                } else {
                    self.history_entries(kind)
                };
                if entries.is_empty() {
                    writeln!(out, "Nothing to download")?;
                } else {
                    let report = self.downloader.download_batch(&entries).await;
                    writeln!(out, "Downloaded {}, failed {}", report.success, report.failed)?;
                }
            }
            Command::Catalog { category, download } => {
                if let Some(id) = download {
                    let Some(entry) = PremadeWallpaper::find(&id) else {
                        bail!("unknown catalog entry: {id}");
                    };
                    let filename = format!("{id}.jpg");
                    self.download_one(entry.image_url, ItemKind::Image, Some(filename), out)
                        .await?;
                } else {
                    let entries: Vec<&PremadeWallpaper> = premade_wallpapers()
                        .iter()
                        .filter(|w| category.is_none() || category == Some(w.category))
                        .collect();
                    if self.json {
                        serde_json::to_writer_pretty(&mut *out, &entries)?;
                        writeln!(out)?;
                    } else {
                        for entry in entries {
                            writeln!(
                                out,
                                "{:<12} {:<10} {} - {}",
                                entry.id,
                                entry.category.label(),
                                entry.title,
                                entry.description
                            )?;
                        }
                    }
                }
            }
            Command::Storage => match self.downloader.available_storage().await {
                Some(bytes) => writeln!(out, "{bytes} bytes available")?,
                None => writeln!(out, "Storage information unavailable")?,
            },
        }
        Ok(())
    }

    async fn generate_textured(&self, prompt: &str) -> anyhow::Result<GeneratedItem> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StoreError::EmptyPrompt.into());
        }
        let generation = self.generator.generate_textured(prompt).await?;
        tracing::debug!("Textured generation came from {}", generation.source);
        Ok(self.store.add(ItemKind::Image, &generation.url, prompt)?)
    }

    async fn download_one(
        &self,
        url: &str,
        kind: ItemKind,
        filename: Option<String>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let options = DownloadOptions { filename, kind };
        let receipt = self.downloader.download(url, &options).await?;
        writeln!(out, "Saved {} ({})", receipt.filename, receipt.route)?;
        Ok(())
    }

    fn history_entries(&self, kind: ItemKind) -> Vec<BatchEntry> {
        self.store
            .items(kind)
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let entry = BatchEntry::new(item.url, kind);
                match kind {
                    ItemKind::Image => entry.with_filename(prompt_filename(&item.prompt, index)),
                    ItemKind::Animated => entry,
                }
            })
            .collect()
    }

    fn favorite_entries(&self) -> Vec<BatchEntry> {
        self.store
            .favorites(FavoriteFilter::All)
            .into_iter()
            .enumerate()
            .map(|(index, favorite)| {
                let filename = favorite_filename(&favorite.prompt, favorite.kind, index);
                BatchEntry::new(favorite.url, favorite.kind).with_filename(filename)
            })
            .collect()
    }
}

fn write_item(out: &mut impl Write, item: &GeneratedItem) -> std::io::Result<()> {
    let star = if item.is_favorite { "*" } else { " " };
    writeln!(
        out,
        "{} {star} {}  {}",
        item.id,
        item.prompt,
        preview(&item.url)
    )
}

fn preview(url: &str) -> String {
    if url.chars().count() > URL_PREVIEW_CHARS {
        let head: String = url.chars().take(URL_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_references() {
        let long = format!("data:image/png;base64,{}", "A".repeat(100));
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), URL_PREVIEW_CHARS + 3);
        assert_eq!(preview("blob:x"), "blob:x");
    }
}
