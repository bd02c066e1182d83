//! Wallpaper generation with local fallback.
//!
//! Remote services are tried first when enabled. Any remote failure is
//! logged and the local [`Composer`] produces the image instead, so
//! generation only fails when local composition itself fails.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use url::Url;
use wallpaper_core::{GeneratedItem, ItemKind, ItemStore, StoreError};
use wallpaper_renderer::{Composer, ImageFormat, Selection, CANVAS_HEIGHT, CANVAS_WIDTH};

use crate::blob::{Blob, BlobRegistry};
use crate::error::{ExportError, ExportResult};
use crate::fetch::Fetcher;
use crate::reference::ImageRef;

/// Default remote generation endpoint.
pub const DEFAULT_GENERATION_URL: &str = "https://image.pollinations.ai/prompt";

/// Default placeholder photo endpoint.
pub const DEFAULT_TEXTURE_URL: &str = "https://picsum.photos";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prompt-to-image endpoint; the prompt is appended as a path segment.
    pub generation_url: String,
    /// Placeholder photo endpoint; `/<w>/<h>` is appended.
    pub texture_url: String,
    /// Skip every remote call.
    pub offline: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            texture_url: DEFAULT_TEXTURE_URL.to_string(),
            offline: false,
        }
    }
}

impl GeneratorConfig {
    /// Configuration that never touches the network.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }
}

/// Where a generated image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    /// The remote generation endpoint.
    Remote,
    /// A placeholder photo composed with the prompt overlay.
    Textured,
    /// The procedural composer.
    Composer,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Textured => "textured",
            Self::Composer => "composer",
        })
    }
}

/// A generated image reference.
#[derive(Debug, Clone)]
pub struct Generation {
    /// `blob:` reference or data URI.
    pub url: String,
    /// Producer.
    pub source: GenerationSource,
    /// Keyword selection, when the image was composed locally.
    pub selection: Option<Selection>,
}

/// Generates wallpapers from prompts.
pub struct Generator {
    composer: Composer,
    fetcher: Arc<dyn Fetcher>,
    blobs: BlobRegistry,
    config: GeneratorConfig,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("composer", &self.composer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Create a generator. Remote images are registered in `blobs`.
    #[must_use]
    pub fn new(
        composer: Composer,
        fetcher: Arc<dyn Fetcher>,
        blobs: BlobRegistry,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            composer,
            fetcher,
            blobs,
            config,
        }
    }

    /// The local composer.
    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a still wallpaper: remote endpoint first, composer second.
    ///
    /// # Errors
    ///
    /// Returns an error only if local composition fails.
    pub async fn generate(&self, prompt: &str) -> ExportResult<Generation> {
        if !self.config.offline {
            match self.fetch_generated(prompt).await {
                Ok(blob) => {
                    let url = self.blobs.register(blob);
                    info!("Generated {:?} remotely", prompt);
                    return Ok(Generation {
                        url,
                        source: GenerationSource::Remote,
                        selection: None,
                    });
                }
                Err(e) => warn!("Remote generation failed, composing locally: {e}"),
            }
        }
        self.compose_locally(prompt)
    }

    /// Generate a still wallpaper over a placeholder photo, composing from
    /// scratch if the photo cannot be fetched or decoded.
    ///
    /// # Errors
    ///
    /// Returns an error only if local composition fails.
    pub async fn generate_textured(&self, prompt: &str) -> ExportResult<Generation> {
        if !self.config.offline {
            let textured = match self.fetch_texture().await {
                Ok(texture) => self
                    .composer
                    .compose_textured(prompt, &texture.bytes)
                    .map_err(ExportError::from),
                Err(e) => Err(e),
            };
            match textured {
                Ok(image) => {
                    return Ok(Generation {
                        url: image.data_uri(),
                        source: GenerationSource::Textured,
                        selection: Some(image.selection),
                    });
                }
                Err(e) => warn!("Textured composition failed, composing locally: {e}"),
            }
        }
        self.compose_locally(prompt)
    }

    /// Generate a pseudo-animated wallpaper, falling back to a still
    /// composition of `"<prompt> (animated)"`.
    ///
    /// # Errors
    ///
    /// Returns an error if both compositions fail.
    pub async fn generate_animated(&self, prompt: &str) -> ExportResult<Generation> {
        match self.composer.compose_animated(prompt) {
            Ok(image) => Ok(Generation {
                url: image.data_uri(),
                source: GenerationSource::Composer,
                selection: Some(image.selection),
            }),
            Err(e) => {
                warn!("Animated composition failed, composing a still: {e}");
                self.compose_locally(&format!("{prompt} (animated)"))
            }
        }
    }

    /// Generate an item of `kind` and prepend it to the store.
    ///
    /// `blob:` references only live as long as this process, so they are
    /// inlined as data URIs before being persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyPrompt`] for a blank prompt, or any
    /// composition or persistence error.
    pub async fn generate_into(
        &self,
        store: &ItemStore,
        kind: ItemKind,
        prompt: &str,
    ) -> ExportResult<GeneratedItem> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StoreError::EmptyPrompt.into());
        }

        let generation = match kind {
            ItemKind::Image => self.generate(prompt).await?,
            ItemKind::Animated => self.generate_animated(prompt).await?,
        };
        let url = self.persistable_url(&generation.url)?;
        Ok(store.add(kind, &url, prompt)?)
    }

    fn persistable_url(&self, url: &str) -> ExportResult<String> {
        match ImageRef::classify(url) {
            ImageRef::Blob(reference) => self
                .blobs
                .get(reference)
                .map(|blob| blob.to_data_uri())
                .ok_or_else(|| ExportError::BlobNotFound(reference.to_string())),
            _ => Ok(url.to_string()),
        }
    }

    fn compose_locally(&self, prompt: &str) -> ExportResult<Generation> {
        let image = self.composer.compose(prompt)?;
        Ok(Generation {
            url: image.data_uri(),
            source: GenerationSource::Composer,
            selection: Some(image.selection),
        })
    }

    async fn fetch_generated(&self, prompt: &str) -> ExportResult<Blob> {
        let seed = rand::rng().random_range(0..1_000_000u32);
        let url = generation_url(&self.config.generation_url, prompt, seed)?;
        let blob = self.fetcher.fetch(&url).await?;
        if blob.format() == ImageFormat::Unknown {
            return Err(ExportError::Decode(format!(
                "{} did not return an image ({})",
                url.host_str().unwrap_or("endpoint"),
                blob.mime
            )));
        }
        Ok(blob)
    }

    async fn fetch_texture(&self) -> ExportResult<Blob> {
        let n = rand::rng().random_range(0..1000u32);
        let url = texture_url(&self.config.texture_url, n)?;
        self.fetcher.fetch(&url).await
    }
}

/// `<endpoint>/<prompt>?width=1920&height=1080&seed=<seed>`, with the prompt
/// percent-encoded as a single path segment.
///
/// # Errors
///
/// Returns [`ExportError::InvalidUrl`] if `endpoint` is not a base URL.
pub fn generation_url(endpoint: &str, prompt: &str, seed: u32) -> ExportResult<Url> {
    let mut url =
        Url::parse(endpoint).map_err(|e| ExportError::InvalidUrl(format!("{endpoint}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ExportError::InvalidUrl(format!("{endpoint}: not a base URL")))?
        .pop_if_empty()
        .push(prompt);
    url.query_pairs_mut()
        .append_pair("width", &CANVAS_WIDTH.to_string())
        .append_pair("height", &CANVAS_HEIGHT.to_string())
        .append_pair("seed", &seed.to_string());
    Ok(url)
}

/// `<endpoint>/1920/1080?random=<n>`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidUrl`] if `endpoint` is not a base URL.
pub fn texture_url(endpoint: &str, n: u32) -> ExportResult<Url> {
    let mut url =
        Url::parse(endpoint).map_err(|e| ExportError::InvalidUrl(format!("{endpoint}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ExportError::InvalidUrl(format!("{endpoint}: not a base URL")))?
        .pop_if_empty()
        .push(&CANVAS_WIDTH.to_string())
        .push(&CANVAS_HEIGHT.to_string());
    url.query_pairs_mut().append_pair("random", &n.to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_url_encodes_prompt() {
        let url = generation_url(DEFAULT_GENERATION_URL, "ocean sunset/dusk", 42).expect("url");
        assert_eq!(
            url.as_str(),
            "https://image.pollinations.ai/prompt/ocean%20sunset%2Fdusk?width=1920&height=1080&seed=42"
        );
    }

    #[test]
    fn test_generation_url_trailing_slash() {
        let url = generation_url("https://example.com/prompt/", "x", 1).expect("url");
        assert_eq!(url.path(), "/prompt/x");
    }

    #[test]
    fn test_texture_url() {
        let url = texture_url(DEFAULT_TEXTURE_URL, 7).expect("url");
        assert_eq!(url.as_str(), "https://picsum.photos/1920/1080?random=7");
    }

    #[test]
    fn test_invalid_endpoints() {
        assert!(matches!(generation_url("nope", "x", 1), Err(ExportError::InvalidUrl(_))));
        assert!(matches!(
            texture_url("mailto:someone@example.com", 1),
            Err(ExportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(GenerationSource::Textured.to_string(), "textured");
    }
}
