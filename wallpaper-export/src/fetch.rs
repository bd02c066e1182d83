//! Network fetching for remote image references.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::blob::Blob;
use crate::error::{ExportError, ExportResult};

/// Fetches a URL into a [`Blob`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url`. Transport errors and non-2xx statuses are errors.
    async fn fetch(&self, url: &Url) -> ExportResult<Blob>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the crate's user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the HTTP client fails to build.
    pub fn new() -> ExportResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("wallpaper-studio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> ExportResult<Blob> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| mime.trim().to_string())
            .filter(|mime| !mime.is_empty());

        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);

        Ok(match declared {
            Some(mime) => Blob::new(bytes, mime),
            None => Blob::sniffed(bytes),
        })
    }
}

/// Route `target` through a CORS-style proxy: `<proxy_base>?url=<target>`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidUrl`] if `proxy_base` is not a valid URL.
pub fn proxied_url(proxy_base: &str, target: &str) -> ExportResult<Url> {
    Url::parse_with_params(proxy_base, &[("url", target)])
        .map_err(|e| ExportError::InvalidUrl(format!("{proxy_base}: {e}")))
}
