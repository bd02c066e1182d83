//! Image reference classification.

/// How an image reference must be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Inline `data:` URI, decoded locally.
    Data(&'a str),
    /// In-process `blob:` reference, looked up in the registry.
    Blob(&'a str),
    /// Anything else, fetched over the network.
    Remote(&'a str),
}

impl<'a> ImageRef<'a> {
    /// Classify `reference` by scheme prefix.
    #[must_use]
    pub fn classify(reference: &'a str) -> Self {
        if reference.starts_with("data:") {
            Self::Data(reference)
        } else if reference.starts_with("blob:") {
            Self::Blob(reference)
        } else {
            Self::Remote(reference)
        }
    }

    /// The original reference string.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Data(s) | Self::Blob(s) | Self::Remote(s) => s,
        }
    }

    /// Whether resolving this reference needs the network.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
