//! Error types for item storage.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing persisted items.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested item does not exist in its list.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The caller supplied an empty prompt.
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A list could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
