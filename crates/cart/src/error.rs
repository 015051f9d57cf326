//! Error types for cart persistence.

use thiserror::Error;

/// Errors a storage backend can signal.
///
/// These never reach cart consumers: restore failures fall back to an empty
/// cart and write failures are logged by the writer task. They exist so
/// backends and tests can say precisely what went wrong.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file or device I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart state could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure (e.g., a poisoned lock).
    #[error("Storage backend error: {0}")]
    Backend(String),
}
