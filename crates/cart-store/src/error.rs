//! Store error types.

use thiserror::Error;

/// Errors that can occur when using a durable store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Key cannot be used by this store.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}
