//! Storage error types.
//!
//! Every variant names the key or path involved so a failure can be
//! diagnosed from the log line alone.

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to open or create the storage location.
    #[error("failed to open storage at '{path}': {reason}")]
    Open { path: String, reason: String },

    /// Failed to read a value from storage.
    #[error("failed to read key '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Failed to write a value to storage.
    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Failed to delete a key from storage.
    #[error("failed to delete key '{key}': {reason}")]
    Delete { key: String, reason: String },

    /// The key cannot be mapped onto the backend (empty, or contains a path
    /// separator).
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}
