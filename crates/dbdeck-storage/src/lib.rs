//! Client-local key-value storage for `dbdeck`.
//!
//! This crate defines the [`StorageBackend`] trait — the equivalent of a
//! browser's local storage: a flat namespace of string keys mapping to
//! opaque byte values. It knows nothing about sessions or tokens; the
//! session store in `dbdeck-core` decides what goes under which key.
//!
//! Two implementations are provided:
//!
//! - [`FileBackend`] — one file per key inside a state directory (default)
//! - [`MemoryBackend`] — in-memory, for tests and ephemeral sessions

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileBackend;
pub use memory::MemoryBackend;

/// A pluggable key-value storage backend.
///
/// Keys are short flat identifiers (`user`, `authToken`). Values are opaque
/// byte arrays; callers own the encoding.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
/// Writers are not coordinated: two processes writing the same key race and
/// the last write wins.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Deleting a non-existent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
