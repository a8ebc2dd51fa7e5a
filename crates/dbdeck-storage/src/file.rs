//! File-backed storage — the persistent default.
//!
//! Each key is a file directly inside the state directory (for example
//! `~/.dbdeck/authToken`). Files are written with mode `0600` on Unix since
//! they hold bearer tokens.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{StorageBackend, StorageError};

/// A storage backend that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if missing) a state directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StorageError::Open {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            if let Err(e) = tokio::fs::set_permissions(dir, perms).await {
                tracing::debug!(path = %dir.display(), error = %e, "could not restrict state dir permissions");
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Return the state directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                key: key.to_owned(),
                reason: "key is empty".to_owned(),
            });
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey {
                key: key.to_owned(),
                reason: "key must be a plain file name".to_owned(),
            });
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.key_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        let write_err = |e: std::io::Error| StorageError::Write {
            key: key.to_owned(),
            reason: e.to_string(),
        };

        // Write to a sibling temp file, then rename over the target.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        tokio::fs::write(&tmp, value).await.map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&tmp, perms)
                .await
                .map_err(write_err)?;
        }

        tokio::fs::rename(&tmp, &path).await.map_err(write_err)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join(".dbdeck");
        let backend = FileBackend::open(&dir).await.unwrap();
        assert!(backend.path().is_dir());
    }

    #[tokio::test]
    async fn put_and_get_persist_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(tmp.path()).await.unwrap();
        backend.put("authToken", b"abc").await.unwrap();

        let reopened = FileBackend::open(tmp.path()).await.unwrap();
        assert_eq!(
            reopened.get("authToken").await.unwrap(),
            Some(b"abc".to_vec())
        );
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(tmp.path()).await.unwrap();
        assert_eq!(backend.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(tmp.path()).await.unwrap();
        backend.put("user", b"{}").await.unwrap();
        backend.delete("user").await.unwrap();
        backend.delete("user").await.unwrap();
        assert_eq!(backend.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(tmp.path()).await.unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = backend.put(key, b"x").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey { .. }), "{key}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn values_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(tmp.path()).await.unwrap();
        backend.put("authToken", b"secret").await.unwrap();
        let mode = std::fs::metadata(tmp.path().join("authToken"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
