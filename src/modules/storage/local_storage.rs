use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::AppError;
use crate::shared::validation::SAFE_FILENAME_REGEX;

/// Local-disk storage for uploaded files.
///
/// Files live flat inside a single root directory; keys are plain file names
/// and never contain path separators.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage client rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ensure the root directory exists, create if not
    pub async fn ensure_root_exists(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path inside the root.
    ///
    /// Returns `None` for keys that could escape the root directory.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        if key.starts_with('.') || !SAFE_FILENAME_REGEX.is_match(key) {
            return None;
        }
        Some(self.root.join(key))
    }

    /// Write a file
    ///
    /// # Arguments
    /// * `key` - File name inside the root directory
    /// * `data` - The file content as bytes
    pub async fn put(&self, key: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid file name: {}", key)))?;

        self.ensure_root_exists().await?;
        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(())
    }

    /// Read a file
    ///
    /// # Returns
    /// `Ok(None)` if no file exists under `key` or the key is not a safe name
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Delete a file; missing files are not an error
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let storage = LocalStorage::new(dir.path().join("uploads"));

        storage.put("abc_photo.png", b"png-bytes").await.unwrap();
        assert_eq!(
            storage.get("abc_photo.png").await.unwrap(),
            Some(b"png-bytes".to_vec())
        );

        storage.delete("abc_photo.png").await.unwrap();
        assert_eq!(storage.get("abc_photo.png").await.unwrap(), None);
        storage.delete("abc_photo.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_unsafe_keys() {
        let dir = tempfile::tempdir().expect("tmpdir");
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads"));
        storage.ensure_root_exists().await.unwrap();

        assert_eq!(storage.get("../secret.txt").await.unwrap(), None);
        assert_eq!(storage.get("..").await.unwrap(), None);
        assert_eq!(storage.get(".hidden").await.unwrap(), None);
        assert!(storage.put("../escape.png", b"x").await.is_err());
        assert!(storage.put("sub/dir.png", b"x").await.is_err());
    }
}
