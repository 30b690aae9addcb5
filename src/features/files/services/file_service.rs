use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    get_extension_from_content_type, is_photo_type_allowed, PhotoUpload, StoredPhotoDto,
};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::{ALLOWED_PHOTO_MIME_TYPES, MAX_PHOTO_SIZE, MAX_STORED_FILENAME_LEN};
use crate::shared::validation::sanitize_filename;

/// Service for report photo files
pub struct FileService {
    storage: Arc<LocalStorage>,
    url_prefix: String,
}

impl FileService {
    pub fn new(storage: Arc<LocalStorage>, url_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            url_prefix: url_prefix.into(),
        }
    }

    /// Public path prefix photos are served under, e.g. `/api/uploads`
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Reject photos that are too large or not an accepted image type
    pub fn validate_photo(&self, photo: &PhotoUpload) -> Result<()> {
        if photo.data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::Validation(format!(
                "Photo too large. Maximum size is {} bytes ({} MB)",
                MAX_PHOTO_SIZE,
                MAX_PHOTO_SIZE / 1024 / 1024
            )));
        }

        if !is_photo_type_allowed(&photo.content_type) {
            return Err(AppError::Validation(format!(
                "Photo type '{}' is not allowed. Allowed types: {}",
                photo.content_type,
                ALLOWED_PHOTO_MIME_TYPES.join(", ")
            )));
        }

        Ok(())
    }

    /// Build a collision-resistant name: `<uuid hex>_<sanitized original name>`
    pub fn generate_file_name(original_filename: &str, content_type: &str) -> String {
        let mut safe = sanitize_filename(original_filename);
        if safe.len() > MAX_STORED_FILENAME_LEN {
            // Sanitized names are ASCII, keep the tail so the extension survives
            safe = safe[safe.len() - MAX_STORED_FILENAME_LEN..].to_string();
        }
        if safe.is_empty() {
            let extension = get_extension_from_content_type(content_type).unwrap_or("bin");
            safe = format!("photo.{}", extension);
        }

        format!("{}_{}", Uuid::new_v4().simple(), safe)
    }

    /// Store a validated photo and return its public URL
    pub async fn store_photo(&self, photo: PhotoUpload) -> Result<StoredPhotoDto> {
        let file_name = Self::generate_file_name(&photo.file_name, &photo.content_type);
        self.storage.put(&file_name, &photo.data).await?;

        info!(
            "Photo stored: file={}, original={}, size={}",
            file_name,
            photo.file_name,
            photo.data.len()
        );

        Ok(StoredPhotoDto {
            url: format!("{}/{}", self.url_prefix, file_name),
            file_name,
        })
    }

    /// Read a stored photo by file name
    pub async fn read_upload(&self, file_name: &str) -> Result<Vec<u8>> {
        self.storage
            .get(file_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_name)))
    }

    /// Remove a stored photo, used when the report it belongs to was not saved
    pub async fn discard(&self, stored: &StoredPhotoDto) -> Result<()> {
        self.storage.delete(&stored.file_name).await?;
        debug!("Discarded photo {}", stored.file_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::SAFE_FILENAME_REGEX;

    fn photo(name: &str, content_type: &str, size: usize) -> PhotoUpload {
        PhotoUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: vec![7u8; size],
        }
    }

    fn service(dir: &std::path::Path) -> FileService {
        FileService::new(Arc::new(LocalStorage::new(dir)), "/api/uploads")
    }

    #[test]
    fn test_generate_file_name() {
        let name = FileService::generate_file_name("../../flood photo.jpg", "image/jpeg");
        let (prefix, rest) = name.split_once('_').unwrap();
        assert_eq!(prefix.len(), 32);
        assert_eq!(rest, "flood_photo.jpg");
        assert!(SAFE_FILENAME_REGEX.is_match(&name));

        let a = FileService::generate_file_name("same.png", "image/png");
        let b = FileService::generate_file_name("same.png", "image/png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_file_name_fallbacks() {
        let name = FileService::generate_file_name("..", "image/png");
        assert!(name.ends_with("_photo.png"));

        let long = format!("{}.jpg", "a".repeat(300));
        let name = FileService::generate_file_name(&long, "image/jpeg");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 32 + 1 + MAX_STORED_FILENAME_LEN);
    }

    #[test]
    fn test_validate_photo() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let service = service(dir.path());

        assert!(service.validate_photo(&photo("a.png", "image/png", 10)).is_ok());
        assert!(matches!(
            service.validate_photo(&photo("a.pdf", "application/pdf", 10)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.validate_photo(&photo("a.png", "image/png", MAX_PHOTO_SIZE + 1)),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_store_read_discard() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let service = service(dir.path());

        let stored = service
            .store_photo(photo("quake.png", "image/png", 4))
            .await
            .unwrap();
        assert_eq!(stored.url, format!("/api/uploads/{}", stored.file_name));
        assert_eq!(service.read_upload(&stored.file_name).await.unwrap(), vec![7u8; 4]);

        service.discard(&stored).await.unwrap();
        assert!(matches!(
            service.read_upload(&stored.file_name).await,
            Err(AppError::NotFound(_))
        ));
    }
}
