use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ALLOWED_PHOTO_MIME_TYPES;

/// A photo received with a report submission, not yet stored
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Where a stored photo ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredPhotoDto {
    /// Generated file name inside the upload directory
    pub file_name: String,
    /// Public URL the photo is served from
    pub url: String,
}

/// Check if a MIME type is accepted for report photos
pub fn is_photo_type_allowed(content_type: &str) -> bool {
    ALLOWED_PHOTO_MIME_TYPES.contains(&content_type)
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Guess the content type of a stored file from its extension
pub fn content_type_from_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
