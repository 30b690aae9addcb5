/// Maximum accepted photo size
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// MIME types accepted for report photos
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Number of geocoding results requested per lookup
pub const GEOCODING_RESULT_LIMIT: u8 = 1;

/// Longest sanitized original filename kept in stored photo names
pub const MAX_STORED_FILENAME_LEN: usize = 100;
