//! Storage module for uploaded files
//!
//! Provides a local-disk storage client for report photos.

mod local_storage;

pub use local_storage::LocalStorage;
