//! Persistence backends for the report collection
//!
//! Every backend stores the whole collection as one ordered sequence and
//! replaces it wholesale on save. Serializing concurrent mutations is the job
//! of `ReportService`, not of the backends.

mod file_store;
mod memory_store;

pub use file_store::FileReportStore;
pub use memory_store::InMemoryReportStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::reports::models::Report;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Persisted reports are unreadable: {0}")]
    Corrupt(String),

    #[error("Failed to serialize reports: {0}")]
    Serialize(String),
}

/// Durable, ordered collection of reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Load the collection in insertion order.
    ///
    /// A collection that was never written is `Ok` and empty. Unreadable state
    /// is reported as `StoreError::Corrupt`.
    async fn load_all(&self) -> Result<Vec<Report>, StoreError>;

    /// Replace the whole collection
    async fn save_all(&self, reports: &[Report]) -> Result<(), StoreError>;
}
