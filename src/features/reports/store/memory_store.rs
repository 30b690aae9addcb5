use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ReportStore, StoreError};
use crate::features::reports::models::Report;

/// Volatile store, used by tests and `STORE_BACKEND=memory`
#[derive(Default)]
pub struct InMemoryReportStore {
    reports: RwLock<Vec<Report>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn load_all(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.read().await.clone())
    }

    async fn save_all(&self, reports: &[Report]) -> Result<(), StoreError> {
        *self.reports.write().await = reports.to_vec();
        Ok(())
    }
}
