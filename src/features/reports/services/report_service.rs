use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{NewReport, Report};
use crate::features::reports::store::{ReportStore, StoreError};

/// Owns the persisted report collection.
///
/// Every mutation is a full load-modify-save of the collection, serialized
/// behind one async mutex so concurrent writers cannot lose each other's
/// updates. Unreadable persisted state reads as an empty collection.
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    write_lock: Mutex<()>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The collection in insertion order
    pub async fn load_all(&self) -> Result<Vec<Report>> {
        match self.store.load_all().await {
            Ok(reports) => Ok(reports),
            Err(StoreError::Corrupt(reason)) => {
                warn!("Persisted reports are corrupt, treating as empty: {}", reason);
                Ok(Vec::new())
            }
            Err(e) => {
                warn!("Failed to read persisted reports, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// All reports, newest first
    pub async fn list_newest_first(&self) -> Result<Vec<Report>> {
        let mut reports = self.load_all().await?;
        reports.reverse();
        Ok(reports)
    }

    /// Append the report built from the current collection.
    ///
    /// `build` runs inside the critical section, so it sees exactly the
    /// collection the new report is appended to.
    async fn append_with<F>(&self, build: F) -> Result<Report>
    where
        F: FnOnce(&[Report]) -> Report,
    {
        let _guard = self.write_lock.lock().await;
        let mut reports = self.load_all().await?;

        let report = build(&reports);
        reports.push(report.clone());
        self.store.save_all(&reports).await?;

        Ok(report)
    }

    /// Assign identity and creation time, then append.
    ///
    /// Timestamps never decrease along the persisted sequence.
    pub async fn create(&self, new_report: NewReport) -> Result<Report> {
        let report = self
            .append_with(|existing| {
                let now = Utc::now().trunc_subsecs(6);
                let timestamp = existing
                    .last()
                    .map(|last| last.timestamp.max(now))
                    .unwrap_or(now);

                let id = loop {
                    let candidate = Uuid::now_v7();
                    if !existing.iter().any(|r| r.id == candidate) {
                        break candidate;
                    }
                };

                new_report.into_report(id, timestamp)
            })
            .await?;

        info!(
            "Report created: id={}, type={}, severity={}, coordinates={:?}",
            report.id,
            report.emergency_type,
            report.severity,
            report.coordinates()
        );
        Ok(report)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let reports = self.load_all().await?;
        Ok(reports.into_iter().find(|r| r.id == id))
    }

    /// Remove every report with `id`; saves only when something was removed
    pub async fn remove_by_id(&self, id: Uuid) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let reports = self.load_all().await?;
        let original_len = reports.len();

        let remaining: Vec<Report> = reports.into_iter().filter(|r| r.id != id).collect();
        if remaining.len() == original_len {
            return Ok(false);
        }

        self.store.save_all(&remaining).await?;
        info!("Report deleted: id={}", id);
        Ok(true)
    }
}
