use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ReportStore, StoreError};
use crate::features::reports::models::Report;

/// Stores the collection as a pretty-printed JSON array in a single file
pub struct FileReportStore {
    path: PathBuf,
}

impl FileReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "reports".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn load_all(&self) -> Result<Vec<Report>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No report file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn save_all(&self, reports: &[Report]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(reports)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write alongside the target, then rename over it
        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(
            "Saved {} reports to {}",
            reports.len(),
            self.path.display()
        );
        Ok(())
    }
}
