#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum::Router;

#[cfg(test)]
use crate::features::files::{self, FileService};
#[cfg(test)]
use crate::features::reports::models::Coordinates;
#[cfg(test)]
use crate::features::reports::services::{Geocoder, GeocodingError};
#[cfg(test)]
use crate::features::reports::{
    routes as reports_routes, IngestionService, LocationResolver, ReportService, ReportStore,
    SeverityClassifier,
};
#[cfg(test)]
use crate::modules::storage::LocalStorage;

/// Geocoder double that answers from a fixed outcome and records its calls
#[cfg(test)]
pub struct StubGeocoder {
    outcome: Option<Coordinates>,
    fail: bool,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl StubGeocoder {
    pub fn found(lat: f64, lng: f64) -> Self {
        Self::with(Some(Coordinates { lat, lng }), false)
    }

    pub fn empty() -> Self {
        Self::with(None, false)
    }

    pub fn failing() -> Self {
        Self::with(None, true)
    }

    fn with(outcome: Option<Coordinates>, fail: bool) -> Self {
        Self {
            outcome,
            fail,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        if self.fail {
            return Err(GeocodingError::Request("connection refused".to_string()));
        }
        Ok(self.outcome)
    }
}

/// Report and upload routes wired over the given store and geocoder.
/// Uploads go to `upload_dir`.
#[cfg(test)]
#[allow(dead_code)]
pub fn test_router(
    store: Arc<dyn ReportStore>,
    geocoder: Arc<StubGeocoder>,
    upload_dir: &std::path::Path,
) -> Router {
    let report_service = Arc::new(ReportService::new(store));
    let file_service = Arc::new(FileService::new(
        Arc::new(LocalStorage::new(upload_dir)),
        "/api/uploads",
    ));
    let ingestion_service = Arc::new(IngestionService::new(
        Arc::clone(&report_service),
        Arc::clone(&file_service),
        LocationResolver::new(geocoder),
        SeverityClassifier::new(),
    ));

    Router::new()
        .merge(reports_routes::routes(report_service, ingestion_service))
        .merge(files::routes(file_service))
}
