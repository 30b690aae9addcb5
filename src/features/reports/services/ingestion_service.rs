use std::sync::Arc;

use tracing::{debug, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::PhotoUpload;
use crate::features::files::FileService;
use crate::features::reports::dtos::{validation_message, CreateReportDto};
use crate::features::reports::models::{Coordinates, NewReport, Report, Severity};
use crate::features::reports::services::{LocationResolver, ReportService, SeverityClassifier};
use crate::shared::validation::{is_valid_lat_lng, parse_coordinate};

/// Turns a raw submission into a persisted report.
///
/// Validation runs before any side effect, so a rejected submission never
/// triggers geocoding, stores a photo, or touches the collection.
pub struct IngestionService {
    reports: Arc<ReportService>,
    files: Arc<FileService>,
    resolver: LocationResolver,
    classifier: SeverityClassifier,
}

impl IngestionService {
    pub fn new(
        reports: Arc<ReportService>,
        files: Arc<FileService>,
        resolver: LocationResolver,
        classifier: SeverityClassifier,
    ) -> Self {
        Self {
            reports,
            files,
            resolver,
            classifier,
        }
    }

    pub async fn create_report(
        &self,
        dto: CreateReportDto,
        photo: Option<PhotoUpload>,
    ) -> Result<Report> {
        dto.validate()
            .map_err(|e| AppError::Validation(validation_message(&e)))?;

        let severity = self.severity_for(dto.severity.as_deref(), &dto.description)?;

        if let Some(photo) = &photo {
            self.files.validate_photo(photo)?;
        }

        let coordinates = match explicit_coordinates(dto.lat.as_deref(), dto.lng.as_deref()) {
            Some(coords) => Some(coords),
            None => self.resolver.resolve_coordinates(&dto.location).await,
        };

        let stored_photo = match photo {
            Some(photo) => Some(self.files.store_photo(photo).await?),
            None => None,
        };

        let new_report = NewReport {
            emergency_type: dto.emergency_type,
            severity,
            address: dto.location,
            coordinates,
            description: dto.description,
            phone: dto.phone.filter(|p| !p.trim().is_empty()),
            image_url: stored_photo.as_ref().map(|p| p.url.clone()),
        };

        match self.reports.create(new_report).await {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Some(stored) = &stored_photo {
                    if let Err(cleanup) = self.files.discard(stored).await {
                        warn!("Failed to discard orphaned photo: {}", cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    /// Standalone severity classification
    pub fn classify(&self, description: &str) -> Severity {
        self.classifier.classify(description)
    }

    fn severity_for(&self, supplied: Option<&str>, description: &str) -> Result<Severity> {
        match supplied.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<Severity>().map_err(AppError::Validation),
            None => {
                let derived = self.classifier.classify(description);
                debug!("No severity supplied, classified as {}", derived);
                Ok(derived)
            }
        }
    }
}

/// Coordinates sent as separate form fields, used only when both parse and
/// lie within the legal range
fn explicit_coordinates(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let lat = parse_coordinate(lat?)?;
    let lng = parse_coordinate(lng?)?;
    if !is_valid_lat_lng(lat, lng) {
        debug!("Ignoring out-of-range coordinates ({}, {})", lat, lng);
        return None;
    }
    Some(Coordinates { lat, lng })
}
