mod geocoding_service;
mod ingestion_service;
mod location_resolver;
mod report_service;
mod severity_classifier;

pub use geocoding_service::{Geocoder, GeocodingError, NominatimGeocoder};
pub use ingestion_service::IngestionService;
pub use location_resolver::LocationResolver;
pub use report_service::ReportService;
pub use severity_classifier::SeverityClassifier;
