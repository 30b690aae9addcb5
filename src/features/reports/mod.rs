pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{
    IngestionService, LocationResolver, NominatimGeocoder, ReportService, SeverityClassifier,
};
pub use store::{FileReportStore, InMemoryReportStore, ReportStore};
