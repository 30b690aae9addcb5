use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{IngestionService, ReportService};
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Create routes for the reports feature
pub fn routes(
    report_service: Arc<ReportService>,
    ingestion_service: Arc<IngestionService>,
) -> Router {
    let state = ReportState {
        report_service,
        ingestion_service,
    };

    Router::new()
        .route(
            "/api/reports",
            // Allow a full-size photo plus the rest of the multipart form
            get(handlers::list_reports)
                .post(handlers::create_report)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route("/api/severity", post(handlers::classify_severity))
        .with_state(state)
}
