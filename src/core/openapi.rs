use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::list_reports,
        reports_handlers::create_report,
        reports_handlers::get_report,
        reports_handlers::delete_report,
        reports_handlers::classify_severity,
        // Files
        files_handlers::serve_upload,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::Severity,
            reports_models::ReportStatus,
            reports_models::Report,
            reports_dtos::CreateReportForm,
            reports_dtos::ClassifySeverityDto,
            reports_dtos::SeverityResponseDto,
            reports_dtos::DeleteReportResponseDto,
            ApiResponse<reports_models::Report>,
            ApiResponse<Vec<reports_models::Report>>,
            ApiResponse<reports_dtos::SeverityResponseDto>,
            ApiResponse<reports_dtos::DeleteReportResponseDto>,
            // Files
            files_dtos::StoredPhotoDto,
        )
    ),
    tags(
        (name = "reports", description = "Disaster reports and severity classification"),
        (name = "files", description = "Uploaded report photos"),
    ),
    info(
        title = "Disaster Report API",
        version = "0.1.0",
        description = "Citizen disaster and emergency reporting",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
