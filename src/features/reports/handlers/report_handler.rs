use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::files::dtos::PhotoUpload;
use crate::features::reports::dtos::{
    ClassifySeverityDto, CreateReportDto, CreateReportForm, DeleteReportResponseDto,
    SeverityResponseDto,
};
use crate::features::reports::models::Report;
use crate::features::reports::services::{IngestionService, ReportService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub ingestion_service: Arc<IngestionService>,
}

/// Unknown or malformed ids are both "not found"
fn parse_report_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| report_not_found(raw))
}

fn report_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Report {} not found", id))
}

/// List all reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "All reports, newest first", body = ApiResponse<Vec<Report>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<Report>>>> {
    let reports = state.report_service.list_newest_first().await?;
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Submit a new report
///
/// Accepts multipart/form-data with `emergencyType`, `location` and
/// `description` (required), plus optional `severity`, `phone`, `lat`, `lng`
/// and a `photo` file.
///
/// `severity` may be omitted or left blank, in which case it is classified
/// from the description the same way `POST /api/severity` does. A supplied
/// value must be Minor, Moderate or Severe (any case), otherwise 400.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body(
        content = CreateReportForm,
        content_type = "multipart/form-data",
        description = "Report submission form",
    ),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<Report>),
        (status = 400, description = "Invalid or missing data")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Report>>)> {
    let (dto, photo) = read_submission(multipart).await?;
    let report = state.ingestion_service.create_report(dto, photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), None, None)),
    ))
}

/// Get a report by id
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<Report>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Report>>> {
    let report_id = parse_report_id(&id)?;
    let report = state
        .report_service
        .find_by_id(report_id)
        .await?
        .ok_or_else(|| report_not_found(&id))?;

    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a report by id
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<DeleteReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteReportResponseDto>>> {
    let report_id = parse_report_id(&id)?;
    if !state.report_service.remove_by_id(report_id).await? {
        return Err(report_not_found(&id));
    }

    Ok(Json(ApiResponse::success(
        Some(DeleteReportResponseDto { deleted: true }),
        Some("Report deleted successfully".to_string()),
        None,
    )))
}

/// Classify the severity of a description without creating a report
#[utoipa::path(
    post,
    path = "/api/severity",
    request_body = ClassifySeverityDto,
    responses(
        (status = 200, description = "Derived severity", body = ApiResponse<SeverityResponseDto>),
        (status = 400, description = "Malformed body")
    ),
    tag = "reports"
)]
pub async fn classify_severity(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<ClassifySeverityDto>,
) -> Result<Json<ApiResponse<SeverityResponseDto>>> {
    let severity = state.ingestion_service.classify(&dto.description);
    Ok(Json(ApiResponse::success(
        Some(SeverityResponseDto { severity }),
        None,
        None,
    )))
}

/// Collect the multipart form into text fields and an optional photo
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(CreateReportDto, Option<PhotoUpload>)> {
    let mut dto = CreateReportDto::default();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" | "image" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                // Browsers send an empty part when no file was picked
                if file_name.is_empty() || data.is_empty() {
                    continue;
                }
                photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            name => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field {}: {}", name, e))
                })?;
                match name {
                    "emergencyType" => dto.emergency_type = text,
                    "severity" => dto.severity = Some(text),
                    "location" => dto.location = text,
                    // The map-picker form sends `address` instead of `location`
                    "address" if dto.location.trim().is_empty() => dto.location = text,
                    "description" => dto.description = text,
                    "phone" => dto.phone = Some(text),
                    "lat" => dto.lat = Some(text),
                    "lng" => dto.lng = Some(text),
                    _ => debug!("Ignoring unknown field: {}", name),
                }
            }
        }
    }

    Ok((dto, photo))
}
