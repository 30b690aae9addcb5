use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::core::error::AppError;
use crate::features::files::dtos::content_type_from_file_name;
use crate::features::files::services::FileService;

/// Serve a previously uploaded report photo
#[utoipa::path(
    get,
    path = "/api/uploads/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored photo file name")
    ),
    responses(
        (status = 200, description = "Photo bytes", content_type = "application/octet-stream"),
        (status = 404, description = "File not found")
    )
)]
pub async fn serve_upload(
    State(service): State<Arc<FileService>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = service.read_upload(&filename).await?;

    Ok((
        [(header::CONTENT_TYPE, content_type_from_file_name(&filename))],
        data,
    ))
}
