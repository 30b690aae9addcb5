use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::features::reports::models::Severity;

/// Text fields of a report submission, collected from the multipart form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateReportDto {
    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "emergencyType is required"
    ))]
    pub emergency_type: String,
    /// Blank means "derive from the description"
    pub severity: Option<String>,
    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "location is required"
    ))]
    pub location: String,
    #[validate(custom(
        function = "crate::shared::validation::validate_not_blank",
        message = "description is required"
    ))]
    pub description: String,
    pub phone: Option<String>,
    /// Explicit coordinates from a map picker
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Flatten validator errors into one sorted, human-readable message
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    format!("Invalid or missing data: {}", messages.join(", "))
}

/// Report submission form for OpenAPI documentation.
/// The handler reads `multipart/form-data` directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportForm {
    #[schema(rename = "emergencyType", example = "Flood")]
    pub emergency_type: String,
    /// Minor, Moderate or Severe; derived from the description when omitted
    #[schema(example = "Moderate")]
    pub severity: Option<String>,
    /// Free-form address, or "Lat: <n>, Lng: <n>"
    #[schema(example = "Lat: 37.77, Lng: -122.42")]
    pub location: String,
    pub description: String,
    pub phone: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClassifySeverityDto {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeverityResponseDto {
    pub severity: Severity,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteReportResponseDto {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dto() {
        let dto = CreateReportDto {
            emergency_type: "Fire".to_string(),
            location: "Main St".to_string(),
            description: "Smoke from roof".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let dto = CreateReportDto {
            emergency_type: "Fire".to_string(),
            location: "   ".to_string(),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Invalid or missing data: description is required, location is required"
        );
    }
}
