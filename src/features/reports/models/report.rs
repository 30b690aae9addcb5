use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::validation::parse_coordinate;

/// Severity tier, ordered by increasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Minor => write!(f, "Minor"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Severe => write!(f, "Severe"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(format!(
                "Unknown severity '{}', expected one of Minor, Moderate, Severe",
                other
            )),
        }
    }
}

/// Lifecycle tag of a report. New reports start in `Monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    #[default]
    Monitoring,
    Verified,
    Responding,
    Resolved,
}

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A persisted disaster report.
///
/// Serialized with exactly the fields of the persisted collection; `lat` and
/// `lng` are either both present or both `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    #[serde(rename = "emergencyType")]
    pub emergency_type: String,
    pub severity: Severity,
    pub address: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lng: Option<f64>,
    pub description: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: ReportStatus,
}

impl Report {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        }
    }
}

/// Everything the ingestion pipeline derives before the store stamps
/// identity and creation time
#[derive(Debug, Clone)]
pub struct NewReport {
    pub emergency_type: String,
    pub severity: Severity,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub description: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

impl NewReport {
    pub fn into_report(self, id: Uuid, timestamp: DateTime<Utc>) -> Report {
        Report {
            id,
            emergency_type: self.emergency_type,
            severity: self.severity,
            address: self.address,
            lat: self.coordinates.map(|c| c.lat),
            lng: self.coordinates.map(|c| c.lng),
            description: self.description,
            phone: self.phone,
            image_url: self.image_url,
            timestamp,
            status: ReportStatus::Monitoring,
        }
    }
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Older collections stored coordinates as strings; accept both forms
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => parse_coordinate(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid coordinate '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Report {
        Report {
            id: Uuid::now_v7(),
            emergency_type: "Flood".to_string(),
            severity: Severity::Moderate,
            address: "Lat: 1.5, Lng: 2.5".to_string(),
            lat: Some(1.5),
            lng: Some(2.5),
            description: "River over the bank".to_string(),
            phone: None,
            image_url: None,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            status: ReportStatus::Monitoring,
        }
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("severe".parse::<Severity>(), Ok(Severity::Severe));
        assert_eq!(" Moderate ".parse::<Severity>(), Ok(Severity::Moderate));
        assert_eq!("MINOR".parse::<Severity>(), Ok(Severity::Minor));
        assert!("critical".parse::<Severity>().is_err());
    }

    #[test]
    fn test_report_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "address",
                "description",
                "emergencyType",
                "id",
                "image_url",
                "lat",
                "lng",
                "phone",
                "severity",
                "status",
                "timestamp"
            ]
        );
        assert_eq!(value["severity"], "Moderate");
        assert_eq!(value["status"], "Monitoring");
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00.000000Z");
    }

    #[test]
    fn test_legacy_string_coordinates() {
        let report: Report = serde_json::from_value(json!({
            "id": "0f8fad5bd9cb469fa16570867728950e",
            "emergencyType": "Fire",
            "severity": "Severe",
            "address": "Main St",
            "lat": "37.4",
            "lng": "-122.1",
            "description": "warehouse fire",
            "phone": null,
            "image_url": null,
            "timestamp": "2024-05-01T12:00:00.123456Z",
            "status": "Resolved"
        }))
        .unwrap();

        assert_eq!(
            report.coordinates(),
            Some(Coordinates {
                lat: 37.4,
                lng: -122.1
            })
        );
        assert_eq!(report.status, ReportStatus::Resolved);
    }

    #[test]
    fn test_legacy_non_finite_coordinate_is_rejected() {
        let result: Result<Report, _> = serde_json::from_value(json!({
            "id": "0f8fad5bd9cb469fa16570867728950e",
            "emergencyType": "Fire",
            "severity": "Severe",
            "address": "Main St",
            "lat": "inf",
            "lng": "2",
            "description": "warehouse fire",
            "phone": null,
            "image_url": null,
            "timestamp": "2024-05-01T12:00:00Z"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_new_report_starts_monitoring() {
        let new = NewReport {
            emergency_type: "Storm".to_string(),
            severity: Severity::Minor,
            address: "Harbor".to_string(),
            coordinates: None,
            description: "branches down".to_string(),
            phone: Some("555-0100".to_string()),
            image_url: None,
        };
        let id = Uuid::now_v7();
        let report = new.into_report(id, Utc::now());
        assert_eq!(report.id, id);
        assert_eq!(report.status, ReportStatus::Monitoring);
        assert_eq!(report.lat, None);
        assert_eq!(report.lng, None);
    }
}
