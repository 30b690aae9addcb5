use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::features::reports::models::Coordinates;
use crate::shared::constants::GEOCODING_RESULT_LIMIT;
use crate::shared::validation::parse_coordinate;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoding service returned status {0}")]
    Status(u16),

    #[error("Failed to parse geocoding response: {0}")]
    Decode(String),

    #[error("Geocoding result has an unparseable coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Free-text address to coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text query to its best match.
    ///
    /// `Ok(None)` means the service answered but found nothing.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodingError>;
}

/// Nominatim search result. Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

impl NominatimResponse {
    pub fn coordinates(&self) -> Result<Coordinates, GeocodingError> {
        let lat = parse_coordinate(&self.lat)
            .ok_or_else(|| GeocodingError::InvalidCoordinate(self.lat.clone()))?;
        let lng = parse_coordinate(&self.lon)
            .ok_or_else(|| GeocodingError::InvalidCoordinate(self.lon.clone()))?;
        Ok(Coordinates { lat, lng })
    }
}

/// Geocoder backed by the Nominatim free-form search API
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodingError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            GEOCODING_RESULT_LIMIT
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodingError> {
        let url = self.search_url(query);
        tracing::debug!("Geocoding (free-form): {} -> {}", query, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodingError::Status(response.status().as_u16()));
        }

        let results: Vec<NominatimResponse> = response
            .json()
            .await
            .map_err(|e| GeocodingError::Decode(e.to_string()))?;

        match results.into_iter().next() {
            Some(first) => {
                tracing::debug!(
                    "Geocoded '{}' to {:?}",
                    query,
                    first.display_name.as_deref().unwrap_or("-")
                );
                first.coordinates().map(Some)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::RawQuery, http::HeaderMap, routing::get, Json, Router};
    use serde_json::{json, Value};

    /// Serve a fake Nominatim on an ephemeral port and return its base URL
    async fn spawn_fake_nominatim(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn geocoder(base_url: &str) -> NominatimGeocoder {
        NominatimGeocoder::new(base_url, "DisasterReportingApp/1.0", Duration::from_secs(2))
            .unwrap()
    }

    #[test]
    fn test_response_coordinates() {
        let r = NominatimResponse {
            lat: "37.4".to_string(),
            lon: "-122.1".to_string(),
            display_name: None,
        };
        assert_eq!(
            r.coordinates().unwrap(),
            Coordinates {
                lat: 37.4,
                lng: -122.1
            }
        );

        let bad = NominatimResponse {
            lat: "north".to_string(),
            lon: "1".to_string(),
            display_name: None,
        };
        assert!(matches!(
            bad.coordinates(),
            Err(GeocodingError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_response_rejects_non_finite_coordinates() {
        for (lat, lon) in [
            ("inf".to_string(), "1".to_string()),
            ("1".to_string(), "NaN".to_string()),
            (format!("1{}", "0".repeat(400)), "2".to_string()),
        ] {
            let r = NominatimResponse {
                lat,
                lon,
                display_name: None,
            };
            assert!(matches!(
                r.coordinates(),
                Err(GeocodingError::InvalidCoordinate(_))
            ));
        }
    }

    #[test]
    fn test_search_url_encodes_query() {
        let g = geocoder("https://nominatim.example/");
        assert_eq!(
            g.search_url("1600 Amphitheatre Parkway"),
            "https://nominatim.example/search?q=1600%20Amphitheatre%20Parkway&format=json&limit=1"
        );
    }

    #[tokio::test]
    async fn test_geocode_first_result_with_user_agent() {
        let router = Router::new().route(
            "/search",
            get(|headers: HeaderMap, RawQuery(query): RawQuery| async move {
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let query = query.unwrap_or_default();
                if agent != "DisasterReportingApp/1.0" || !query.contains("limit=1") {
                    return Json(json!([]));
                }
                Json(json!([
                    {"lat": "37.4", "lon": "-122.1", "display_name": "Googleplex"},
                    {"lat": "0", "lon": "0"}
                ]))
            }),
        );
        let base = spawn_fake_nominatim(router).await;

        let result = geocoder(&base).geocode("1600 Amphitheatre Parkway").await;
        assert_eq!(
            result.unwrap(),
            Some(Coordinates {
                lat: 37.4,
                lng: -122.1
            })
        );
    }

    #[tokio::test]
    async fn test_geocode_empty_result() {
        let router = Router::new().route("/search", get(|| async { Json(json!([])) }));
        let base = spawn_fake_nominatim(router).await;

        assert_eq!(geocoder(&base).geocode("nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_error_status() {
        let router = Router::new().route(
            "/search",
            get(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_fake_nominatim(router).await;

        assert!(matches!(
            geocoder(&base).geocode("anywhere").await,
            Err(GeocodingError::Status(429))
        ));
    }

    #[tokio::test]
    async fn test_geocode_malformed_body() {
        let router = Router::new().route(
            "/search",
            get(|| async { Json::<Value>(json!({"error": "unexpected"})) }),
        );
        let base = spawn_fake_nominatim(router).await;

        assert!(matches!(
            geocoder(&base).geocode("anywhere").await,
            Err(GeocodingError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_geocode_unreachable() {
        // Nothing listens on the discard port
        let g = geocoder("http://127.0.0.1:9");
        assert!(matches!(
            g.geocode("anywhere").await,
            Err(GeocodingError::Request(_))
        ));
    }
}
