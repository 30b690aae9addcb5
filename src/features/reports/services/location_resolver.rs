use std::sync::Arc;

use tracing::{debug, warn};

use crate::features::reports::models::Coordinates;
use crate::features::reports::services::{Geocoder, GeocodingError};
use crate::shared::validation::{parse_coordinate, EMBEDDED_COORDINATES_REGEX};

/// How a location string was (or was not) turned into coordinates
#[derive(Debug)]
pub enum LocationResolution {
    /// Parsed from a leading `Lat: <n>, Lng: <n>` marker
    Embedded(Coordinates),
    /// Answered by the geocoding service
    Geocoded(Coordinates),
    /// Nothing to resolve: empty input, geocoding disabled or no match
    Unresolved,
    /// The geocoding service failed
    Degraded(GeocodingError),
}

impl LocationResolution {
    /// Collapse to coordinates; unresolved and degraded both mean "none"
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationResolution::Embedded(c) | LocationResolution::Geocoded(c) => Some(*c),
            LocationResolution::Unresolved | LocationResolution::Degraded(_) => None,
        }
    }
}

/// Extract a coordinate pair embedded at the start of the location text.
/// Coordinate ranges are not checked here.
pub fn extract_embedded_coordinates(location: &str) -> Option<Coordinates> {
    if !(location.contains("Lat:") && location.contains("Lng:")) {
        return None;
    }

    let caps = EMBEDDED_COORDINATES_REGEX.captures(location)?;
    let lat = parse_coordinate(caps.get(1)?.as_str())?;
    let lng = parse_coordinate(caps.get(2)?.as_str())?;
    Some(Coordinates { lat, lng })
}

/// Resolves location text to coordinates, embedded markers first and the
/// geocoder second
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder: Some(geocoder),
        }
    }

    /// Resolver that only understands embedded coordinates
    pub fn without_geocoder() -> Self {
        Self { geocoder: None }
    }

    pub async fn resolve(&self, location: &str) -> LocationResolution {
        if let Some(coords) = extract_embedded_coordinates(location) {
            debug!("Using embedded coordinates {:?}", coords);
            return LocationResolution::Embedded(coords);
        }

        if location.trim().is_empty() {
            return LocationResolution::Unresolved;
        }

        let Some(geocoder) = &self.geocoder else {
            return LocationResolution::Unresolved;
        };

        match geocoder.geocode(location).await {
            Ok(Some(coords)) => LocationResolution::Geocoded(coords),
            Ok(None) => {
                debug!("No geocoding match for '{}'", location);
                LocationResolution::Unresolved
            }
            Err(e) => LocationResolution::Degraded(e),
        }
    }

    /// Resolve and collapse to optional coordinates
    pub async fn resolve_coordinates(&self, location: &str) -> Option<Coordinates> {
        match self.resolve(location).await {
            LocationResolution::Degraded(e) => {
                warn!("Geocoding '{}' failed, continuing without coordinates: {}", location, e);
                None
            }
            resolution => resolution.coordinates(),
        }
    }
}
