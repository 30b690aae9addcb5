use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Coordinate pair embedded at the start of a location string
    /// - Matches: "Lat: 37.77, Lng: -122.42", "Lat: 1.5, Lng: 2 (pinned on map)"
    /// - Does not match: "near Lat: 1, Lng: 2", "lat: 1, lng: 2"
    pub static ref EMBEDDED_COORDINATES_REGEX: Regex =
        Regex::new(r"^Lat: ([\d.\-]+), Lng: ([\d.\-]+)").unwrap();

    /// Characters allowed in a stored upload filename
    pub static ref SAFE_FILENAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();

    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
}

/// Check that a latitude/longitude pair lies within the legal range
pub fn is_valid_lat_lng(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Parse a decimal coordinate, rejecting values that overflow to infinity or
/// are not numbers at all
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reduce an uploaded filename to a safe single path component.
///
/// Keeps only the final path segment, replaces whitespace with `_`, drops every
/// other character outside `[A-Za-z0-9_.-]` and strips leading dots so the
/// result can never be `..` or a hidden file. Returns an empty string when
/// nothing usable remains.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&joined, "");
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// `validator` hook: reject values that are empty after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
