use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub geocoding: GeocodingConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which report store backend to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

/// Where reports and uploaded photos live
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    /// JSON file holding the whole report collection
    pub data_file: PathBuf,
    /// Directory for uploaded photos
    pub upload_dir: PathBuf,
    /// Public path prefix under which uploads are served
    pub uploads_url_prefix: String,
}

/// Nominatim geocoding configuration
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent
    pub user_agent: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            geocoding: GeocodingConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = parse_backend(&env::var("STORE_BACKEND").unwrap_or_else(|_| "file".into()))?;
        let data_file = env::var("DATA_FILE").unwrap_or_else(|_| "data.json".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".to_string());
        let uploads_url_prefix = normalize_url_prefix(
            &env::var("UPLOADS_URL_PREFIX").unwrap_or_else(|_| "/api/uploads".to_string()),
        )?;

        Ok(Self {
            backend,
            data_file: PathBuf::from(data_file),
            upload_dir: PathBuf::from(upload_dir),
            uploads_url_prefix,
        })
    }
}

impl GeocodingConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let enabled = parse_bool(
            "GEOCODING_ENABLED",
            &env::var("GEOCODING_ENABLED").unwrap_or_else(|_| "true".to_string()),
        )?;

        let base_url = env::var("NOMINATIM_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = env::var("GEOCODING_USER_AGENT")
            .unwrap_or_else(|_| "DisasterReportingApp/1.0".to_string());

        let timeout_secs = env::var("GEOCODING_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "GEOCODING_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            enabled,
            base_url,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Disaster Report API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen disaster and emergency reporting".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Uploads are served from a route built on this prefix, so it must be a
/// non-root absolute path without a trailing slash
fn normalize_url_prefix(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err("UPLOADS_URL_PREFIX must not be empty or '/'".to_string());
    }
    Ok(format!("/{}", trimmed))
}

fn parse_backend(raw: &str) -> Result<StoreBackend, String> {
    match raw.trim().to_lowercase().as_str() {
        "file" => Ok(StoreBackend::File),
        "memory" => Ok(StoreBackend::Memory),
        other => Err(format!(
            "STORE_BACKEND must be 'file' or 'memory', got '{}'",
            other
        )),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{} must be a boolean", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(parse_origins("*"), vec!["*".to_string()]);
    }

    #[test]
    fn test_normalize_url_prefix() {
        assert_eq!(normalize_url_prefix("/api/uploads/"), Ok("/api/uploads".to_string()));
        assert_eq!(normalize_url_prefix("media"), Ok("/media".to_string()));
        assert!(normalize_url_prefix(" / ").is_err());
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("File"), Ok(StoreBackend::File));
        assert_eq!(parse_backend(" memory "), Ok(StoreBackend::Memory));
        assert!(parse_backend("postgres").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("X", "TRUE"), Ok(true));
        assert_eq!(parse_bool("X", "off"), Ok(false));
        assert!(parse_bool("X", "maybe").is_err());
    }
}
