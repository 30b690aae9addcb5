mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StoreBackend};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::reports::{
    routes as reports_routes, FileReportStore, InMemoryReportStore, IngestionService,
    LocationResolver, NominatimGeocoder, ReportService, ReportStore, SeverityClassifier,
};
use crate::modules::storage::LocalStorage;
use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Report store
    let store: Arc<dyn ReportStore> = match config.storage.backend {
        StoreBackend::File => {
            let file_store = FileReportStore::new(config.storage.data_file.clone());
            tracing::info!("Using file report store at {}", file_store.path().display());
            Arc::new(file_store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory report store, reports will not survive a restart");
            Arc::new(InMemoryReportStore::new())
        }
    };
    let report_service = Arc::new(ReportService::new(store));

    // Photo uploads
    let local_storage = Arc::new(LocalStorage::new(config.storage.upload_dir.clone()));
    local_storage
        .ensure_root_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload directory: {}", e))?;
    tracing::info!(
        "Upload storage initialized at {}",
        local_storage.root().display()
    );
    let file_service = Arc::new(FileService::new(
        Arc::clone(&local_storage),
        config.storage.uploads_url_prefix.clone(),
    ));

    // Geocoding
    let resolver = if config.geocoding.enabled {
        let geocoder = NominatimGeocoder::new(
            config.geocoding.base_url.clone(),
            &config.geocoding.user_agent,
            config.geocoding.timeout,
        )
        .map_err(|e| anyhow::anyhow!("Failed to create geocoder: {}", e))?;
        tracing::info!("Geocoding enabled ({})", config.geocoding.base_url);
        LocationResolver::new(Arc::new(geocoder))
    } else {
        tracing::info!("Geocoding disabled, only embedded coordinates are resolved");
        LocationResolver::without_geocoder()
    };

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::clone(&report_service),
        Arc::clone(&file_service),
        resolver,
        SeverityClassifier::new(),
    ));
    tracing::info!("Report services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(reports_routes::routes(report_service, ingestion_service))
        .merge(files_routes::routes(file_service))
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(&config.app.cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
