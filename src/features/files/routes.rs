use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::files::handlers::serve_upload;
use crate::features::files::services::FileService;

/// Create routes for the files feature.
/// Uploads are served under the same prefix their public URLs are built with.
pub fn routes(file_service: Arc<FileService>) -> Router {
    let path = format!("{}/{{filename}}", file_service.url_prefix());

    Router::new()
        .route(&path, get(serve_upload))
        .with_state(file_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::dtos::PhotoUpload;
    use crate::modules::storage::LocalStorage;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_serves_under_configured_prefix() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let service = Arc::new(FileService::new(
            Arc::new(LocalStorage::new(dir.path())),
            "/media/photos",
        ));
        let stored = service
            .store_photo(PhotoUpload {
                file_name: "roof.png".to_string(),
                content_type: "image/png".to_string(),
                data: vec![9, 8, 7],
            })
            .await
            .unwrap();
        assert!(stored.url.starts_with("/media/photos/"));

        let server = TestServer::new(routes(Arc::clone(&service))).expect("test server");

        let response = server.get(&stored.url).await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
        assert_eq!(response.as_bytes().to_vec(), vec![9, 8, 7]);

        server
            .get(&format!("/api/uploads/{}", stored.file_name))
            .expect_failure()
            .await
            .assert_status_not_found();
    }
}
