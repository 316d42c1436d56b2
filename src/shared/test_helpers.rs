use axum_test::TestServer;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::core::config::{AppConfig, DatabaseConfig, StorageConfig, SwaggerConfig};
use crate::core::database;
use crate::features::requests::RequestService;
use crate::modules::storage::LocalStorage;

/// A migrated store and uploads directory living in a temporary directory
pub struct TestContext {
    pub pool: SqlitePool,
    pub storage: Arc<LocalStorage>,
    pub service: Arc<RequestService>,
    // Keeps the directory alive for the duration of the test
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let url = format!("sqlite://{}", dir.path().join("requests.sqlite").display());
        let pool = database::create_pool(&DatabaseConfig::with_url(url))
            .await
            .unwrap();
        database::run_migrations(&pool).await.unwrap();

        let storage = Arc::new(
            LocalStorage::new(StorageConfig::new(dir.path().join("uploads")))
                .await
                .unwrap(),
        );
        let service = Arc::new(RequestService::new(pool.clone(), Arc::clone(&storage)));

        Self {
            pool,
            storage,
            service,
            _dir: dir,
        }
    }

    /// Full application router served in-process
    pub fn server(&self) -> TestServer {
        let app_config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 10 * 1024 * 1024,
        };
        let swagger_config = SwaggerConfig {
            title: "Repair Intake API".to_string(),
            version: "test".to_string(),
            description: "test".to_string(),
        };

        let app = crate::create_app(
            &app_config,
            &swagger_config,
            Arc::clone(&self.service),
            &self.storage,
        );
        TestServer::new(app).unwrap()
    }

    /// Disk location of an upload given the public path stored in a record
    pub fn upload_path(&self, public_path: &str) -> PathBuf {
        let name = public_path
            .strip_prefix(self.storage.public_prefix())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap();
        self.storage
            .root()
            .join(urlencoding::decode(name).unwrap().as_ref())
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_and_docs_are_served() {
        let ctx = TestContext::new().await;
        let server = ctx.server();

        server.get("/health").await.assert_status_ok();

        let doc = server.get("/api-docs/openapi.json").await;
        doc.assert_status_ok();
        assert_eq!(doc.json::<serde_json::Value>()["info"]["version"], "test");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let ctx = TestContext::new().await;
        let server = ctx.server();

        let response = server.get("/health").await;
        assert!(!response.header("x-request-id").is_empty());
    }
}
