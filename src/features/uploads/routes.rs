use axum::Router;
use tower_http::services::ServeDir;

use crate::modules::storage::LocalStorage;

/// Serve the uploads directory under its public prefix
pub fn routes(storage: &LocalStorage) -> Router {
    Router::new().nest_service(storage.public_prefix(), ServeDir::new(storage.root()))
}
