use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::requests::handlers;
use crate::features::requests::services::RequestService;

/// Create routes for the requests feature
///
/// `max_body_size` bounds a whole submission, photo included.
pub fn routes(service: Arc<RequestService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/requests",
            get(handlers::list_requests)
                .post(handlers::submit_request)
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(service)
}
