use utoipa::{Modify, OpenApi};

use crate::features::requests::{dtos as requests_dtos, handlers as requests_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        requests_handlers::request_handler::submit_request,
        requests_handlers::request_handler::list_requests,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Requests
            requests_dtos::Location,
            requests_dtos::SubmitRequestFormDto,
            requests_dtos::CreateRequestResponseDto,
            requests_dtos::ServiceRequestResponseDto,
        )
    ),
    tags(
        (name = "requests", description = "Appliance repair request intake"),
    ),
    info(
        title = "Repair Intake API",
        version = "0.1.0",
        description = "Intake API for appliance repair requests",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_request_endpoints() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/requests").unwrap();

        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[test]
    fn test_info_modifier_overrides_metadata() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Intake".to_string(),
            version: "9.9.9".to_string(),
            description: "Staging".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Intake");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("Staging"));
    }
}
