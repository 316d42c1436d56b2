use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::requests::dtos::{
    CreateRequestDto, CreateRequestResponseDto, ServiceRequestResponseDto, SubmitRequestFormDto,
};
use crate::features::requests::extractor::Submission;
use crate::features::requests::services::RequestService;
use crate::shared::types::ErrorResponse;

/// Submit a repair request
///
/// Accepts multipart/form-data with optional text fields `applianceName`,
/// `issueDescription`, `city`, `zip`, `lat`, `lng` and an optional `image` file,
/// or a JSON object with the same text fields.
#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "requests",
    request_body(
        content(
            (SubmitRequestFormDto = "multipart/form-data"),
            (CreateRequestDto = "application/json"),
        ),
        description = "Request form with an optional photo, or the same fields as JSON",
    ),
    responses(
        (status = 200, description = "Request stored", body = CreateRequestResponseDto),
        (status = 400, description = "Unreadable multipart or JSON body", body = ErrorResponse),
        (status = 500, description = "Store or upload failure", body = ErrorResponse)
    )
)]
pub async fn submit_request(
    State(service): State<Arc<RequestService>>,
    Submission { dto, image }: Submission,
) -> Result<Json<CreateRequestResponseDto>> {
    let created = service.create(dto, image).await?;
    Ok(Json(created))
}

/// List all repair requests
///
/// Newest first, with `location` expanded into an object.
#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "requests",
    responses(
        (status = 200, description = "All requests", body = Vec<ServiceRequestResponseDto>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_requests(
    State(service): State<Arc<RequestService>>,
) -> Result<Json<Vec<ServiceRequestResponseDto>>> {
    let requests = service.list().await?;
    Ok(Json(requests))
}
