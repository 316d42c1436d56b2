use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header, HeaderMap},
};
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::{AppJson, AppMultipart};
use crate::features::requests::dtos::{CreateRequestDto, UploadedImage};
use crate::shared::constants::IMAGE_FIELD;

/// How a submission body is encoded, judged by its content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Multipart,
    Json,
    /// Anything else carries no readable fields
    Other,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence.starts_with("multipart/") {
        BodyKind::Multipart
    } else if essence == "application/json" || essence.ends_with("+json") {
        BodyKind::Json
    } else {
        BodyKind::Other
    }
}

/// A submitted repair request: its text fields and an optional photo
///
/// Multipart forms may carry the photo. JSON bodies carry the text fields only.
/// Any other body is an empty submission.
pub struct Submission {
    pub dto: CreateRequestDto,
    pub image: Option<UploadedImage>,
}

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Multipart => {
                let AppMultipart(multipart) = AppMultipart::from_request(req, state).await?;
                read_multipart(multipart).await
            }
            BodyKind::Json => {
                let AppJson(dto) = AppJson::<CreateRequestDto>::from_request(req, state).await?;
                Ok(Self { dto, image: None })
            }
            BodyKind::Other => {
                debug!("Submission body is neither multipart nor JSON; storing empty fields");
                Ok(Self {
                    dto: CreateRequestDto::default(),
                    image: None,
                })
            }
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut dto = CreateRequestDto::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == IMAGE_FIELD {
            // A plain text part named `image` is not an attachment
            let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                debug!("Ignoring non-file image field");
                continue;
            };

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read image bytes: {}", e);
                AppError::BadRequest(format!("Failed to read image data: {}", e))
            })?;

            // Browsers send an empty part when no file was picked
            if file_name.is_empty() && data.is_empty() {
                continue;
            }

            if image.is_some() {
                return Err(AppError::BadRequest(
                    "Only one image may be attached".to_string(),
                ));
            }

            image = Some(UploadedImage {
                file_name,
                data: data.to_vec(),
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "applianceName" => &mut dto.appliance_name,
            "issueDescription" => &mut dto.issue_description,
            "city" => &mut dto.city,
            "zip" => &mut dto.zip,
            "lat" => &mut dto.lat,
            "lng" => &mut dto.lng,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
                continue;
            }
        };

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
        })?;
        *slot = Some(text);
    }

    Ok(Submission { dto, image })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    #[test]
    fn test_body_kind_from_content_type() {
        assert_eq!(
            body_kind(&headers_with("multipart/form-data; boundary=abc")),
            BodyKind::Multipart
        );
        assert_eq!(body_kind(&headers_with("application/json")), BodyKind::Json);
        assert_eq!(
            body_kind(&headers_with("Application/JSON; charset=utf-8")),
            BodyKind::Json
        );
        assert_eq!(
            body_kind(&headers_with("application/vnd.intake+json")),
            BodyKind::Json
        );
        assert_eq!(body_kind(&headers_with("text/plain")), BodyKind::Other);
        assert_eq!(body_kind(&HeaderMap::new()), BodyKind::Other);
    }
}
