use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::requests::dtos::{
    CreateRequestDto, CreateRequestResponseDto, ServiceRequestResponseDto, UploadedImage,
};
use crate::features::requests::models::ServiceRequest;
use crate::modules::storage::LocalStorage;
use crate::shared::constants::CREATED_AT_FORMAT;

/// Service for repair request intake
pub struct RequestService {
    pool: SqlitePool,
    storage: Arc<LocalStorage>,
}

impl RequestService {
    pub fn new(pool: SqlitePool, storage: Arc<LocalStorage>) -> Self {
        Self { pool, storage }
    }

    /// Record a new request, storing its photo first when one is attached
    ///
    /// The photo write and the insert are independent: if the insert fails the
    /// photo stays in the uploads directory.
    pub async fn create(
        &self,
        dto: CreateRequestDto,
        image: Option<UploadedImage>,
    ) -> Result<CreateRequestResponseDto> {
        let id = Uuid::now_v7().to_string();
        let location = serde_json::to_string(&dto.location())?;

        let stored = match image {
            Some(image) => Some(self.storage.save(&image.file_name, &image.data).await?),
            None => None,
        };

        let request = ServiceRequest {
            id,
            appliance_name: dto.appliance_name,
            issue_description: dto.issue_description,
            image: stored.as_ref().map(|s| s.public_path.clone()),
            location,
            zip: dto.zip,
            created_at: Utc::now().format(CREATED_AT_FORMAT).to_string(),
        };

        if let Err(e) = self.insert(&request).await {
            if let Some(stored) = &stored {
                warn!(
                    "Upload left without a request: id={}, file={}",
                    request.id,
                    stored.disk_path.display()
                );
            }
            return Err(e);
        }

        info!(
            "Request created: id={}, appliance={:?}, image={:?}",
            request.id, request.appliance_name, request.image
        );

        Ok(CreateRequestResponseDto { id: request.id })
    }

    /// Insert one record. Fails when the id is already taken.
    pub async fn insert(&self, request: &ServiceRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO requests (id, appliance_name, issue_description, image, location, zip, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.appliance_name)
        .bind(&request.issue_description)
        .bind(&request.image)
        .bind(&request.location)
        .bind(&request.zip)
        .bind(&request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert request {}: {:?}", request.id, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    /// List every request, newest first
    ///
    /// Ordering compares the stored `created_at` text.
    pub async fn list(&self) -> Result<Vec<ServiceRequestResponseDto>> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            r#"
            SELECT id, appliance_name, issue_description, image, location, zip, created_at
            FROM requests
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list requests: {:?}", e);
            AppError::Database(e)
        })?;

        let requests = requests
            .into_iter()
            .map(ServiceRequestResponseDto::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(requests)
    }
}
