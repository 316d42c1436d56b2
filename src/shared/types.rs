use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Underlying error message
    #[schema(example = "UNIQUE constraint failed: requests.id")]
    pub error: String,
}
