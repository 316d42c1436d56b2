use sqlx::FromRow;

use crate::features::requests::dtos::{Location, ServiceRequestResponseDto};

/// Database model for a repair request
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRequest {
    pub id: String,
    pub appliance_name: Option<String>,
    pub issue_description: Option<String>,
    pub image: Option<String>,
    /// Location serialized as JSON text
    pub location: String,
    pub zip: Option<String>,
    pub created_at: String,
}

impl TryFrom<ServiceRequest> for ServiceRequestResponseDto {
    type Error = serde_json::Error;

    fn try_from(r: ServiceRequest) -> Result<Self, Self::Error> {
        let location: Location = serde_json::from_str(&r.location)?;

        Ok(Self {
            id: r.id,
            appliance_name: r.appliance_name,
            issue_description: r.issue_description,
            image: r.image,
            location,
            zip: r.zip,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location: &str) -> ServiceRequest {
        ServiceRequest {
            id: "1".to_string(),
            appliance_name: Some("Oven".to_string()),
            issue_description: Some("Won't heat".to_string()),
            image: None,
            location: location.to_string(),
            zip: None,
            created_at: "2026-10-19 00:00:00.000 UTC".to_string(),
        }
    }

    #[test]
    fn test_location_text_is_expanded() {
        let dto = ServiceRequestResponseDto::try_from(row(
            r#"{"city":"Springfield","lat":39.78,"lng":-89.65}"#,
        ))
        .unwrap();

        assert_eq!(
            dto.location,
            Location {
                city: Some("Springfield".to_string()),
                lat: Some(39.78),
                lng: Some(-89.65),
            }
        );
    }

    #[test]
    fn test_location_with_missing_keys() {
        let dto = ServiceRequestResponseDto::try_from(row(r#"{"lat":null}"#)).unwrap();
        assert_eq!(dto.location, Location::default());
    }

    #[test]
    fn test_corrupt_location_is_an_error() {
        assert!(ServiceRequestResponseDto::try_from(row("not json")).is_err());
    }
}
