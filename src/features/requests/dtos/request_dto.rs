use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Where the appliance is. Each part is null when the client did not send it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = "Springfield")]
    pub city: Option<String>,
    #[schema(example = 39.78)]
    pub lat: Option<f64>,
    #[schema(example = json!(-89.65))]
    pub lng: Option<f64>,
}

/// Text fields of a submission, from a multipart form or a JSON body
///
/// Every field is optional. Coordinates are kept raw until [`Self::location`]
/// coerces them. JSON numbers and booleans are accepted and kept as their text.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestDto {
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "Refrigerator")]
    pub appliance_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "Not cooling")]
    pub issue_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "Springfield")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "62704")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "39.78")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    #[schema(example = "-89.65")]
    pub lng: Option<String>,
}

/// Read any JSON value as optional text; only `null` is absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl CreateRequestDto {
    /// Assemble the location; unusable coordinates become null rather than an error
    pub fn location(&self) -> Location {
        Location {
            city: self.city.clone(),
            lat: parse_coordinate(self.lat.as_deref()),
            lng: parse_coordinate(self.lng.as_deref()),
        }
    }
}

/// Parse a coordinate form value from its leading number, so `"39.78N"` reads as 39.78
///
/// Input without a leading number, and non-finite values, yield `None`.
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| leading_number(s.trim_start()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Longest prefix of `s` shaped like a decimal number: sign, digits, fraction, exponent
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_digits = digits_from(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    // The exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_start = end + 1;
        if matches!(bytes.get(exponent_start), Some(b'+' | b'-')) {
            exponent_start += 1;
        }
        let exponent_digits = digits_from(exponent_start);
        if exponent_digits > 0 {
            end = exponent_start + exponent_digits;
        }
    }

    Some(&s[..end])
}

/// Photo attached to a submission
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Filename as sent by the client
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Submit request form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitRequestFormDto {
    #[schema(example = "Refrigerator")]
    pub appliance_name: Option<String>,
    #[schema(example = "Not cooling")]
    pub issue_description: Option<String>,
    #[schema(example = "Springfield")]
    pub city: Option<String>,
    #[schema(example = "62704")]
    pub zip: Option<String>,
    /// Latitude as a decimal string
    #[schema(example = "39.78")]
    pub lat: Option<String>,
    /// Longitude as a decimal string
    #[schema(example = "-89.65")]
    pub lng: Option<String>,
    /// Optional photo of the appliance
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Returned after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRequestResponseDto {
    #[schema(example = "0192a0c4-5f7e-7c1a-9d51-3b2f0e8c1a77")]
    pub id: String,
}

/// A stored repair request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestResponseDto {
    pub id: String,
    pub appliance_name: Option<String>,
    pub issue_description: Option<String>,
    /// Public path of the attached photo, e.g. `/uploads/1700000000000-fridge.jpg`
    pub image: Option<String>,
    pub location: Location,
    pub zip: Option<String>,
    #[schema(example = "2026-10-19 14:03:27.512 UTC")]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate(Some("39.78")), Some(39.78));
        assert_eq!(parse_coordinate(Some(" -89.65 ")), Some(-89.65));
        assert_eq!(parse_coordinate(Some("0")), Some(0.0));
        assert_eq!(parse_coordinate(Some("")), None);
        assert_eq!(parse_coordinate(Some("north")), None);
        assert_eq!(parse_coordinate(Some("NaN")), None);
        assert_eq!(parse_coordinate(Some("inf")), None);
        assert_eq!(parse_coordinate(None), None);
    }

    #[test]
    fn test_parse_coordinate_reads_leading_number() {
        assert_eq!(parse_coordinate(Some("39.78N")), Some(39.78));
        assert_eq!(parse_coordinate(Some("-89.65 W")), Some(-89.65));
        assert_eq!(parse_coordinate(Some("  .5deg")), Some(0.5));
        assert_eq!(parse_coordinate(Some("12.")), Some(12.0));
        assert_eq!(parse_coordinate(Some("1e3x")), Some(1000.0));
        assert_eq!(parse_coordinate(Some("4e")), Some(4.0));
        assert_eq!(parse_coordinate(Some("2.5e-1")), Some(0.25));
        assert_eq!(parse_coordinate(Some("-")), None);
        assert_eq!(parse_coordinate(Some(".")), None);
        assert_eq!(parse_coordinate(Some("N39.78")), None);
    }

    #[test]
    fn test_create_dto_from_json() {
        let dto: CreateRequestDto = serde_json::from_value(serde_json::json!({
            "applianceName": "Washer",
            "zip": 62704,
            "lat": 39.78,
            "lng": null,
            "unknown": "ignored"
        }))
        .unwrap();

        assert_eq!(dto.appliance_name.as_deref(), Some("Washer"));
        assert_eq!(dto.zip.as_deref(), Some("62704"));
        assert_eq!(dto.issue_description, None);
        assert_eq!(dto.lng, None);
        assert_eq!(dto.location().lat, Some(39.78));
    }

    #[test]
    fn test_location_keeps_missing_coordinates_null() {
        let dto = CreateRequestDto {
            city: Some("Springfield".to_string()),
            ..Default::default()
        };

        let location = dto.location();
        assert_eq!(location.city.as_deref(), Some("Springfield"));
        assert_eq!(location.lat, None);
        assert_eq!(location.lng, None);

        let json = serde_json::to_value(&location).unwrap();
        assert!(json["lat"].is_null());
        assert!(json["lng"].is_null());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let dto = ServiceRequestResponseDto {
            id: "abc".to_string(),
            appliance_name: Some("Dryer".to_string()),
            issue_description: None,
            image: None,
            location: Location::default(),
            zip: Some("10001".to_string()),
            created_at: "2026-10-19 14:03:27.512 UTC".to_string(),
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["applianceName"], "Dryer");
        assert!(json["issueDescription"].is_null());
        assert!(json["image"].is_null());
        assert_eq!(json["createdAt"], "2026-10-19 14:03:27.512 UTC");
    }
}
