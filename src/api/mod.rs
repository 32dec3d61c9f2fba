// ============================================================================
// API Module
// Request/response shapes and constants of the public price-anomaly surface
// ============================================================================

use crate::engine::{AnomalyError, InvalidInput};
use crate::ingest::IngestionErrorKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const API_PRODUCT: &str = "api/v1/price-anomaly";
pub const API_VERSION: &str = "v1";
pub const API_CONTENT_TYPE: &str = "application/json";
pub const API_METHOD_IS_ANOMALY: &str = "POST - isAnomaly";
pub const API_METHOD_UPLOAD: &str = "POST - UploadData";

pub const MSG_RESPONSE_OK: &str = "Operation completed successfully";
pub const MSG_UPLOAD_OK: &str = "Data loaded successfully";
pub const MSG_NOT_FOUND: &str = "Resource not found";
pub const MSG_BAD_REQUEST: &str = "The supplied value is missing or has the wrong type";
pub const MSG_BAD_FILE: &str = "The price data could not be read; CSV input is required";
pub const MSG_BAD_DATA_CSV: &str = "The CSV data is corrupt and cannot be read, check the file requirements";
pub const MSG_BAD_DATE_FORMAT: &str = "The CSV data is not in the expected format, check the file requirements";
pub const MSG_INTERNAL: &str = "The price could not be evaluated";

/// Headers every response carries: method, version and content type.
pub fn response_headers(method: &'static str) -> [(&'static str, &'static str); 3] {
    [
        ("API-Method", method),
        ("API-Version", API_VERSION),
        ("Content-Type", API_CONTENT_TYPE),
    ]
}

// ============================================================================
// Request
// ============================================================================

/// A price to check for one item
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemPriceRequest {
    pub item_id: String,
    pub price: Decimal,
}

impl ItemPriceRequest {
    pub fn new(item_id: impl Into<String>, price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            price,
        }
    }

    /// Check the request fields, returning the validated price.
    pub fn validate(&self) -> Result<Decimal, AnomalyError> {
        if self.item_id.trim().is_empty() {
            return Err(AnomalyError::InvalidInput(InvalidInput::MissingField("item_id")));
        }
        Ok(crate::domain::validate_price(self.price)?)
    }
}

// ============================================================================
// Response
// ============================================================================

/// Human-readable outcome attached to every response
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseMetadata {
    pub message: String,
    pub date_time: DateTime<Utc>,
}

impl ResponseMetadata {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            date_time: Utc::now(),
        }
    }
}

/// Response of the check and upload operations and of failed lookups.
///
/// Absent fields are left out when serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemPriceResponse {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub item_id: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub price: Option<Decimal>,

    /// `"true"` or `"false"`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub anomaly: Option<String>,

    pub metadata: ResponseMetadata,

    pub status_code: String,
}

impl ItemPriceResponse {
    /// Successful check of `price` for `item_id`
    pub fn judged(item_id: impl Into<String>, price: Decimal, anomaly: bool) -> Self {
        Self {
            item_id: Some(item_id.into()),
            price: Some(price),
            anomaly: Some(anomaly.to_string()),
            metadata: ResponseMetadata::new(MSG_RESPONSE_OK),
            status_code: "200".to_string(),
        }
    }

    /// Successful bulk upload
    pub fn uploaded() -> Self {
        Self {
            item_id: None,
            price: None,
            anomaly: None,
            metadata: ResponseMetadata::new(MSG_UPLOAD_OK),
            status_code: "200".to_string(),
        }
    }

    /// Error response with the status code and message matching `err`
    pub fn from_error(err: &AnomalyError) -> Self {
        Self {
            item_id: None,
            price: None,
            anomaly: None,
            metadata: ResponseMetadata::new(error_message(err)),
            status_code: err.status_code().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }
}

fn error_message(err: &AnomalyError) -> &'static str {
    match err {
        AnomalyError::NotFound { .. } => MSG_NOT_FOUND,
        AnomalyError::InvalidInput(InvalidInput::Table(table)) => match table.kind {
            IngestionErrorKind::Io(_) | IngestionErrorKind::MissingHeader => MSG_BAD_FILE,
            IngestionErrorKind::MalformedDate(_) => MSG_BAD_DATE_FORMAT,
            _ => MSG_BAD_DATA_CSV,
        },
        AnomalyError::InvalidInput(_) => MSG_BAD_REQUEST,
        AnomalyError::Precision(_) => MSG_INTERNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestionError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_validation() {
        assert_eq!(ItemPriceRequest::new("MLA-1", dec!(10)).validate(), Ok(dec!(10)));

        let blank = ItemPriceRequest::new("  ", dec!(10)).validate().unwrap_err();
        assert_eq!(blank.status_code(), 400);

        let cheap = ItemPriceRequest::new("MLA-1", dec!(0.001)).validate().unwrap_err();
        assert_eq!(cheap.status_code(), 400);
    }

    #[test]
    fn test_judged_response() {
        let response = ItemPriceResponse::judged("MLA-1", dec!(150), true);
        assert_eq!(response.anomaly.as_deref(), Some("true"));
        assert_eq!(response.status_code, "200");
        assert!(response.is_success());
        assert_eq!(response.metadata.message, MSG_RESPONSE_OK);
    }

    #[test]
    fn test_error_responses() {
        let missing = ItemPriceResponse::from_error(&AnomalyError::not_found("x"));
        assert_eq!(missing.status_code, "404");
        assert_eq!(missing.metadata.message, MSG_NOT_FOUND);
        assert!(missing.item_id.is_none());

        let bad_date = ItemPriceResponse::from_error(&AnomalyError::from(IngestionError::new(
            2,
            IngestionErrorKind::MalformedDate("01/10/2023".to_string()),
        )));
        assert_eq!(bad_date.status_code, "400");
        assert_eq!(bad_date.metadata.message, MSG_BAD_DATE_FORMAT);

        let bad_price = ItemPriceResponse::from_error(&AnomalyError::from(IngestionError::new(
            2,
            IngestionErrorKind::MalformedPrice("abc".to_string()),
        )));
        assert_eq!(bad_price.metadata.message, MSG_BAD_DATA_CSV);
    }

    #[test]
    fn test_headers() {
        let headers = response_headers(API_METHOD_UPLOAD);
        assert_eq!(headers[0], ("API-Method", "POST - UploadData"));
        assert_eq!(headers[1], ("API-Version", "v1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_upload_response_omits_absent_fields() {
        let json = serde_json::to_value(ItemPriceResponse::uploaded()).unwrap();
        assert!(json.get("item_id").is_none());
        assert!(json.get("anomaly").is_none());
        assert_eq!(json["status_code"], "200");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_request_from_json() {
        let request: ItemPriceRequest =
            serde_json::from_str(r#"{"item_id":"MLA-1","price":"100.5"}"#).unwrap();
        assert_eq!(request, ItemPriceRequest::new("MLA-1", dec!(100.5)));
    }
}
