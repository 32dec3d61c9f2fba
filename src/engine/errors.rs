// ============================================================================
// Detector Errors
// ============================================================================

use crate::domain::ObservationError;
use crate::ingest::IngestionError;
use crate::numeric::NumericError;
use std::fmt;

/// Rejected input, surfaced to the caller as a bad request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// A request price failed validation
    Price(ObservationError),
    /// A request field is missing or blank
    MissingField(&'static str),
    /// A price table could not be parsed
    Table(IngestionError),
}

/// Detector-level errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyError {
    /// Unknown item id
    NotFound { item_id: String },
    InvalidInput(InvalidInput),
    /// Arithmetic failure inside the statistics
    Precision(NumericError),
}

impl AnomalyError {
    pub fn not_found(item_id: impl Into<String>) -> Self {
        AnomalyError::NotFound {
            item_id: item_id.into(),
        }
    }

    /// Status code the public surface reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AnomalyError::NotFound { .. } => 404,
            AnomalyError::InvalidInput(_) => 400,
            AnomalyError::Precision(_) => 500,
        }
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::Price(err) => write!(f, "{}", err),
            InvalidInput::MissingField(field) => write!(f, "missing field {}", field),
            InvalidInput::Table(err) => write!(f, "invalid price table: {}", err),
        }
    }
}

impl fmt::Display for AnomalyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyError::NotFound { item_id } => write!(f, "item {} not found", item_id),
            AnomalyError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            AnomalyError::Precision(err) => write!(f, "precision error: {}", err),
        }
    }
}

impl std::error::Error for AnomalyError {}

impl From<NumericError> for AnomalyError {
    fn from(err: NumericError) -> Self {
        AnomalyError::Precision(err)
    }
}

impl From<ObservationError> for AnomalyError {
    fn from(err: ObservationError) -> Self {
        AnomalyError::InvalidInput(InvalidInput::Price(err))
    }
}

impl From<IngestionError> for AnomalyError {
    fn from(err: IngestionError) -> Self {
        AnomalyError::InvalidInput(InvalidInput::Table(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestionErrorKind;
    use rust_decimal::Decimal;

    #[test]
    fn test_status_codes() {
        assert_eq!(AnomalyError::not_found("x").status_code(), 404);
        assert_eq!(
            AnomalyError::from(ObservationError::PriceBelowMinimum(Decimal::ZERO)).status_code(),
            400
        );
        assert_eq!(AnomalyError::from(NumericError::Overflow).status_code(), 500);
    }

    #[test]
    fn test_display() {
        assert_eq!(AnomalyError::not_found("MLA-1").to_string(), "item MLA-1 not found");

        let err = AnomalyError::from(IngestionError::new(
            4,
            IngestionErrorKind::MalformedDate("x".to_string()),
        ));
        assert_eq!(
            err.to_string(),
            "invalid input: invalid price table: line 4: malformed date 'x'"
        );
    }
}
