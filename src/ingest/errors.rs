// ============================================================================
// Ingestion Errors
// ============================================================================

use crate::domain::ObservationError;
use std::fmt;

/// What went wrong with a price table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionErrorKind {
    /// Reading the source failed
    Io(String),
    /// The input has no header row
    MissingHeader,
    /// A required column is absent from the header
    MissingColumn(&'static str),
    /// A row is shorter than the header demands
    MissingField(&'static str),
    /// A quoted field is never closed
    UnterminatedQuote,
    /// An item id field is blank
    EmptyItemId,
    /// A price field is not a decimal number
    MalformedPrice(String),
    /// A date field is neither `YYYY-MM-DD` nor RFC 3339
    MalformedDate(String),
    /// A price parsed but is not acceptable
    InvalidPrice(ObservationError),
}

/// A rejected price table, pointing at the first failing line (1-based,
/// header included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionError {
    pub line: usize,
    pub kind: IngestionErrorKind,
}

impl IngestionError {
    pub fn new(line: usize, kind: IngestionErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for IngestionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionErrorKind::Io(reason) => write!(f, "read failed: {}", reason),
            IngestionErrorKind::MissingHeader => write!(f, "missing header row"),
            IngestionErrorKind::MissingColumn(column) => write!(f, "missing column {}", column),
            IngestionErrorKind::MissingField(column) => write!(f, "missing value for {}", column),
            IngestionErrorKind::UnterminatedQuote => write!(f, "unterminated quoted field"),
            IngestionErrorKind::EmptyItemId => write!(f, "empty item id"),
            IngestionErrorKind::MalformedPrice(raw) => write!(f, "malformed price '{}'", raw),
            IngestionErrorKind::MalformedDate(raw) => write!(f, "malformed date '{}'", raw),
            IngestionErrorKind::InvalidPrice(err) => write!(f, "{}", err),
        }
    }
}

impl fmt::Display for IngestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for IngestionError {}
