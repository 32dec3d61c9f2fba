// ============================================================================
// Ingest Module
// Tabular price history parsing
// ============================================================================

mod errors;
mod table;

pub use errors::{IngestionError, IngestionErrorKind};
pub use table::{
    parse_date, parse_price, parse_price_table, PriceBatch, DATE_COLUMN, DATE_FORMAT,
    ITEM_ID_COLUMN, PRICE_COLUMN,
};
