// ============================================================================
// Price Table Parser
// Comma-separated ITEM_ID / PRICE / ORD_CLOSED_DT rows into per-item histories
// ============================================================================

use super::errors::{IngestionError, IngestionErrorKind};
use crate::domain::PriceObservation;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;

pub const ITEM_ID_COLUMN: &str = "ITEM_ID";
pub const PRICE_COLUMN: &str = "PRICE";
pub const DATE_COLUMN: &str = "ORD_CLOSED_DT";

/// Calendar date format of the date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Observations grouped by item id, in file order per item
pub type PriceBatch = BTreeMap<String, Vec<PriceObservation>>;

/// Parse a whole price table.
///
/// The first non-blank line is the header; column order is free and extra
/// columns are ignored. Blank lines are skipped. A quoted field may span
/// line breaks; errors name the line its record starts on. The first
/// malformed row rejects the entire table.
///
/// # Example
/// ```
/// use price_anomaly::ingest::parse_price_table;
///
/// let table = "ITEM_ID,PRICE,ORD_CLOSED_DT\nMLA-1,10.5,2023-10-01\nMLA-1,11,2023-10-02\n";
/// let batch = parse_price_table(table.as_bytes()).unwrap();
/// assert_eq!(batch["MLA-1"].len(), 2);
/// ```
pub fn parse_price_table<R: BufRead>(reader: R) -> Result<PriceBatch, IngestionError> {
    let mut columns: Option<Columns> = None;
    let mut batch = PriceBatch::new();
    let mut open: Option<(usize, Record)> = None;

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|e| IngestionError::new(number, IngestionErrorKind::Io(e.to_string())))?;

        let (start, mut record) = match open.take() {
            Some(continued) => continued,
            None if line.trim().is_empty() => continue,
            None => (number, Record::default()),
        };

        let Some(fields) = record.feed(&line) else {
            open = Some((start, record));
            continue;
        };

        match &columns {
            None => {
                columns = Some(Columns::from_header(&fields).map_err(|kind| IngestionError::new(start, kind))?);
            },
            Some(layout) => {
                let (item_id, observation) = layout
                    .parse_row(&fields)
                    .map_err(|kind| IngestionError::new(start, kind))?;
                batch.entry(item_id).or_default().push(observation);
            },
        }
    }

    if let Some((start, _)) = open {
        return Err(IngestionError::new(start, IngestionErrorKind::UnterminatedQuote));
    }

    if columns.is_none() {
        return Err(IngestionError::new(1, IngestionErrorKind::MissingHeader));
    }

    Ok(batch)
}

/// Parse a price in plain (`10.5`) or scientific (`1.05E1`) notation.
pub fn parse_price(raw: &str) -> Result<Decimal, IngestionErrorKind> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| IngestionErrorKind::MalformedPrice(raw.to_string()))
}

/// Parse a `YYYY-MM-DD` date (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, IngestionErrorKind> {
    let raw = raw.trim();
    let malformed = || IngestionErrorKind::MalformedDate(raw.to_string());

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(malformed)?;
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| malformed())
}

// ============================================================================
// Layout
// ============================================================================

struct Columns {
    item_id: usize,
    price: usize,
    date: usize,
}

impl Columns {
    fn from_header(fields: &[String]) -> Result<Self, IngestionErrorKind> {
        let find = |name: &'static str| {
            fields
                .iter()
                .position(|field| field.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
                .ok_or(IngestionErrorKind::MissingColumn(name))
        };

        Ok(Self {
            item_id: find(ITEM_ID_COLUMN)?,
            price: find(PRICE_COLUMN)?,
            date: find(DATE_COLUMN)?,
        })
    }

    fn parse_row(&self, fields: &[String]) -> Result<(String, PriceObservation), IngestionErrorKind> {
        let field = |index: usize, name: &'static str| {
            fields
                .get(index)
                .map(|value| value.trim())
                .ok_or(IngestionErrorKind::MissingField(name))
        };

        let item_id = field(self.item_id, ITEM_ID_COLUMN)?;
        if item_id.is_empty() {
            return Err(IngestionErrorKind::EmptyItemId);
        }

        let price = parse_price(field(self.price, PRICE_COLUMN)?)?;
        let timestamp = parse_date(field(self.date, DATE_COLUMN)?)?;
        let observation =
            PriceObservation::new(timestamp, price).map_err(IngestionErrorKind::InvalidPrice)?;

        Ok((item_id.to_string(), observation))
    }
}

/// Comma-separated fields of one record. Double-quoted fields may contain
/// commas, `""` escapes and line breaks, so a record can take several lines.
#[derive(Default)]
struct Record {
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
}

impl Record {
    /// Consume one physical line. Yields the fields once no quote is open.
    fn feed(&mut self, line: &str) -> Option<Vec<String>> {
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' if self.in_quotes => {
                    if chars.peek() == Some(&'"') {
                        self.field.push('"');
                        chars.next();
                    } else {
                        self.in_quotes = false;
                    }
                },
                '"' if self.field.trim().is_empty() => {
                    self.field.clear();
                    self.in_quotes = true;
                },
                ',' if !self.in_quotes => self.fields.push(std::mem::take(&mut self.field)),
                _ => self.field.push(c),
            }
        }

        if self.in_quotes {
            self.field.push('\n');
            return None;
        }

        self.fields.push(std::mem::take(&mut self.field));
        Some(std::mem::take(&mut self.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationError;
    use rust_decimal_macros::dec;

    fn parse(table: &str) -> Result<PriceBatch, IngestionError> {
        parse_price_table(table.as_bytes())
    }

    #[test]
    fn test_groups_rows_by_item() {
        let batch = parse(
            "ITEM_ID,PRICE,ORD_CLOSED_DT\n\
             MLA-1,10.5,2023-10-01\n\
             MLA-2,20.0,2023-10-02\n\
             MLA-1,11,2023-10-03\n",
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        let first: Vec<Decimal> = batch["MLA-1"].iter().map(|o| o.price()).collect();
        assert_eq!(first, vec![dec!(10.5), dec!(11)]);
        assert_eq!(batch["MLA-2"][0].price(), dec!(20.0));
    }

    #[test]
    fn test_date_is_midnight_utc() {
        let batch = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\nA,1,2023-10-01\n").unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        assert_eq!(batch["A"][0].timestamp(), expected);
    }

    #[test]
    fn test_rfc3339_dates() {
        let parsed = parse_date("2023-10-01T12:30:00-03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 1, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let batch = parse(
            "SITE,ORD_CLOSED_DT,ITEM_ID,PRICE\n\
             MLA,2023-10-01,X,5\n",
        )
        .unwrap();
        assert_eq!(batch["X"][0].price(), dec!(5));
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let batch = parse(
            "\u{feff}ITEM_ID,PRICE,ORD_CLOSED_DT\r\n\
             \"MLA,\"\"1\"\"\",\"12.50\",2023-10-01\r\n",
        )
        .unwrap();
        assert_eq!(batch["MLA,\"1\""][0].price(), dec!(12.50));
    }

    #[test]
    fn test_scientific_price() {
        assert_eq!(parse_price("1.05E2").unwrap(), dec!(105));
        assert_eq!(parse_price(" 99.9 ").unwrap(), dec!(99.9));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let batch = parse("\nITEM_ID,PRICE,ORD_CLOSED_DT\n\nA,1,2023-10-01\n\n").unwrap();
        assert_eq!(batch["A"].len(), 1);
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        assert!(parse("ITEM_ID,PRICE,ORD_CLOSED_DT\n").unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.kind, IngestionErrorKind::MissingHeader);
    }

    #[test]
    fn test_missing_column() {
        let err = parse("ITEM_ID,ORD_CLOSED_DT\nA,2023-10-01\n").unwrap_err();
        assert_eq!(err, IngestionError::new(1, IngestionErrorKind::MissingColumn(PRICE_COLUMN)));
    }

    #[test]
    fn test_malformed_price_names_line() {
        let err = parse(
            "ITEM_ID,PRICE,ORD_CLOSED_DT\n\
             A,1,2023-10-01\n\
             A,abc,2023-10-02\n",
        )
        .unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, IngestionErrorKind::MalformedPrice("abc".to_string()));
    }

    #[test]
    fn test_malformed_date() {
        let err = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\nA,1,01/10/2023\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, IngestionErrorKind::MalformedDate("01/10/2023".to_string()));
    }

    #[test]
    fn test_price_below_minimum() {
        let err = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\nA,0,2023-10-01\n").unwrap_err();
        assert_eq!(
            err.kind,
            IngestionErrorKind::InvalidPrice(ObservationError::PriceBelowMinimum(dec!(0)))
        );
    }

    #[test]
    fn test_short_row() {
        let err = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\nA,1\n").unwrap_err();
        assert_eq!(err.kind, IngestionErrorKind::MissingField(DATE_COLUMN));
    }

    #[test]
    fn test_empty_item_id() {
        let err = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\n ,1,2023-10-01\n").unwrap_err();
        assert_eq!(err.kind, IngestionErrorKind::EmptyItemId);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\n\"A,1,2023-10-01\n").unwrap_err();
        assert_eq!(err.kind, IngestionErrorKind::UnterminatedQuote);
    }

    #[test]
    fn test_unterminated_quote_names_record_start() {
        let err = parse(
            "ITEM_ID,PRICE,ORD_CLOSED_DT\n\
             A,1,2023-10-01\n\
             \"B,2,2023-10-02\n\
             C,3,2023-10-03\n",
        )
        .unwrap_err();
        assert_eq!(err, IngestionError::new(3, IngestionErrorKind::UnterminatedQuote));
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let table = "ITEM_ID,PRICE,ORD_CLOSED_DT\n\"MLA\n\n1\",5,2023-10-01\nB,x,2023-10-02\n";

        let err = parse(table).unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.kind, IngestionErrorKind::MalformedPrice("x".to_string()));

        let batch = parse("ITEM_ID,PRICE,ORD_CLOSED_DT\n\"MLA\r\n1\",5,2023-10-01\n").unwrap();
        assert_eq!(batch["MLA\n1"][0].price(), dec!(5));
    }
}
