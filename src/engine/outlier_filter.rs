// ============================================================================
// Outlier Filter
// IQR pre-cleaning of a price window before SMA/stddev
// ============================================================================

use super::stats::{IqrBounds, QuartileMethod};
use crate::numeric::NumericResult;
use rust_decimal::Decimal;

/// Drop values outside the Tukey fences of the input itself.
///
/// The fences come from a sorted copy using the linear (`p·(n−1)`) quartile;
/// the survivors keep their original order. Empty input gives empty output.
///
/// This only cleans a baseline. Whether a price is anomalous is always
/// decided by a judge, never by this filter alone.
pub fn remove_outliers(values: &[Decimal]) -> NumericResult<Vec<Decimal>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let bounds = IqrBounds::from_unsorted(values, QuartileMethod::Linear)?;

    Ok(values
        .iter()
        .copied()
        .filter(|value| bounds.contains(*value))
        .collect())
}
