// ============================================================================
// Quartile Judge (Tukey fences)
// Simpler alternative judge: no window, no pre-filtering
// ============================================================================

use super::stats::{IqrBounds, QuartileMethod};
use crate::domain::PriceObservation;
use crate::interfaces::{AcceptanceBand, AnomalyJudge, Judgment};
use crate::numeric::NumericResult;
use rust_decimal::Decimal;

/// Judges a new price against `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]` of the whole
/// accepted history.
///
/// Does not read the window size or k-factor. Quartiles default to the
/// clamped `p·(n+1)` rule this judge has always used; the linear rule can be
/// selected with [`IqrJudge::with_method`].
#[derive(Debug, Clone, Copy)]
pub struct IqrJudge {
    method: QuartileMethod,
}

impl IqrJudge {
    pub fn new() -> Self {
        Self::with_method(QuartileMethod::Exclusive)
    }

    pub fn with_method(method: QuartileMethod) -> Self {
        Self { method }
    }

    #[inline]
    pub fn method(&self) -> QuartileMethod {
        self.method
    }

    /// Whether `new_price` lies outside the fences of `non_outliers`.
    ///
    /// An empty set is never anomalous.
    pub fn is_anomaly(&self, non_outliers: &[Decimal], new_price: Decimal) -> NumericResult<bool> {
        Ok(self.judge_prices(non_outliers, new_price)?.anomaly)
    }

    fn judge_prices(&self, non_outliers: &[Decimal], price: Decimal) -> NumericResult<Judgment> {
        if non_outliers.is_empty() {
            return Ok(Judgment::NO_BASIS);
        }

        let bounds = IqrBounds::from_unsorted(non_outliers, self.method)?;
        Ok(Judgment::against(
            AcceptanceBand::new(bounds.lower, bounds.upper),
            price,
        ))
    }
}

impl Default for IqrJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyJudge for IqrJudge {
    fn judge(&self, history: &[PriceObservation], price: Decimal) -> NumericResult<Judgment> {
        let prices: Vec<Decimal> = history.iter().map(|obs| obs.price()).collect();
        self.judge_prices(&prices, price)
    }

    fn name(&self) -> &str {
        "Quartile"
    }
}
