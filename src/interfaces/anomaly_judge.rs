// ============================================================================
// Anomaly Judge Interface
// Defines the contract for pluggable single-price anomaly judges
// ============================================================================

use crate::domain::PriceObservation;
use crate::numeric::NumericResult;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed interval of prices considered normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptanceBand {
    pub lower: Decimal,
    pub upper: Decimal,
}

impl AcceptanceBand {
    pub fn new(lower: Decimal, upper: Decimal) -> Self {
        Self { lower, upper }
    }

    /// True when `price` falls strictly outside the band
    #[inline]
    pub fn excludes(&self, price: Decimal) -> bool {
        price < self.lower || price > self.upper
    }
}

/// Outcome of judging one price.
///
/// `band` is `None` when the history gave no basis for comparison; such a
/// price is never anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Judgment {
    pub anomaly: bool,
    pub band: Option<AcceptanceBand>,
}

impl Judgment {
    /// No history to compare against
    pub const NO_BASIS: Self = Self {
        anomaly: false,
        band: None,
    };

    /// Judge `price` against `band`.
    pub fn against(band: AcceptanceBand, price: Decimal) -> Self {
        Self {
            anomaly: band.excludes(price),
            band: Some(band),
        }
    }

    #[inline]
    pub fn is_anomaly(&self) -> bool {
        self.anomaly
    }
}

/// Strategy pattern interface for single-price judges
/// Implementations: WindowJudge (SMA ± k·stddev), IqrJudge (Tukey fences)
pub trait AnomalyJudge: Send + Sync {
    /// Judge a new price against an item's accepted history.
    ///
    /// # Arguments
    /// * `history` - Non-outlier observations of the item
    /// * `price` - The newly observed price
    fn judge(&self, history: &[PriceObservation], price: Decimal) -> NumericResult<Judgment>;

    /// Get the judge name for logging/metrics
    fn name(&self) -> &str;
}
