// ============================================================================
// Price Observation Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest price accepted anywhere in the system (0.01)
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

// ============================================================================
// Validation
// ============================================================================

/// Rejection reasons for an observation that cannot enter a price history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    /// Price is below [`MIN_PRICE`]
    PriceBelowMinimum(Decimal),
}

impl fmt::Display for ObservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationError::PriceBelowMinimum(price) => {
                write!(f, "price {} is below the minimum of {}", price, MIN_PRICE)
            },
        }
    }
}

impl std::error::Error for ObservationError {}

/// Check a raw price against [`MIN_PRICE`].
pub fn validate_price(price: Decimal) -> Result<Decimal, ObservationError> {
    if price < MIN_PRICE {
        return Err(ObservationError::PriceBelowMinimum(price));
    }
    Ok(price)
}

// ============================================================================
// Price Observation
// ============================================================================

/// A single dated price. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceObservation {
    timestamp: DateTime<Utc>,
    price: Decimal,
}

impl PriceObservation {
    /// Create a validated observation.
    ///
    /// # Errors
    /// Returns `PriceBelowMinimum` for prices under 0.01.
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Result<Self, ObservationError> {
        Ok(Self {
            timestamp,
            price: validate_price(price)?,
        })
    }

    /// Observation stamped with the current time.
    pub fn now(price: Decimal) -> Result<Self, ObservationError> {
        Self::new(Utc::now(), price)
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn price(&self) -> Decimal {
        self.price
    }
}

// ============================================================================
// Price Series
// ============================================================================

/// Observations ordered ascending by timestamp.
///
/// Equal timestamps keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from observations in any order (stable sort).
    pub fn from_unsorted(mut observations: Vec<PriceObservation>) -> Self {
        observations.sort_by_key(|obs| obs.timestamp);
        Self { observations }
    }

    /// Insert an observation after every existing observation with a
    /// timestamp less than or equal to its own.
    pub fn push(&mut self, observation: PriceObservation) {
        let position = self
            .observations
            .partition_point(|existing| existing.timestamp <= observation.timestamp);
        self.observations.insert(position, observation);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.observations.iter()
    }

    /// Prices in timestamp order.
    pub fn prices(&self) -> Vec<Decimal> {
        self.observations.iter().map(|obs| obs.price).collect()
    }

    pub fn into_vec(self) -> Vec<PriceObservation> {
        self.observations
    }
}

impl From<Vec<PriceObservation>> for PriceSeries {
    fn from(observations: Vec<PriceObservation>) -> Self {
        Self::from_unsorted(observations)
    }
}

impl FromIterator<PriceObservation> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceObservation;
    type IntoIter = std::slice::Iter<'a, PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_min_price_constant() {
        assert_eq!(MIN_PRICE, dec!(0.01));
    }

    #[test]
    fn test_observation_validation() {
        assert!(PriceObservation::new(at(1), dec!(0.01)).is_ok());
        assert_eq!(
            PriceObservation::new(at(1), dec!(0.009)),
            Err(ObservationError::PriceBelowMinimum(dec!(0.009)))
        );
        assert!(PriceObservation::new(at(1), Decimal::ZERO).is_err());
        assert!(PriceObservation::new(at(1), dec!(-5)).is_err());
    }

    #[test]
    fn test_series_sorts_by_timestamp() {
        let series = PriceSeries::from_unsorted(vec![
            PriceObservation::new(at(3), dec!(30)).unwrap(),
            PriceObservation::new(at(1), dec!(10)).unwrap(),
            PriceObservation::new(at(2), dec!(20)).unwrap(),
        ]);
        assert_eq!(series.prices(), vec![dec!(10), dec!(20), dec!(30)]);
    }

    #[test]
    fn test_series_keeps_tie_order() {
        let series = PriceSeries::from_unsorted(vec![
            PriceObservation::new(at(2), dec!(1)).unwrap(),
            PriceObservation::new(at(1), dec!(2)).unwrap(),
            PriceObservation::new(at(2), dec!(3)).unwrap(),
            PriceObservation::new(at(2), dec!(4)).unwrap(),
        ]);
        assert_eq!(series.prices(), vec![dec!(2), dec!(1), dec!(3), dec!(4)]);
    }

    #[test]
    fn test_push_after_ties() {
        let mut series = PriceSeries::new();
        series.push(PriceObservation::new(at(2), dec!(1)).unwrap());
        series.push(PriceObservation::new(at(1), dec!(2)).unwrap());
        series.push(PriceObservation::new(at(2), dec!(3)).unwrap());
        assert_eq!(series.prices(), vec![dec!(2), dec!(1), dec!(3)]);
        assert_eq!(series.len(), 3);
    }
}
