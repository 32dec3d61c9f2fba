// ============================================================================
// History Classifier
// Bulk partition of an ingested price history into outliers/non-outliers
// ============================================================================

use super::window::WindowSelector;
use super::window_judge::sma_band;
use crate::domain::{AlgorithmConfig, ClassifiedHistory, PriceSeries};
use crate::numeric::{MathContext, NumericResult};
use rust_decimal::Decimal;

/// Classifies every observation of a history against its neighbours.
///
/// Each price is compared with the centered window around it (itself
/// excluded). The window is IQR-cleaned, and the price is an outlier when it
/// falls outside `SMA ± k·stddev` of the cleaned window. Runs in
/// `O(n · window_size)`.
pub struct HistoryClassifier {
    selector: WindowSelector,
    k_factor: Decimal,
    ctx: MathContext,
}

impl HistoryClassifier {
    pub fn new(config: AlgorithmConfig) -> Self {
        Self {
            selector: WindowSelector::new(config.window_size),
            k_factor: config.k_factor,
            ctx: MathContext::default(),
        }
    }

    /// Partition `series` into outliers and non-outliers.
    ///
    /// - empty series: both sides empty
    /// - one observation: it is a non-outlier
    /// - otherwise each observation is judged against its centered window;
    ///   both sides keep timestamp order
    pub fn classify(
        &self,
        item_id: impl Into<String>,
        series: PriceSeries,
    ) -> NumericResult<ClassifiedHistory> {
        let mut history = ClassifiedHistory::empty(item_id);

        if series.len() <= 1 {
            history.non_outliers = series.into_vec();
            return Ok(history);
        }

        let flags = self.outlier_flags(&series.prices())?;

        for (observation, is_outlier) in series.into_vec().into_iter().zip(flags) {
            if is_outlier {
                history.outliers.push(observation);
            } else {
                history.non_outliers.push(observation);
            }
        }

        Ok(history)
    }

    /// Positions of the prices that fall outside their centered window's band.
    pub fn outlier_indices(&self, prices: &[Decimal]) -> NumericResult<Vec<usize>> {
        Ok(self
            .outlier_flags(prices)?
            .into_iter()
            .enumerate()
            .filter_map(|(index, flagged)| flagged.then_some(index))
            .collect())
    }

    fn outlier_flags(&self, prices: &[Decimal]) -> NumericResult<Vec<bool>> {
        prices
            .iter()
            .enumerate()
            .map(|(index, price)| -> NumericResult<bool> {
                let window = self.selector.centered(prices, index);
                let band = sma_band(&self.ctx, &window, self.k_factor)?;
                Ok(band.excludes(*price))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceObservation;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn series(prices: &[i64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                PriceObservation::new(start + Duration::days(i as i64), Decimal::from(*price))
                    .unwrap()
            })
            .collect()
    }

    fn classifier(window_size: usize) -> HistoryClassifier {
        HistoryClassifier::new(AlgorithmConfig::new(window_size, dec!(2)))
    }

    const REGRESSION_PRICES: [i64; 15] = [
        116, 116, 109, 200, 110, 115, 110, 1100, 115, 110, 115, 110, 116, 20, 130,
    ];

    #[test]
    fn test_regression_fixture_counts() {
        let history = classifier(10)
            .classify("test-product", series(&REGRESSION_PRICES))
            .unwrap();

        assert_eq!(history.item_id, "test-product");
        assert_eq!(history.non_outliers.len(), 11);
        assert_eq!(history.outliers.len(), 4);
    }

    #[test]
    fn test_regression_fixture_outliers() {
        let history = classifier(10)
            .classify("test-product", series(&REGRESSION_PRICES))
            .unwrap();

        let outliers: Vec<Decimal> = history.outliers.iter().map(|o| o.price()).collect();
        assert_eq!(outliers, vec![dec!(200), dec!(1100), dec!(20), dec!(130)]);
    }

    #[test]
    fn test_outlier_indices() {
        let prices: Vec<Decimal> = [100, 105, 110, 200].iter().map(|p| Decimal::from(*p)).collect();
        assert_eq!(classifier(10).outlier_indices(&prices).unwrap(), vec![3]);
    }

    #[test]
    fn test_empty_series() {
        let history = classifier(10).classify("empty", PriceSeries::new()).unwrap();
        assert!(history.outliers.is_empty());
        assert!(history.non_outliers.is_empty());
    }

    #[test]
    fn test_single_observation_is_non_outlier() {
        let history = classifier(10).classify("single", series(&[100])).unwrap();
        assert!(history.outliers.is_empty());
        assert_eq!(history.non_outliers.len(), 1);
        assert_eq!(history.non_outliers[0].price(), dec!(100));
    }

    #[test]
    fn test_partitions_follow_timestamp_order() {
        let start = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        let shuffled: PriceSeries = REGRESSION_PRICES
            .iter()
            .enumerate()
            .rev()
            .map(|(i, price)| {
                PriceObservation::new(start + Duration::days(i as i64), Decimal::from(*price))
                    .unwrap()
            })
            .collect();

        let history = classifier(10).classify("shuffled", shuffled).unwrap();
        let timestamps: Vec<_> = history.non_outliers.iter().map(|o| o.timestamp()).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
        assert_eq!(history.outliers.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_every_observation_lands_in_exactly_one_partition(
            raw in prop::collection::vec(1i64..10_000, 0..40),
            window_size in 1usize..12,
        ) {
            let source = series(&raw);
            let history = classifier(window_size).classify("prop", source.clone()).unwrap();

            prop_assert_eq!(history.total(), source.len());

            let mut remaining: Vec<PriceObservation> = source.into_vec();
            for observation in history.outliers.iter().chain(history.non_outliers.iter()) {
                let position = remaining.iter().position(|candidate| candidate == observation);
                prop_assert!(position.is_some());
                remaining.remove(position.unwrap());
            }
            prop_assert!(remaining.is_empty());
        }
    }
}
