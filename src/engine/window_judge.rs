// ============================================================================
// Moving-Window Judge (SMA ± k·stddev)
// Incremental check of one new price against the trailing window
// ============================================================================

use super::outlier_filter::remove_outliers;
use super::stats::{mean_in, population_std_dev_in};
use super::window::WindowSelector;
use crate::domain::{AlgorithmConfig, PriceObservation};
use crate::interfaces::{AcceptanceBand, AnomalyJudge, Judgment};
use crate::numeric::{MathContext, NumericResult};
use rust_decimal::Decimal;

/// SMA ± k·stddev band over an IQR-cleaned baseline.
///
/// Every step runs at the context precision:
/// `lower = sma − k·σ`, `upper = sma + k·σ`. An empty baseline gives the
/// degenerate band `[0, 0]`.
pub(crate) fn sma_band(
    ctx: &MathContext,
    baseline: &[Decimal],
    k_factor: Decimal,
) -> NumericResult<AcceptanceBand> {
    let cleaned = remove_outliers(baseline)?;
    let sma = mean_in(ctx, &cleaned)?;
    let std_dev = population_std_dev_in(ctx, &cleaned, sma)?;
    let spread = ctx.mul(k_factor, std_dev)?;

    Ok(AcceptanceBand::new(
        ctx.sub(sma, spread)?,
        ctx.add(sma, spread)?,
    ))
}

/// Judges a new price against the most recent accepted prices.
///
/// The history is ordered by timestamp, the trailing window is taken (the
/// newest accepted price is left out), outliers inside the window are
/// dropped, and the new price is anomalous when it falls outside
/// `SMA ± k·stddev` of what remains.
///
/// # Example
/// ```text
/// window_size = 3, k = 2
/// history:  100 105 110   -> window [100 105]
/// sma = 102.5, σ = 2.5     -> band [97.5, 107.5]
/// 150 -> anomaly, 106 -> normal
/// ```
pub struct WindowJudge {
    selector: WindowSelector,
    k_factor: Decimal,
    ctx: MathContext,
}

impl WindowJudge {
    pub fn new(config: AlgorithmConfig) -> Self {
        Self {
            selector: WindowSelector::new(config.window_size),
            k_factor: config.k_factor,
            ctx: MathContext::default(),
        }
    }

    /// Whether `new_price` is anomalous relative to `history`.
    pub fn is_anomaly(
        &self,
        history: &[PriceObservation],
        new_price: Decimal,
    ) -> NumericResult<bool> {
        Ok(self.judge(history, new_price)?.anomaly)
    }

    fn chronological_prices(history: &[PriceObservation]) -> Vec<Decimal> {
        let mut ordered: Vec<&PriceObservation> = history.iter().collect();
        ordered.sort_by_key(|obs| obs.timestamp());
        ordered.into_iter().map(|obs| obs.price()).collect()
    }
}

impl AnomalyJudge for WindowJudge {
    fn judge(&self, history: &[PriceObservation], price: Decimal) -> NumericResult<Judgment> {
        if history.is_empty() {
            return Ok(Judgment::NO_BASIS);
        }

        let prices = Self::chronological_prices(history);
        let window = self.selector.trailing(&prices);
        let band = sma_band(&self.ctx, window, self.k_factor)?;

        Ok(Judgment::against(band, price))
    }

    fn name(&self) -> &str {
        "MovingWindow"
    }
}
