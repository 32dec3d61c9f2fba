// ============================================================================
// Decimal Statistics
// Quartiles, IQR bounds, mean and population standard deviation
// ============================================================================

use crate::numeric::{sqrt, MathContext, NumericError, NumericResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Tukey fence multiplier applied to the IQR (1.5)
pub const IQR_FENCE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

// ============================================================================
// Quartiles
// ============================================================================

/// Percentile interpolation rule.
///
/// Both rules interpolate linearly between neighbours; they differ in where
/// percentile `p` lands on a sorted sequence of length `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuartileMethod {
    /// 0-based position `p·(n−1)`. `p = 0` is the minimum, `p = 1` the
    /// maximum. Used by the outlier filter and the moving-window paths.
    #[default]
    Linear,

    /// 1-based position `p·(n+1)`, clamped to `[1, n]`. Used by the
    /// quartile judge.
    Exclusive,
}

/// Percentile of a sorted slice using the [`QuartileMethod::Linear`] rule.
///
/// Returns zero for an empty slice.
///
/// # Example
/// ```
/// use price_anomaly::engine::stats::quartile;
/// use rust_decimal::Decimal;
///
/// let sorted: Vec<Decimal> = (1..=8).map(Decimal::from).collect();
/// assert_eq!(quartile(&sorted, Decimal::new(25, 2)).unwrap(), Decimal::new(275, 2));
/// ```
pub fn quartile(sorted: &[Decimal], percentile: Decimal) -> NumericResult<Decimal> {
    quartile_with(sorted, percentile, QuartileMethod::Linear)
}

/// Percentile of a sorted slice using an explicit rule.
///
/// `percentile` is clamped to `[0, 1]`. Returns zero for an empty slice.
pub fn quartile_with(
    sorted: &[Decimal],
    percentile: Decimal,
    method: QuartileMethod,
) -> NumericResult<Decimal> {
    let n = sorted.len();
    if n == 0 {
        return Ok(Decimal::ZERO);
    }
    if n == 1 {
        return Ok(sorted[0]);
    }

    let percentile = percentile.clamp(Decimal::ZERO, Decimal::ONE);

    match method {
        QuartileMethod::Linear => {
            let index = percentile
                .checked_mul(Decimal::from(n - 1))
                .ok_or(NumericError::Overflow)?;
            let lower = to_index(index.floor())?;
            let fraction = index - index.floor();
            if fraction.is_zero() {
                return Ok(sorted[lower]);
            }
            interpolate(sorted[lower], sorted[lower + 1], fraction)
        },
        QuartileMethod::Exclusive => {
            let position = percentile
                .checked_mul(Decimal::from(n + 1))
                .ok_or(NumericError::Overflow)?;
            if position < Decimal::ONE {
                return Ok(sorted[0]);
            }
            if position >= Decimal::from(n) {
                return Ok(sorted[n - 1]);
            }
            let whole = to_index(position.floor())?;
            let fraction = position - position.floor();
            interpolate(sorted[whole - 1], sorted[whole], fraction)
        },
    }
}

fn to_index(value: Decimal) -> NumericResult<usize> {
    value.to_usize().ok_or(NumericError::InvalidInput)
}

fn interpolate(lower: Decimal, upper: Decimal, fraction: Decimal) -> NumericResult<Decimal> {
    upper
        .checked_sub(lower)
        .and_then(|span| span.checked_mul(fraction))
        .and_then(|offset| lower.checked_add(offset))
        .ok_or(NumericError::Overflow)
}

// ============================================================================
// IQR Bounds
// ============================================================================

/// Tukey fences: `[Q1 − 1.5·IQR, Q3 + 1.5·IQR]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqrBounds {
    pub q1: Decimal,
    pub q3: Decimal,
    pub iqr: Decimal,
    pub lower: Decimal,
    pub upper: Decimal,
}

impl IqrBounds {
    /// Compute the fences over an already-sorted slice.
    ///
    /// Arithmetic is exact (no context rounding). An empty slice yields
    /// all-zero bounds.
    pub fn from_sorted(sorted: &[Decimal], method: QuartileMethod) -> NumericResult<Self> {
        let q1 = quartile_with(sorted, Decimal::new(25, 2), method)?;
        let q3 = quartile_with(sorted, Decimal::new(75, 2), method)?;
        let iqr = q3.checked_sub(q1).ok_or(NumericError::Overflow)?;
        let fence = iqr.checked_mul(IQR_FENCE).ok_or(NumericError::Overflow)?;

        Ok(Self {
            q1,
            q3,
            iqr,
            lower: q1.checked_sub(fence).ok_or(NumericError::Overflow)?,
            upper: q3.checked_add(fence).ok_or(NumericError::Overflow)?,
        })
    }

    /// Sort a copy of `values` and compute the fences.
    pub fn from_unsorted(values: &[Decimal], method: QuartileMethod) -> NumericResult<Self> {
        let mut sorted = values.to_vec();
        sorted.sort();
        Self::from_sorted(&sorted, method)
    }

    /// Inclusive containment check
    #[inline]
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.lower && value <= self.upper
    }
}

// ============================================================================
// Mean and Standard Deviation
// ============================================================================

/// Arithmetic mean at 10 significant digits, round-half-up.
///
/// Returns zero for an empty slice.
pub fn mean(values: &[Decimal]) -> NumericResult<Decimal> {
    mean_in(&MathContext::default(), values)
}

/// Arithmetic mean rounded by `ctx`.
pub fn mean_in(ctx: &MathContext, values: &[Decimal]) -> NumericResult<Decimal> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or(NumericError::Overflow)?;

    ctx.div(sum, Decimal::from(values.len()))
}

/// Population standard deviation around a supplied mean.
///
/// Squared deviations are summed and divided by `n` (not `n − 1`), each step
/// at 10 significant digits; the root itself goes through [`sqrt`].
/// Returns zero for an empty slice.
pub fn population_std_dev(values: &[Decimal], mean: Decimal) -> NumericResult<Decimal> {
    population_std_dev_in(&MathContext::default(), values, mean)
}

/// Population standard deviation with every step rounded by `ctx`.
pub fn population_std_dev_in(
    ctx: &MathContext,
    values: &[Decimal],
    mean: Decimal,
) -> NumericResult<Decimal> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let mut sum_of_squares = Decimal::ZERO;
    for value in values {
        let deviation = ctx.sub(*value, mean)?;
        sum_of_squares = ctx.add(sum_of_squares, ctx.square(deviation)?)?;
    }

    let variance = ctx.div(sum_of_squares, Decimal::from(values.len()))?;
    sqrt(variance)
}
