// ============================================================================
// Math Context
// Significant-digit precision and rounding for decimal statistics
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Precision context applied after every arithmetic step.
///
/// Each operation computes the exact (or 28-digit) result and then rounds it
/// to `precision` significant digits, midpoints rounded away from zero
/// (round-half-up).
///
/// # Example
/// ```
/// use price_anomaly::numeric::MathContext;
/// use rust_decimal::Decimal;
///
/// let ctx = MathContext::default();
/// let third = ctx.div(Decimal::ONE, Decimal::from(3)).unwrap();
/// assert_eq!(third.to_string(), "0.3333333333");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MathContext {
    precision: u32,
}

impl MathContext {
    /// Significant digits used by every statistic unless told otherwise
    pub const DEFAULT_PRECISION: u32 = 10;

    /// Create a context with the given number of significant digits (1-28).
    pub const fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Number of significant digits kept by this context.
    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Round to the context precision, half-up.
    ///
    /// # Errors
    /// Returns `PrecisionLoss` if the precision is outside 1-28.
    #[inline]
    pub fn round(&self, value: Decimal) -> NumericResult<Decimal> {
        if value.is_zero() {
            return Ok(Decimal::ZERO);
        }
        value
            .round_sf_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero)
            .ok_or(NumericError::PrecisionLoss)
    }

    #[inline]
    pub fn add(&self, lhs: Decimal, rhs: Decimal) -> NumericResult<Decimal> {
        self.round(lhs.checked_add(rhs).ok_or(NumericError::Overflow)?)
    }

    #[inline]
    pub fn sub(&self, lhs: Decimal, rhs: Decimal) -> NumericResult<Decimal> {
        self.round(lhs.checked_sub(rhs).ok_or(NumericError::Overflow)?)
    }

    #[inline]
    pub fn mul(&self, lhs: Decimal, rhs: Decimal) -> NumericResult<Decimal> {
        self.round(lhs.checked_mul(rhs).ok_or(NumericError::Overflow)?)
    }

    /// Checked division rounded to the context precision.
    ///
    /// # Errors
    /// Returns `DivisionByZero` when `rhs` is zero.
    #[inline]
    pub fn div(&self, lhs: Decimal, rhs: Decimal) -> NumericResult<Decimal> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        self.round(lhs.checked_div(rhs).ok_or(NumericError::Overflow)?)
    }

    #[inline]
    pub fn square(&self, value: Decimal) -> NumericResult<Decimal> {
        self.mul(value, value)
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PRECISION)
    }
}

// ============================================================================
// Square Root
// ============================================================================

/// Square root taken in `f64` and converted back to `Decimal`.
///
/// This is the only step of the statistics pipeline that is not decimal-exact:
/// the input is narrowed to a double, rooted, and the shortest decimal that
/// round-trips the double is returned. Perfect squares come back exact
/// (`25 -> 5`); everything else carries ordinary double rounding.
///
/// # Errors
/// - `NegativeRoot` for values below zero
/// - `InvalidInput` if the value cannot cross the float boundary
pub fn sqrt(value: Decimal) -> NumericResult<Decimal> {
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if value.is_sign_negative() {
        return Err(NumericError::NegativeRoot);
    }

    let root = value.to_f64().ok_or(NumericError::InvalidInput)?.sqrt();
    if !root.is_finite() {
        return Err(NumericError::InvalidInput);
    }

    Decimal::from_f64(root).ok_or(NumericError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_precision() {
        assert_eq!(MathContext::default().precision(), 10);
    }

    #[test]
    fn test_round_half_up() {
        let ctx = MathContext::new(3);
        assert_eq!(ctx.round(dec!(1.245)).unwrap(), dec!(1.25));
        assert_eq!(ctx.round(dec!(-1.245)).unwrap(), dec!(-1.25));
        assert_eq!(ctx.round(dec!(1.244)).unwrap(), dec!(1.24));
    }

    #[test]
    fn test_round_keeps_short_values() {
        let ctx = MathContext::default();
        assert_eq!(ctx.round(dec!(102.5)).unwrap(), dec!(102.5));
        assert_eq!(ctx.round(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_division_rounds_to_ten_digits() {
        let ctx = MathContext::default();
        let mean = ctx.div(dec!(5), dec!(3)).unwrap();
        assert_eq!(mean, dec!(1.666666667));
    }

    #[test]
    fn test_division_by_zero() {
        let ctx = MathContext::default();
        assert_eq!(
            ctx.div(dec!(1), Decimal::ZERO),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let ctx = MathContext::default();
        assert_eq!(
            ctx.mul(Decimal::MAX, dec!(2)),
            Err(NumericError::Overflow)
        );
    }

    #[test]
    fn test_sqrt_perfect_square() {
        assert_eq!(sqrt(dec!(25)).unwrap(), dec!(5));
        assert_eq!(sqrt(dec!(6.25)).unwrap(), dec!(2.5));
        assert_eq!(sqrt(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_sqrt_irrational_within_double_precision() {
        let root = sqrt(dec!(2)).unwrap();
        let error = (root - dec!(1.4142135623730951)).abs();
        assert!(error < dec!(0.000000000000001));
    }

    #[test]
    fn test_sqrt_negative() {
        assert_eq!(sqrt(dec!(-4)), Err(NumericError::NegativeRoot));
    }
}
