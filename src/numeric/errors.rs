// ============================================================================
// Numeric Errors
// ============================================================================

use std::fmt;

/// Why a statistic could not be computed.
///
/// Well-formed prices never produce one; they mean the arithmetic left the
/// range `rust_decimal` can represent, or the `f64` square root step had
/// nothing sensible to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    Overflow,
    DivisionByZero,
    /// Rounding to the context precision failed
    PrecisionLoss,
    NegativeRoot,
    /// The value did not survive the trip through `f64`
    InvalidInput,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumericError::Overflow => "decimal overflow",
            NumericError::DivisionByZero => "division by zero",
            NumericError::PrecisionLoss => "cannot round to context precision",
            NumericError::NegativeRoot => "square root of a negative number",
            NumericError::InvalidInput => "value is not representable as a finite f64",
        })
    }
}

impl std::error::Error for NumericError {}

pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{sqrt, MathContext};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raised_by_context_operations() {
        let ctx = MathContext::default();
        let err = ctx.div(dec!(1), Decimal::ZERO).unwrap_err();
        assert_eq!(err, NumericError::DivisionByZero);
        assert_eq!(err.to_string(), "division by zero");

        assert_eq!(ctx.mul(Decimal::MAX, dec!(2)), Err(NumericError::Overflow));
    }

    #[test]
    fn test_negative_root() {
        let err = sqrt(dec!(-4)).unwrap_err();
        assert_eq!(err, NumericError::NegativeRoot);
        assert_eq!(err.to_string(), "square root of a negative number");
    }
}
