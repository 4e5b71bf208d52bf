//! Rounding helpers shared by the formula steps.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Rounds half up to the nearest whole number.
///
/// All formula inputs are non-negative, where midpoint-away-from-zero and
/// half-up agree.
///
/// # Examples
///
/// ```
/// use wellbeing_audit::calculation::round_half_up;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_half_up(Decimal::from_str("56.5").unwrap()), Decimal::from(57));
/// assert_eq!(round_half_up(Decimal::from_str("14.112").unwrap()), Decimal::from(14));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds half up and converts to a count.
pub(crate) fn round_to_count(value: Decimal, what: &str) -> EngineResult<u32> {
    round_half_up(value)
        .to_u32()
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} out of range: {}", what, value.normalize()),
        })
}
