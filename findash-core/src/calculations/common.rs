//! Shared helpers for money arithmetic.

use rust_decimal::Decimal;

/// Rounds a value to two decimal places, half up (away from zero at the
/// midpoint), the standard convention for currency amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use findash_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(12500.004)), dec!(12500.00));
/// assert_eq!(round_half_up(dec!(12500.005)), dec!(12500.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(99.994)), dec!(99.99));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(99.995)), dec!(100.00));
    }

    #[test]
    fn round_half_up_moves_away_from_zero_for_negatives() {
        assert_eq!(round_half_up(dec!(-99.995)), dec!(-100.00));
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(0), dec!(250000)), dec!(250000));
        assert_eq!(max(dec!(-1), dec!(0)), dec!(0));
    }
}
