//! Profitability evaluation for round-trip quotes

use alloy::primitives::U256;

use crate::config::MARGIN_SCALE;

/// Compare round-trip output to input against the margin threshold.
///
/// The margin is integer fixed-point in tenths of a percent: a round trip
/// is profitable when `profit * 1000 / base_in >= min_profit_margin_bps`.
/// Any round trip that returns no more than it consumed is unconditionally
/// unprofitable with profit reported as zero.
pub fn evaluate(base_in: U256, base_out: U256, min_profit_margin_bps: u64) -> (bool, U256) {
    if base_in.is_zero() || base_out <= base_in {
        return (false, U256::ZERO);
    }
    let profit = base_out - base_in;
    let margin = profit * U256::from(MARGIN_SCALE) / base_in;
    (margin >= U256::from(min_profit_margin_bps), profit)
}

/// Minimum profit an execution of `base_in` must realize to settle, in
/// base units: the margin threshold applied to the input amount.
pub fn required_profit(base_in: U256, min_profit_margin_bps: u64) -> U256 {
    base_in * U256::from(min_profit_margin_bps) / U256::from(MARGIN_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::WEI_PER_ETH;
    use proptest::prelude::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETH)
    }

    fn milli_eth(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETH / 1000)
    }

    #[test]
    fn two_percent_round_trip_clears_a_one_percent_margin() {
        // 1.0 in, 1.02 out at margin 10 (1%): ratio 20 >= 10
        let (profitable, profit) = evaluate(eth(1), milli_eth(1020), 10);
        assert!(profitable);
        assert_eq!(profit, milli_eth(20));
    }

    #[test]
    fn half_percent_round_trip_misses_a_one_percent_margin() {
        // 1.0 in, 1.005 out at margin 10: ratio 5 < 10
        let (profitable, profit) = evaluate(eth(1), milli_eth(1005), 10);
        assert!(!profitable);
        assert_eq!(profit, milli_eth(5));
    }

    #[test]
    fn margin_boundary_is_inclusive() {
        // exactly 1% profit at margin 10 passes
        let (profitable, profit) = evaluate(eth(1), milli_eth(1010), 10);
        assert!(profitable);
        assert_eq!(profit, milli_eth(10));
    }

    #[test]
    fn break_even_is_not_profitable() {
        let (profitable, profit) = evaluate(eth(1), eth(1), 10);
        assert!(!profitable);
        assert_eq!(profit, U256::ZERO);
    }

    #[test]
    fn losses_report_zero_profit() {
        let (profitable, profit) = evaluate(eth(2), eth(1), 10);
        assert!(!profitable);
        assert_eq!(profit, U256::ZERO);
    }

    #[test]
    fn zero_input_is_never_profitable() {
        let (profitable, profit) = evaluate(U256::ZERO, eth(1), 10);
        assert!(!profitable);
        assert_eq!(profit, U256::ZERO);
    }

    #[test]
    fn required_profit_applies_the_margin_to_the_input() {
        assert_eq!(required_profit(eth(1), 10), milli_eth(10));
        assert_eq!(required_profit(eth(100), 25), milli_eth(2500));
        assert_eq!(required_profit(U256::ZERO, 10), U256::ZERO);
    }

    proptest! {
        #[test]
        fn non_positive_round_trips_never_profit(base_in in any::<u128>(), cut in any::<u128>()) {
            let base_in = U256::from(base_in);
            let base_out = base_in.saturating_sub(U256::from(cut));
            let (profitable, profit) = evaluate(base_in, base_out, 10);
            prop_assert!(!profitable);
            prop_assert_eq!(profit, U256::ZERO);
        }

        #[test]
        fn profit_is_exactly_the_surplus(base_in in 1u128..u64::MAX as u128, surplus in 1u128..u64::MAX as u128) {
            let base_in = U256::from(base_in);
            let base_out = base_in + U256::from(surplus);
            let (_, profit) = evaluate(base_in, base_out, 10);
            prop_assert_eq!(profit, U256::from(surplus));
        }

        #[test]
        fn verdict_matches_the_fixed_point_ratio(
            base_in in 1u128..u64::MAX as u128,
            surplus in 1u128..u64::MAX as u128,
            margin in 1u64..=500u64,
        ) {
            let base_in = U256::from(base_in);
            let base_out = base_in + U256::from(surplus);
            let (profitable, profit) = evaluate(base_in, base_out, margin);
            let ratio = profit * U256::from(1000u64) / base_in;
            prop_assert_eq!(profitable, ratio >= U256::from(margin));
        }
    }
}
