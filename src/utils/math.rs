//! Unit conversions between wei-denominated amounts and display decimals

use alloy::primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Convert a wei amount to whole units for display and reporting.
/// Saturates on amounts too large to represent exactly.
pub fn wei_to_eth(amount: U256) -> Decimal {
    let wei_per_eth = U256::from(WEI_PER_ETH);
    let whole = u128::try_from(amount / wei_per_eth).unwrap_or(u128::MAX);
    let frac = u64::try_from(amount % wei_per_eth).unwrap_or(0);
    let whole = Decimal::from_u128(whole).unwrap_or(Decimal::MAX);
    whole + Decimal::from(frac) / dec!(1_000_000_000_000_000_000)
}

/// Convert a whole-unit decimal amount to wei, truncating below 1 wei.
/// Negative amounts convert to zero.
pub fn eth_to_wei(amount: Decimal) -> U256 {
    let wei = (amount * dec!(1_000_000_000_000_000_000)).trunc();
    U256::from(wei.to_u128().unwrap_or(0))
}
