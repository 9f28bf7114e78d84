//! Runtime-tunable arbitrage parameters

use alloy::primitives::U256;

/// Shared configuration read by the profitability evaluator and the
/// execution guard. Mutated only through the administration surface.
#[derive(Debug, Clone, Copy)]
pub struct ArbitrageParameters {
    /// Minimum acceptable profit margin, in tenths of a percent of the
    /// base amount in (scale 1000).
    pub min_profit_margin_bps: u64,
    /// Floor the base balance must strictly exceed before an attempt is
    /// admitted, in base units.
    pub min_base_balance: U256,
}
