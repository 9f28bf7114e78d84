//! Trade settlement types

use alloy::primitives::U256;

use super::assets::AssetId;
use super::quote::TradeQuote;

/// Settlement summary of a completed round trip, emitted once per
/// successful execution.
#[derive(Debug, Clone)]
pub struct TradeResult {
    pub asset: AssetId,
    pub base_in: U256,
    pub base_out: U256,
    pub profit: U256,
}

/// What an arbitrage attempt produced for the caller.
#[derive(Debug, Clone)]
pub enum TradeOutcome {
    /// Both legs executed and settled; `payout` is the entire resulting
    /// base balance transferred back to the caller.
    Executed {
        result: TradeResult,
        payout: U256,
    },
    /// The round trip was not profitable; the caller's deposit is
    /// returned unchanged and no swaps were attempted.
    Declined {
        quote: TradeQuote,
        refund: U256,
    },
}
