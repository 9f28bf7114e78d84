//! Round-trip quote types

use alloy::primitives::U256;

use super::assets::{AssetId, VenueId};

/// Result of quoting both legs of a round trip. Ephemeral: produced by the
/// quote engine, consumed by the profitability check, never persisted.
#[derive(Debug, Clone)]
pub struct TradeQuote {
    pub venue_a: VenueId,
    pub venue_b: VenueId,
    pub asset: AssetId,
    /// Base amount the quote was computed for.
    pub amount_in: U256,
    /// Token amount venue A quoted for `amount_in`.
    pub token_out: U256,
    /// Base amount venue B quoted for `token_out`.
    pub round_trip_out: U256,
}
