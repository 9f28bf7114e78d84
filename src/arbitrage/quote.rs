//! Round-trip quote computation across two venues

use alloy::primitives::U256;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{ArbError, ArbResult, VenueError};
use crate::registry::ApprovalRegistry;
use crate::types::{AssetId, TradeQuote, VenueId};
use crate::venues::{VenueDirectory, resolve_venue};

/// Quotes both legs of a round trip without moving funds: base into
/// `asset` on venue A, the full token output back into base on venue B.
pub struct QuoteEngine {
    venues: Arc<VenueDirectory>,
    registry: Arc<RwLock<ApprovalRegistry>>,
}

impl QuoteEngine {
    pub fn new(venues: Arc<VenueDirectory>, registry: Arc<RwLock<ApprovalRegistry>>) -> Self {
        Self { venues, registry }
    }

    pub async fn compute_round_trip(
        &self,
        venue_a: VenueId,
        venue_b: VenueId,
        asset: AssetId,
        base_amount_in: U256,
    ) -> ArbResult<TradeQuote> {
        // Approval is re-checked here on every call; administration can
        // flip the registry at any moment.
        {
            let registry = self.registry.read().await;
            if !registry.is_venue_approved(venue_a) {
                return Err(ArbError::VenueUnapproved { venue: venue_a });
            }
            if !registry.is_venue_approved(venue_b) {
                return Err(ArbError::VenueUnapproved { venue: venue_b });
            }
            if !registry.is_asset_approved(asset) {
                return Err(ArbError::AssetUnapproved { asset });
            }
        }

        let first = resolve_venue(&self.venues, venue_a)?;
        let second = resolve_venue(&self.venues, venue_b)?;

        let base = first.native_asset();
        let amounts = first
            .quote(base_amount_in, &[base, asset])
            .await
            .map_err(|source| ArbError::QuoteUnavailable {
                venue: venue_a,
                source,
            })?;
        let token_out = final_amount(venue_a, &amounts)?;

        let amounts = second
            .quote(token_out, &[asset, second.native_asset()])
            .await
            .map_err(|source| ArbError::QuoteUnavailable {
                venue: venue_b,
                source,
            })?;
        let round_trip_out = final_amount(venue_b, &amounts)?;

        debug!(
            %asset,
            base_in = %base_amount_in,
            token_out = %token_out,
            round_trip_out = %round_trip_out,
            "Computed round-trip quote"
        );

        Ok(TradeQuote {
            venue_a,
            venue_b,
            asset,
            amount_in: base_amount_in,
            token_out,
            round_trip_out,
        })
    }
}

fn final_amount(venue: VenueId, amounts: &[U256]) -> ArbResult<U256> {
    amounts
        .last()
        .copied()
        .ok_or(ArbError::QuoteUnavailable {
            venue,
            source: VenueError::Connector {
                message: "venue returned no amounts".to_string(),
                source: None,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{USDC, VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, WETH};
    use crate::utils::math::WEI_PER_ETH;
    use crate::venues::FixedRateVenue;
    use std::collections::HashMap;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETH)
    }

    fn directory(venue_b: FixedRateVenue) -> Arc<VenueDirectory> {
        let venue_a = FixedRateVenue::new(VENUE_ALPHA_ROUTER, "alpha", WETH)
            .with_rates(USDC, (100, 1), (1, 100));
        let mut venues: VenueDirectory = HashMap::new();
        venues.insert(VENUE_ALPHA_ROUTER, Arc::new(venue_a));
        venues.insert(VENUE_BETA_ROUTER, Arc::new(venue_b));
        Arc::new(venues)
    }

    fn approving_registry() -> Arc<RwLock<ApprovalRegistry>> {
        let mut registry = ApprovalRegistry::new();
        registry.set_venue(VENUE_ALPHA_ROUTER, true);
        registry.set_venue(VENUE_BETA_ROUTER, true);
        registry.set_asset(USDC, true);
        Arc::new(RwLock::new(registry))
    }

    fn profitable_venue_b() -> FixedRateVenue {
        FixedRateVenue::new(VENUE_BETA_ROUTER, "beta", WETH)
            .with_rates(USDC, (100, 1), (102, 10_000))
    }

    #[tokio::test]
    async fn round_trip_chains_both_legs() {
        let engine = QuoteEngine::new(directory(profitable_venue_b()), approving_registry());
        let quote = engine
            .compute_round_trip(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, USDC, eth(1))
            .await
            .unwrap();

        assert_eq!(quote.amount_in, eth(1));
        assert_eq!(quote.token_out, eth(100));
        assert_eq!(quote.round_trip_out, U256::from(1_020_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn unapproved_venue_is_rejected_before_quoting() {
        let registry = approving_registry();
        registry.write().await.set_venue(VENUE_BETA_ROUTER, false);

        let engine = QuoteEngine::new(directory(profitable_venue_b()), registry);
        let err = engine
            .compute_round_trip(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, USDC, eth(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ArbError::VenueUnapproved { venue } if venue == VENUE_BETA_ROUTER
        ));
    }

    #[tokio::test]
    async fn unapproved_asset_is_rejected_before_quoting() {
        let registry = approving_registry();
        registry.write().await.set_asset(USDC, false);

        let engine = QuoteEngine::new(directory(profitable_venue_b()), registry);
        let err = engine
            .compute_round_trip(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, USDC, eth(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ArbError::AssetUnapproved { asset } if asset == USDC));
    }

    #[tokio::test]
    async fn venue_failure_surfaces_as_quote_unavailable() {
        let failing = FixedRateVenue::new(VENUE_BETA_ROUTER, "beta", WETH)
            .with_rates(USDC, (100, 1), (102, 10_000))
            .with_quote_failure();

        let engine = QuoteEngine::new(directory(failing), approving_registry());
        let err = engine
            .compute_round_trip(VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER, USDC, eth(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ArbError::QuoteUnavailable { venue, .. } if venue == VENUE_BETA_ROUTER
        ));
    }
}
