//! In-process constant-product AMM venue

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::{BPS_DENOMINATOR, MAX_AMM_FEE_BPS};
use crate::errors::{VenueError, VenueResult};
use crate::types::{AssetId, VenueId};

use super::{SwapDirection, SwapReceipt, SwapRequest, Venue, resolve_direction};

/// Reserves of one base/token pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolReserves {
    pub base: U256,
    pub token: U256,
}

/// x*y=k venue with a flat fee in basis points, one pool per listed token.
/// Swaps mutate reserves under a write lock; quotes never do.
pub struct ConstantProductVenue {
    id: VenueId,
    name: String,
    base_asset: AssetId,
    fee_bps: u32,
    pools: RwLock<HashMap<AssetId, PoolReserves>>,
}

impl ConstantProductVenue {
    pub fn new(id: VenueId, name: impl Into<String>, base_asset: AssetId, fee_bps: u32) -> Self {
        Self {
            id,
            name: name.into(),
            base_asset,
            fee_bps: fee_bps.min(MAX_AMM_FEE_BPS),
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_pool(mut self, asset: AssetId, base_reserve: U256, token_reserve: U256) -> Self {
        self.pools.get_mut().insert(
            asset,
            PoolReserves {
                base: base_reserve,
                token: token_reserve,
            },
        );
        self
    }

    /// Current reserves of the pool for `asset`, if listed.
    pub async fn reserves(&self, asset: AssetId) -> Option<PoolReserves> {
        self.pools.read().await.get(&asset).copied()
    }

    /// Nudge every pool's token reserve by a random amount of at most
    /// `max_bps`, simulating background market movement between attempts.
    pub async fn apply_drift(&self, max_bps: u32) {
        if max_bps == 0 {
            return;
        }
        let mut pools = self.pools.write().await;
        for reserves in pools.values_mut() {
            let delta_bps = (rand::random::<f64>() * max_bps as f64) as u64;
            let adjustment = reserves.token * U256::from(delta_bps) / U256::from(BPS_DENOMINATOR);
            if rand::random::<bool>() {
                reserves.token += adjustment;
            } else {
                reserves.token = reserves.token.saturating_sub(adjustment);
            }
        }
    }

    async fn execute_swap(
        &self,
        request: SwapRequest,
        expected: SwapDirection,
    ) -> VenueResult<SwapReceipt> {
        let now = Utc::now();
        if now > request.deadline {
            return Err(VenueError::DeadlineExceeded {
                deadline: request.deadline,
                now,
            });
        }
        let (asset, direction) = resolve_direction(self.base_asset, &request.path)?;
        if direction != expected {
            return Err(VenueError::Connector {
                message: format!("swap entry point expects a {expected:?} path"),
                source: None,
            });
        }

        let mut pools = self.pools.write().await;
        let reserves = pools.get_mut(&asset).ok_or(VenueError::UnknownPair {
            asset_in: request.path[0],
            asset_out: request.path[1],
        })?;
        let (reserve_in, reserve_out) = match direction {
            SwapDirection::BaseToToken => (reserves.base, reserves.token),
            SwapDirection::TokenToBase => (reserves.token, reserves.base),
        };
        let amount_out =
            constant_product_out(request.amount_in, reserve_in, reserve_out, self.fee_bps)?;
        if amount_out < request.min_amount_out {
            return Err(VenueError::OutputBelowFloor {
                floor: request.min_amount_out,
                actual: amount_out,
            });
        }
        match direction {
            SwapDirection::BaseToToken => {
                reserves.base += request.amount_in;
                reserves.token -= amount_out;
            }
            SwapDirection::TokenToBase => {
                reserves.token += request.amount_in;
                reserves.base -= amount_out;
            }
        }

        debug!(
            venue = %self.name,
            ?direction,
            amount_in = %request.amount_in,
            amount_out = %amount_out,
            "Executed swap"
        );

        Ok(SwapReceipt {
            venue: self.id,
            asset,
            direction,
            amount_in: request.amount_in,
            amount_out,
        })
    }
}

#[async_trait]
impl Venue for ConstantProductVenue {
    fn id(&self) -> VenueId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn native_asset(&self) -> AssetId {
        self.base_asset
    }

    async fn quote(&self, amount_in: U256, path: &[AssetId]) -> VenueResult<Vec<U256>> {
        let (asset, direction) = resolve_direction(self.base_asset, path)?;
        let pools = self.pools.read().await;
        let reserves = pools.get(&asset).ok_or(VenueError::UnknownPair {
            asset_in: path[0],
            asset_out: path[1],
        })?;
        let (reserve_in, reserve_out) = match direction {
            SwapDirection::BaseToToken => (reserves.base, reserves.token),
            SwapDirection::TokenToBase => (reserves.token, reserves.base),
        };
        let amount_out = constant_product_out(amount_in, reserve_in, reserve_out, self.fee_bps)?;
        Ok(vec![amount_in, amount_out])
    }

    async fn swap_base_for_token(&self, request: SwapRequest) -> VenueResult<SwapReceipt> {
        self.execute_swap(request, SwapDirection::BaseToToken).await
    }

    async fn swap_token_for_base(&self, request: SwapRequest) -> VenueResult<SwapReceipt> {
        self.execute_swap(request, SwapDirection::TokenToBase).await
    }

    async fn unwind(&self, receipt: &SwapReceipt) {
        let mut pools = self.pools.write().await;
        if let Some(reserves) = pools.get_mut(&receipt.asset) {
            match receipt.direction {
                SwapDirection::BaseToToken => {
                    reserves.base = reserves.base.saturating_sub(receipt.amount_in);
                    reserves.token += receipt.amount_out;
                }
                SwapDirection::TokenToBase => {
                    reserves.token = reserves.token.saturating_sub(receipt.amount_in);
                    reserves.base += receipt.amount_out;
                }
            }
            debug!(venue = %self.name, amount_in = %receipt.amount_in, "Unwound swap");
        }
    }
}

/// Output of a constant-product swap after the flat fee, `x*y=k` style:
/// `out = in_after_fee * reserve_out / (reserve_in + in_after_fee)`.
pub fn constant_product_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_bps: u32,
) -> VenueResult<U256> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(VenueError::InsufficientLiquidity {
            amount_in,
            details: "pool has empty reserves".to_string(),
        });
    }
    let fee_numerator = U256::from(BPS_DENOMINATOR - fee_bps as u64);
    let fee_denominator = U256::from(BPS_DENOMINATOR);
    let in_with_fee = amount_in * fee_numerator;
    let numerator = in_with_fee * reserve_out;
    let denominator = reserve_in * fee_denominator + in_with_fee;
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{USDC, VENUE_ALPHA_ROUTER, WETH};
    use crate::utils::math::WEI_PER_ETH;
    use chrono::Duration;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_ETH)
    }

    fn test_venue() -> ConstantProductVenue {
        ConstantProductVenue::new(VENUE_ALPHA_ROUTER, "alpha", WETH, 30)
            .with_pool(USDC, eth(1000), eth(100_000))
    }

    fn swap_request(amount_in: U256, min_out: U256, path: Vec<AssetId>) -> SwapRequest {
        SwapRequest {
            amount_in,
            min_amount_out: min_out,
            path,
            deadline: Utc::now() + Duration::seconds(300),
        }
    }

    #[test]
    fn constant_product_matches_known_value() {
        // 1000 in against 1M/1M reserves at 30 bps: floor(9.97e12 / 10_009_970_000)
        let out = constant_product_out(
            U256::from(1000u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
            30,
        )
        .unwrap();
        assert_eq!(out, U256::from(996u64));
    }

    #[test]
    fn fee_reduces_output() {
        let args = (
            U256::from(1000u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        );
        let no_fee = constant_product_out(args.0, args.1, args.2, 0).unwrap();
        let with_fee = constant_product_out(args.0, args.1, args.2, 30).unwrap();
        assert_eq!(no_fee, U256::from(999u64));
        assert!(with_fee < no_fee);
    }

    #[test]
    fn empty_reserves_are_rejected() {
        let err = constant_product_out(U256::from(1u64), U256::ZERO, U256::from(5u64), 30)
            .unwrap_err();
        assert!(matches!(err, VenueError::InsufficientLiquidity { .. }));
    }

    #[tokio::test]
    async fn quote_does_not_move_reserves() {
        let venue = test_venue();
        let before = venue.reserves(USDC).await.unwrap();

        let amounts = venue.quote(eth(1), &[WETH, USDC]).await.unwrap();
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0], eth(1));
        // roughly 100 tokens per ETH minus fee and price impact
        assert!(amounts[1] > eth(99) && amounts[1] < eth(100));

        let after = venue.reserves(USDC).await.unwrap();
        assert_eq!(before.base, after.base);
        assert_eq!(before.token, after.token);
    }

    #[tokio::test]
    async fn swap_moves_reserves_and_unwind_restores_them() {
        let venue = test_venue();
        let before = venue.reserves(USDC).await.unwrap();

        let receipt = venue
            .swap_base_for_token(swap_request(eth(1), U256::ZERO, vec![WETH, USDC]))
            .await
            .unwrap();
        assert_eq!(receipt.amount_in, eth(1));
        assert_eq!(receipt.direction, SwapDirection::BaseToToken);

        let mid = venue.reserves(USDC).await.unwrap();
        assert_eq!(mid.base, before.base + eth(1));
        assert_eq!(mid.token, before.token - receipt.amount_out);

        venue.unwind(&receipt).await;
        let after = venue.reserves(USDC).await.unwrap();
        assert_eq!(after.base, before.base);
        assert_eq!(after.token, before.token);
    }

    #[tokio::test]
    async fn swap_refuses_output_below_floor() {
        let venue = test_venue();
        let before = venue.reserves(USDC).await.unwrap();

        let err = venue
            .swap_base_for_token(swap_request(eth(1), eth(101), vec![WETH, USDC]))
            .await
            .unwrap_err();
        assert!(matches!(err, VenueError::OutputBelowFloor { .. }));

        let after = venue.reserves(USDC).await.unwrap();
        assert_eq!(before.token, after.token);
    }

    #[tokio::test]
    async fn swap_refuses_expired_deadline() {
        let venue = test_venue();
        let expired = SwapRequest {
            amount_in: eth(1),
            min_amount_out: U256::ZERO,
            path: vec![WETH, USDC],
            deadline: Utc::now() - Duration::seconds(1),
        };
        let err = venue.swap_base_for_token(expired).await.unwrap_err();
        assert!(matches!(err, VenueError::DeadlineExceeded { .. }));
    }

    #[tokio::test]
    async fn unlisted_pair_is_rejected() {
        let venue = test_venue();
        let other = crate::types::VENUE_BETA_ROUTER;
        let err = venue.quote(eth(1), &[WETH, other]).await.unwrap_err();
        assert!(matches!(err, VenueError::UnknownPair { .. }));
    }

    #[tokio::test]
    async fn mismatched_entry_point_is_rejected() {
        let venue = test_venue();
        let err = venue
            .swap_base_for_token(swap_request(eth(1), U256::ZERO, vec![USDC, WETH]))
            .await
            .unwrap_err();
        assert!(matches!(err, VenueError::Connector { .. }));
    }

    #[tokio::test]
    async fn drift_stays_within_bounds() {
        let venue = test_venue();
        let before = venue.reserves(USDC).await.unwrap();

        venue.apply_drift(100).await;

        let after = venue.reserves(USDC).await.unwrap();
        assert_eq!(before.base, after.base);
        let bound = before.token * U256::from(100u64) / U256::from(10_000u64);
        let moved = if after.token > before.token {
            after.token - before.token
        } else {
            before.token - after.token
        };
        assert!(moved <= bound);
    }
}
