//! Deterministic scripted venue for tests and dry runs

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::{VenueError, VenueResult};
use crate::types::{AssetId, VenueId};

use super::{SwapDirection, SwapReceipt, SwapRequest, Venue, resolve_direction};

#[derive(Debug, Clone, Copy)]
struct RatePair {
    base_to_token: (U256, U256),
    token_to_base: (U256, U256),
}

/// Venue quoting static rational rates, with hooks to inject delays and
/// failures. Holds no reserves, so `unwind` has nothing to restore.
pub struct FixedRateVenue {
    id: VenueId,
    name: String,
    base_asset: AssetId,
    rates: HashMap<AssetId, RatePair>,
    quote_delay: Option<Duration>,
    swap_delay: Option<Duration>,
    quote_failure: bool,
    expire_swaps: bool,
    shortfall_bps: u32,
    enforce_floor: bool,
}

impl FixedRateVenue {
    pub fn new(id: VenueId, name: impl Into<String>, base_asset: AssetId) -> Self {
        Self {
            id,
            name: name.into(),
            base_asset,
            rates: HashMap::new(),
            quote_delay: None,
            swap_delay: None,
            quote_failure: false,
            expire_swaps: false,
            shortfall_bps: 0,
            enforce_floor: true,
        }
    }

    /// List `asset` at fixed rational rates, given as `(numerator,
    /// denominator)` multipliers of the input amount for each direction.
    pub fn with_rates(
        mut self,
        asset: AssetId,
        base_to_token: (u64, u64),
        token_to_base: (u64, u64),
    ) -> Self {
        self.rates.insert(
            asset,
            RatePair {
                base_to_token: (
                    U256::from(base_to_token.0),
                    U256::from(base_to_token.1.max(1)),
                ),
                token_to_base: (
                    U256::from(token_to_base.0),
                    U256::from(token_to_base.1.max(1)),
                ),
            },
        );
        self
    }

    /// Stall every quote by `delay` before answering.
    pub fn with_quote_delay(mut self, delay: Duration) -> Self {
        self.quote_delay = Some(delay);
        self
    }

    /// Stall every swap by `delay` before executing.
    pub fn with_swap_delay(mut self, delay: Duration) -> Self {
        self.swap_delay = Some(delay);
        self
    }

    /// Make every quote fail as if the connector were unreachable.
    pub fn with_quote_failure(mut self) -> Self {
        self.quote_failure = true;
        self
    }

    /// Make every swap fail its deadline check.
    pub fn with_expired_deadlines(mut self) -> Self {
        self.expire_swaps = true;
        self
    }

    /// Deliver `shortfall_bps` less than the quoted amount on swaps.
    /// With `enforce_floor` set the venue still refuses outputs under the
    /// requested floor; without it the venue delivers short regardless,
    /// modeling a connector whose receipts cannot be trusted.
    pub fn with_delivery_shortfall(mut self, shortfall_bps: u32, enforce_floor: bool) -> Self {
        self.shortfall_bps = shortfall_bps.min(10_000);
        self.enforce_floor = enforce_floor;
        self
    }

    fn rate_out(
        &self,
        amount_in: U256,
        asset: AssetId,
        direction: SwapDirection,
        path: &[AssetId],
    ) -> VenueResult<U256> {
        let pair = self.rates.get(&asset).ok_or(VenueError::UnknownPair {
            asset_in: path[0],
            asset_out: path[1],
        })?;
        let (numerator, denominator) = match direction {
            SwapDirection::BaseToToken => pair.base_to_token,
            SwapDirection::TokenToBase => pair.token_to_base,
        };
        Ok(amount_in * numerator / denominator)
    }
}

#[async_trait]
impl Venue for FixedRateVenue {
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
        if let Some(delay) = self.quote_delay {
            tokio::time::sleep(delay).await;
        }
        if self.quote_failure {
            return Err(VenueError::Connector {
                message: "connector offline".to_string(),
                source: None,
            });
        }
        let (asset, direction) = resolve_direction(self.base_asset, path)?;
        let amount_out = self.rate_out(amount_in, asset, direction, path)?;
        Ok(vec![amount_in, amount_out])
    }

    async fn swap_base_for_token(&self, request: SwapRequest) -> VenueResult<SwapReceipt> {
        self.scripted_swap(request, SwapDirection::BaseToToken).await
    }

    async fn swap_token_for_base(&self, request: SwapRequest) -> VenueResult<SwapReceipt> {
        self.scripted_swap(request, SwapDirection::TokenToBase).await
    }

    async fn unwind(&self, receipt: &SwapReceipt) {
        debug!(venue = %self.name, amount_in = %receipt.amount_in, "Unwound swap");
    }
}

impl FixedRateVenue {
    async fn scripted_swap(
        &self,
        request: SwapRequest,
        expected: SwapDirection,
    ) -> VenueResult<SwapReceipt> {
        if let Some(delay) = self.swap_delay {
            tokio::time::sleep(delay).await;
        }
        let now = Utc::now();
        if self.expire_swaps || now > request.deadline {
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
        let quoted = self.rate_out(request.amount_in, asset, direction, &request.path)?;
        let delivered = quoted - quoted * U256::from(self.shortfall_bps) / U256::from(10_000u64);
        if self.enforce_floor && delivered < request.min_amount_out {
            return Err(VenueError::OutputBelowFloor {
                floor: request.min_amount_out,
                actual: delivered,
            });
        }
        Ok(SwapReceipt {
            venue: self.id,
            asset,
            direction,
            amount_in: request.amount_in,
            amount_out: delivered,
        })
    }
}
