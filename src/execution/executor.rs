//! Two-leg swap execution
//!
//! Leg 1 converts the entire base balance into the asset on venue A;
//! leg 2 converts that exact token amount back on venue B with a floor of
//! the traded base plus the required profit, so leg 2 itself rejects any
//! outcome worse than the target. Legs are one unit of work: on any
//! failure after leg 1, leg 1 is unwound before the error is surfaced.

use alloy::primitives::U256;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{BPS_DENOMINATOR, SWAP_DEADLINE_SECS};
use crate::errors::{ArbError, ArbResult, VenueError};
use crate::types::{AssetId, VenueId};
use crate::venues::{SwapReceipt, SwapRequest, VenueDirectory, resolve_venue};

use super::treasury::Treasury;

/// Amounts and floors fixed before the first swap fires.
#[derive(Debug, Clone)]
pub struct TradePlan {
    pub venue_a: VenueId,
    pub venue_b: VenueId,
    pub asset: AssetId,
    /// Entire base balance being traded.
    pub base_in: U256,
    /// Leg-1 slippage floor derived from the decision quote.
    pub token_floor: U256,
    /// Minimum profit leg 2 must deliver on top of `base_in`.
    pub required_profit: U256,
}

/// Receipts of both applied legs, kept so a settlement failure can still
/// unwind the full execution.
#[derive(Debug, Clone)]
pub struct LegReceipts {
    pub leg1: SwapReceipt,
    pub leg2: SwapReceipt,
}

pub struct SwapExecutor {
    venues: Arc<VenueDirectory>,
}

impl SwapExecutor {
    pub fn new(venues: Arc<VenueDirectory>) -> Self {
        Self { venues }
    }

    /// Run both legs against the working treasury copy. Venue state is
    /// restored on failure; the working copy is the caller's to discard.
    pub async fn execute(
        &self,
        working: &mut Treasury,
        plan: &TradePlan,
    ) -> ArbResult<LegReceipts> {
        let venue_a = resolve_venue(&self.venues, plan.venue_a)?;
        let venue_b = resolve_venue(&self.venues, plan.venue_b)?;

        working.debit_base(plan.base_in)?;
        let request = SwapRequest {
            amount_in: plan.base_in,
            min_amount_out: plan.token_floor,
            path: vec![venue_a.native_asset(), plan.asset],
            deadline: swap_deadline(),
        };
        let leg1 = venue_a
            .swap_base_for_token(request)
            .await
            .map_err(|e| map_swap_error(plan.venue_a, e))?;
        // Receipts are not trusted blindly: a venue that reports less
        // than the floor it accepted is unwound on the spot.
        if leg1.amount_out < plan.token_floor {
            venue_a.unwind(&leg1).await;
            return Err(ArbError::SwapSlippageExceeded {
                venue: plan.venue_a,
                source: VenueError::OutputBelowFloor {
                    floor: plan.token_floor,
                    actual: leg1.amount_out,
                },
            });
        }
        working.credit_token(plan.asset, leg1.amount_out);
        debug!(
            venue = %plan.venue_a,
            base_in = %plan.base_in,
            token_out = %leg1.amount_out,
            "Leg 1 applied"
        );

        let base_floor = plan.base_in + plan.required_profit;
        if let Err(e) = working.debit_token(plan.asset, leg1.amount_out) {
            venue_a.unwind(&leg1).await;
            return Err(e);
        }
        let request = SwapRequest {
            amount_in: leg1.amount_out,
            min_amount_out: base_floor,
            path: vec![plan.asset, venue_b.native_asset()],
            deadline: swap_deadline(),
        };
        let leg2 = match venue_b.swap_token_for_base(request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(venue = %plan.venue_b, error = %e, "Leg 2 failed, unwinding leg 1");
                venue_a.unwind(&leg1).await;
                return Err(map_swap_error(plan.venue_b, e));
            }
        };
        if leg2.amount_out < base_floor {
            warn!(
                venue = %plan.venue_b,
                delivered = %leg2.amount_out,
                floor = %base_floor,
                "Leg 2 receipt under floor, unwinding both legs"
            );
            venue_b.unwind(&leg2).await;
            venue_a.unwind(&leg1).await;
            return Err(ArbError::SwapSlippageExceeded {
                venue: plan.venue_b,
                source: VenueError::OutputBelowFloor {
                    floor: base_floor,
                    actual: leg2.amount_out,
                },
            });
        }
        working.credit_base(leg2.amount_out);
        debug!(
            venue = %plan.venue_b,
            token_in = %leg1.amount_out,
            base_out = %leg2.amount_out,
            "Leg 2 applied"
        );

        Ok(LegReceipts { leg1, leg2 })
    }

    /// Undo both applied legs in reverse order.
    pub async fn unwind(&self, receipts: &LegReceipts) {
        if let Some(venue) = self.venues.get(&receipts.leg2.venue) {
            venue.unwind(&receipts.leg2).await;
        }
        if let Some(venue) = self.venues.get(&receipts.leg1.venue) {
            venue.unwind(&receipts.leg1).await;
        }
    }
}

/// Leg-1 slippage floor: the quoted token output less the configured
/// tolerance. A tolerance of 10000 bps turns the floor off entirely.
pub fn leg1_floor(quoted_token_out: U256, tolerance_bps: u32) -> U256 {
    quoted_token_out - quoted_token_out * U256::from(tolerance_bps) / U256::from(BPS_DENOMINATOR)
}

/// Validity window for one swap leg, measured from submission.
pub fn swap_deadline() -> DateTime<Utc> {
    Utc::now() + Duration::seconds(SWAP_DEADLINE_SECS)
}

fn map_swap_error(venue: VenueId, error: VenueError) -> ArbError {
    match error {
        VenueError::DeadlineExceeded { .. } => ArbError::SwapDeadlineExceeded {
            venue,
            source: error,
        },
        _ => ArbError::SwapSlippageExceeded {
            venue,
            source: error,
        },
    }
}
