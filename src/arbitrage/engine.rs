//! Arbitrage engine: decision, admission, execution and settlement
//!
//! `attempt_arbitrage` is the single fund-moving entry point. It always
//! decides first: the round trip is quoted and evaluated before any
//! admission check runs, so an unprofitable opportunity is declined (and
//! the deposit returned) even while executions are paused. Only a
//! profitable decision proceeds to the execution guard and the two-leg
//! swap, and every failure past that point reverts the attempt with no
//! funds retained.

use alloy::primitives::U256;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::admin::AdminHandle;
use crate::config::{Config, MAX_LEG1_SLIPPAGE_BPS};
use crate::errors::ArbResult;
use crate::execution::{
    ExecutionGuard, ExecutionState, SwapExecutor, TradePlan, Treasury, leg1_floor, verify_profit,
};
use crate::registry::ApprovalRegistry;
use crate::types::{ArbitrageParameters, AssetId, TradeOutcome, TradeResult, VenueId};
use crate::utils::math::{eth_to_wei, wei_to_eth};
use crate::venues::VenueDirectory;

use super::profitability::{evaluate, required_profit};
use super::quote::QuoteEngine;

/// Initial engine parameters; runtime changes go through [`AdminHandle`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub min_profit_margin_bps: u64,
    pub min_base_balance: U256,
    pub auto_trade_enabled: bool,
    pub leg1_slippage_tolerance_bps: u32,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_profit_margin_bps: config.min_profit_margin_bps,
            min_base_balance: eth_to_wei(config.min_base_balance_eth),
            auto_trade_enabled: config.auto_trade_enabled,
            leg1_slippage_tolerance_bps: config.leg1_slippage_tolerance_bps,
        }
    }
}

pub struct ArbEngine {
    registry: Arc<RwLock<ApprovalRegistry>>,
    params: Arc<RwLock<ArbitrageParameters>>,
    state: Arc<RwLock<ExecutionState>>,
    treasury: Arc<RwLock<Treasury>>,
    /// Engine-wide execution mutex. Attempts take it fail-fast through
    /// the guard; recovery sweeps queue on it so they never interleave
    /// with an in-flight trade.
    execution_lock: Arc<Mutex<()>>,
    guard: ExecutionGuard,
    quotes: QuoteEngine,
    executor: SwapExecutor,
    leg1_slippage_tolerance_bps: u32,
}

impl ArbEngine {
    pub fn new(venues: VenueDirectory, settings: EngineSettings) -> Self {
        let venues = Arc::new(venues);
        let registry = Arc::new(RwLock::new(ApprovalRegistry::new()));
        let params = Arc::new(RwLock::new(ArbitrageParameters {
            min_profit_margin_bps: settings.min_profit_margin_bps,
            min_base_balance: settings.min_base_balance,
        }));
        let state = Arc::new(RwLock::new(ExecutionState::new(settings.auto_trade_enabled)));
        let treasury = Arc::new(RwLock::new(Treasury::new()));
        let execution_lock = Arc::new(Mutex::new(()));

        Self {
            guard: ExecutionGuard::new(
                state.clone(),
                execution_lock.clone(),
                registry.clone(),
                params.clone(),
            ),
            quotes: QuoteEngine::new(venues.clone(), registry.clone()),
            executor: SwapExecutor::new(venues),
            registry,
            params,
            state,
            treasury,
            execution_lock,
            leg1_slippage_tolerance_bps: settings
                .leg1_slippage_tolerance_bps
                .min(MAX_LEG1_SLIPPAGE_BPS),
        }
    }

    /// Handle for the administration surface: approvals, parameters,
    /// pause control and recovery sweeps.
    pub fn admin(&self) -> AdminHandle {
        AdminHandle::new(
            self.registry.clone(),
            self.params.clone(),
            self.state.clone(),
            self.treasury.clone(),
            self.execution_lock.clone(),
        )
    }

    /// Whether the keeper should attempt trades on its own. Direct calls
    /// to [`Self::attempt_arbitrage`] are not gated by this flag.
    pub async fn auto_trade_enabled(&self) -> bool {
        self.state.read().await.auto_trade_enabled
    }

    /// Base units currently held by the engine treasury.
    pub async fn base_balance(&self) -> U256 {
        self.treasury.read().await.base_balance()
    }

    /// Attempt one round trip: base into `asset` on `venue_a`, back into
    /// base on `venue_b`, trading the full held balance plus `deposit`.
    ///
    /// Returns `Ok(Declined { .. })` when the quote fails the margin test
    /// (the deposit is the caller's again), `Ok(Executed { .. })` with the
    /// full payout on success, and `Err` when any guard, swap or
    /// settlement step rejects the attempt. On `Err` the deposit is never
    /// taken and no venue or treasury state is left modified.
    pub async fn attempt_arbitrage(
        &self,
        venue_a: VenueId,
        venue_b: VenueId,
        asset: AssetId,
        deposit: U256,
    ) -> ArbResult<TradeOutcome> {
        let min_margin = self.params.read().await.min_profit_margin_bps;
        let held = self.treasury.read().await.base_balance();
        let decision_base_in = held + deposit;

        let quote = self
            .quotes
            .compute_round_trip(venue_a, venue_b, asset, decision_base_in)
            .await?;
        let (profitable, expected_profit) = evaluate(decision_base_in, quote.round_trip_out, min_margin);
        if !profitable {
            info!(
                asset = %asset,
                base_in_eth = %wei_to_eth(decision_base_in),
                round_trip_eth = %wei_to_eth(quote.round_trip_out),
                "📉 Round trip below margin, returning deposit"
            );
            return Ok(TradeOutcome::Declined {
                quote,
                refund: deposit,
            });
        }

        let _permit = self
            .guard
            .admit(venue_a, venue_b, asset, decision_base_in)
            .await?;

        // The permit excludes every other writer, so this snapshot is the
        // authoritative pre-trade state even if it drifted since the
        // decision read above. Floors are recomputed from it.
        let mut working = self.treasury.read().await.clone();
        working.credit_base(deposit);
        let base_before = working.base_balance();

        let plan = TradePlan {
            venue_a,
            venue_b,
            asset,
            base_in: base_before,
            token_floor: leg1_floor(quote.token_out, self.leg1_slippage_tolerance_bps),
            required_profit: required_profit(base_before, min_margin),
        };
        info!(
            venue_a = %venue_a,
            venue_b = %venue_b,
            asset = %asset,
            base_in_eth = %wei_to_eth(base_before),
            expected_profit_eth = %wei_to_eth(expected_profit),
            "🚀 Executing round trip"
        );

        let receipts = self.executor.execute(&mut working, &plan).await?;

        let base_after = working.base_balance();
        let profit = match verify_profit(base_before, base_after, plan.required_profit) {
            Ok(profit) => profit,
            Err(e) => {
                warn!(error = %e, "Settlement rejected the trade, unwinding both legs");
                self.executor.unwind(&receipts).await;
                return Err(e);
            }
        };

        let payout = working.drain_base();
        *self.treasury.write().await = working;
        self.guard.record_execution(Utc::now()).await;

        let result = TradeResult {
            asset,
            base_in: base_before,
            base_out: base_after,
            profit,
        };
        info!(
            asset = %asset,
            profit_eth = %wei_to_eth(result.profit),
            payout_eth = %wei_to_eth(payout),
            "💰 Arbitrage settled"
        );
        Ok(TradeOutcome::Executed { result, payout })
    }
}
