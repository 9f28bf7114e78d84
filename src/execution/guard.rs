//! Admission control for arbitrage executions
//!
//! Every fund-moving attempt passes through `admit` first. The checks run
//! in a fixed order: pause switch, reentrancy lock, balance floor,
//! approvals, cooldown. Admission is all-or-nothing: a failing check
//! aborts the attempt with no state change and releases the lock if it
//! was already taken.

use alloy::primitives::U256;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::TRADE_COOLDOWN_SECS;
use crate::errors::{ArbError, ArbResult};
use crate::registry::ApprovalRegistry;
use crate::types::{ArbitrageParameters, AssetId, VenueId};

/// Mutable execution bookkeeping shared with the administration surface.
/// The reentrancy lock itself lives in [`ExecutionGuard`] as a mutex; it
/// is held exactly for the dynamic extent of one in-flight execution.
#[derive(Debug)]
pub struct ExecutionState {
    pub auto_trade_enabled: bool,
    pub last_execution_time: Option<DateTime<Utc>>,
    pub paused: bool,
}

impl ExecutionState {
    pub fn new(auto_trade_enabled: bool) -> Self {
        Self {
            auto_trade_enabled,
            last_execution_time: None,
            paused: false,
        }
    }
}

/// Held for the duration of one admitted execution; dropping it releases
/// the reentrancy lock on every exit path.
#[derive(Debug)]
pub struct ExecutionPermit {
    _lock: OwnedMutexGuard<()>,
}

pub struct ExecutionGuard {
    state: Arc<RwLock<ExecutionState>>,
    lock: Arc<Mutex<()>>,
    registry: Arc<RwLock<ApprovalRegistry>>,
    params: Arc<RwLock<ArbitrageParameters>>,
}

impl ExecutionGuard {
    /// `lock` is the engine-wide execution mutex; attempts take it
    /// fail-fast here, recovery sweeps queue on it.
    pub fn new(
        state: Arc<RwLock<ExecutionState>>,
        lock: Arc<Mutex<()>>,
        registry: Arc<RwLock<ApprovalRegistry>>,
        params: Arc<RwLock<ArbitrageParameters>>,
    ) -> Self {
        Self {
            state,
            lock,
            registry,
            params,
        }
    }

    /// Run the admission checks for one execution over `balance` base
    /// units (the holdings including the caller's deposit).
    pub async fn admit(
        &self,
        venue_a: VenueId,
        venue_b: VenueId,
        asset: AssetId,
        balance: U256,
    ) -> ArbResult<ExecutionPermit> {
        if self.state.read().await.paused {
            return Err(ArbError::ExecutionPaused);
        }

        let permit = match self.lock.clone().try_lock_owned() {
            Ok(lock) => ExecutionPermit { _lock: lock },
            Err(_) => return Err(ArbError::ReentrantCall),
        };

        let min_balance = self.params.read().await.min_base_balance;
        if balance <= min_balance {
            return Err(ArbError::InsufficientReserve {
                balance,
                min_balance,
            });
        }

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

        if let Some(last) = self.state.read().await.last_execution_time {
            let until = last + Duration::seconds(TRADE_COOLDOWN_SECS);
            if Utc::now() < until {
                return Err(ArbError::CooldownActive { until });
            }
        }

        Ok(permit)
    }

    /// Advance the cooldown clock after a settled execution. Called
    /// exactly once per success, after settlement. The timestamp never
    /// moves backwards even if the wall clock does.
    pub async fn record_execution(&self, at: DateTime<Utc>) {
        let mut state = self.state.write().await;
        state.last_execution_time = Some(match state.last_execution_time {
            Some(previous) => previous.max(at),
            None => at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{USDC, VENUE_ALPHA_ROUTER, VENUE_BETA_ROUTER};

    fn approved_guard() -> ExecutionGuard {
        let mut registry = ApprovalRegistry::new();
        registry.set_venue(VENUE_ALPHA_ROUTER, true);
        registry.set_venue(VENUE_BETA_ROUTER, true);
        registry.set_asset(USDC, true);
        ExecutionGuard::new(
            Arc::new(RwLock::new(ExecutionState::new(true))),
            Arc::new(Mutex::new(())),
            Arc::new(RwLock::new(registry)),
            Arc::new(RwLock::new(ArbitrageParameters {
                min_profit_margin_bps: 10,
                min_base_balance: U256::from(100u64),
            })),
        )
    }

    async fn admit(guard: &ExecutionGuard, balance: u64) -> ArbResult<ExecutionPermit> {
        guard
            .admit(
                VENUE_ALPHA_ROUTER,
                VENUE_BETA_ROUTER,
                USDC,
                U256::from(balance),
            )
            .await
    }

    #[tokio::test]
    async fn healthy_state_admits() {
        let guard = approved_guard();
        assert!(admit(&guard, 101).await.is_ok());
    }

    #[tokio::test]
    async fn paused_state_rejects_first() {
        let guard = approved_guard();
        guard.state.write().await.paused = true;
        let err = admit(&guard, 101).await.unwrap_err();
        assert!(matches!(err, ArbError::ExecutionPaused));
    }

    #[tokio::test]
    async fn held_permit_blocks_a_second_admission() {
        let guard = approved_guard();
        let permit = admit(&guard, 101).await.unwrap();

        let err = admit(&guard, 101).await.unwrap_err();
        assert!(matches!(err, ArbError::ReentrantCall));

        drop(permit);
        assert!(admit(&guard, 101).await.is_ok());
    }

    #[tokio::test]
    async fn balance_must_strictly_exceed_the_floor() {
        let guard = approved_guard();

        let err = admit(&guard, 100).await.unwrap_err();
        assert!(matches!(err, ArbError::InsufficientReserve { .. }));

        assert!(admit(&guard, 101).await.is_ok());
    }

    #[tokio::test]
    async fn failed_check_releases_the_lock() {
        let guard = approved_guard();
        // balance check fails after the lock is taken; the lock must be
        // free again for the next attempt
        let err = admit(&guard, 100).await.unwrap_err();
        assert!(matches!(err, ArbError::InsufficientReserve { .. }));
        assert!(admit(&guard, 101).await.is_ok());
    }

    #[tokio::test]
    async fn revoked_venue_fails_admission() {
        let guard = approved_guard();
        guard.registry.write().await.set_venue(VENUE_BETA_ROUTER, false);
        let err = admit(&guard, 101).await.unwrap_err();
        assert!(matches!(
            err,
            ArbError::VenueUnapproved { venue } if venue == VENUE_BETA_ROUTER
        ));
    }

    #[tokio::test]
    async fn revoked_asset_fails_admission() {
        let guard = approved_guard();
        guard.registry.write().await.set_asset(USDC, false);
        let err = admit(&guard, 101).await.unwrap_err();
        assert!(matches!(err, ArbError::AssetUnapproved { asset } if asset == USDC));
    }

    #[tokio::test]
    async fn recent_execution_triggers_the_cooldown() {
        let guard = approved_guard();
        guard.record_execution(Utc::now()).await;

        let err = admit(&guard, 101).await.unwrap_err();
        assert!(matches!(err, ArbError::CooldownActive { .. }));
    }

    #[tokio::test]
    async fn elapsed_cooldown_admits_again() {
        let guard = approved_guard();
        guard
            .record_execution(Utc::now() - Duration::seconds(TRADE_COOLDOWN_SECS + 1))
            .await;
        assert!(admit(&guard, 101).await.is_ok());
    }

    #[tokio::test]
    async fn execution_time_never_moves_backwards() {
        let guard = approved_guard();
        let later = Utc::now();
        let earlier = later - Duration::seconds(30);

        guard.record_execution(later).await;
        guard.record_execution(earlier).await;

        assert_eq!(
            guard.state.read().await.last_execution_time,
            Some(later)
        );
    }
}
