//! Profit verification after both legs have applied

use alloy::primitives::U256;

use crate::errors::{ArbError, ArbResult};

/// Check the realized outcome of an execution against the no-loss and
/// minimum-profit invariants. Returns the realized profit, or the error
/// that obliges the caller to unwind the whole execution. The leg-2 floor
/// already enforces the same bound at the venue; this is the final word
/// before funds are committed.
pub fn verify_profit(
    base_before: U256,
    base_after: U256,
    required_profit: U256,
) -> ArbResult<U256> {
    if base_after <= base_before {
        return Err(ArbError::NoProfitRealized {
            base_in: base_before,
            base_out: base_after,
        });
    }
    let profit = base_after - base_before;
    if profit < required_profit {
        return Err(ArbError::ProfitBelowMinimum {
            profit,
            required: required_profit,
        });
    }
    Ok(profit)
}
