//! Error taxonomy for arbitrage attempts
//!
//! Every failure mode of an attempt maps to exactly one of these variants.
//! All of them are fatal to the attempt: state and funds are rolled back to
//! their pre-attempt values and nothing is retried automatically.

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::venue_error::VenueError;

#[derive(Error, Debug)]
pub enum ArbError {
    #[error("Venue {venue} is not approved for arbitrage")]
    VenueUnapproved {
        venue: Address,
    },

    #[error("Asset {asset} is not approved for arbitrage")]
    AssetUnapproved {
        asset: Address,
    },

    #[error("Quote unavailable from venue {venue}")]
    QuoteUnavailable {
        venue: Address,
        #[source]
        source: VenueError,
    },

    #[error("Execution is paused")]
    ExecutionPaused,

    #[error("Another arbitrage execution is already in flight")]
    ReentrantCall,

    #[error("Base balance {balance} does not exceed the reserve floor {min_balance}")]
    InsufficientReserve {
        balance: U256,
        min_balance: U256,
    },

    #[error("Cooldown active until {until}")]
    CooldownActive {
        until: DateTime<Utc>,
    },

    #[error("Swap on venue {venue} missed its slippage floor")]
    SwapSlippageExceeded {
        venue: Address,
        #[source]
        source: VenueError,
    },

    #[error("Swap on venue {venue} missed its deadline")]
    SwapDeadlineExceeded {
        venue: Address,
        #[source]
        source: VenueError,
    },

    #[error("Round trip realized no profit: {base_in} in, {base_out} out")]
    NoProfitRealized {
        base_in: U256,
        base_out: U256,
    },

    #[error("Realized profit {profit} below required minimum {required}")]
    ProfitBelowMinimum {
        profit: U256,
        required: U256,
    },

    #[error("Fund transfer failed: {details}")]
    FundTransferFailed {
        details: String,
    },
}

impl ArbError {
    /// Stable label for error counters and trade records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VenueUnapproved { .. } => "venue_unapproved",
            Self::AssetUnapproved { .. } => "asset_unapproved",
            Self::QuoteUnavailable { .. } => "quote_unavailable",
            Self::ExecutionPaused => "execution_paused",
            Self::ReentrantCall => "reentrant_call",
            Self::InsufficientReserve { .. } => "insufficient_reserve",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::SwapSlippageExceeded { .. } => "swap_slippage_exceeded",
            Self::SwapDeadlineExceeded { .. } => "swap_deadline_exceeded",
            Self::NoProfitRealized { .. } => "no_profit_realized",
            Self::ProfitBelowMinimum { .. } => "profit_below_minimum",
            Self::FundTransferFailed { .. } => "fund_transfer_failed",
        }
    }
}

pub type ArbResult<T> = Result<T, ArbError>;
