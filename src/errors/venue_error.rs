//! Errors surfaced by venue connectors

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VenueError {
    #[error("Venue does not list pair {asset_in} -> {asset_out}")]
    UnknownPair {
        asset_in: Address,
        asset_out: Address,
    },

    #[error("Malformed swap path: expected [in, out], got {hops} hops")]
    MalformedPath {
        hops: usize,
    },

    #[error("Insufficient liquidity for {amount_in} in: {details}")]
    InsufficientLiquidity {
        amount_in: U256,
        details: String,
    },

    #[error("Swap deadline {deadline} already passed at {now}")]
    DeadlineExceeded {
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("Output {actual} below required floor {floor}")]
    OutputBelowFloor {
        floor: U256,
        actual: U256,
    },

    #[error("Venue connector failure: {message}")]
    Connector {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

pub type VenueResult<T> = Result<T, VenueError>;
