//! Price oracle adapter.
//!
//! Wraps the aggregator-style price feed the ledger is configured with and
//! converts native amounts into their USD value.

use soroban_sdk::{contractclient, contracttype, Address, Env};

use crate::ContractError;

// Aggregator interface consumed by the ledger.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    // Number of decimals every answer is scaled by
    fn decimals(env: Env) -> u32;
    // Most recent price report
    fn latest_round_data(env: Env) -> RoundData;
}

// Price report as returned by the feed.
#[contracttype(export = false)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

/// A validated price read, never cached across calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriceSnapshot {
    /// Strictly positive price, scaled by `10^decimals`.
    pub price: i128,
    pub decimals: u32,
    pub updated_at: u64,
}

/// Queries the feed for its latest price.
///
/// Any failure of the feed call, as well as a zero or negative answer, is
/// reported as [`ContractError::OracleUnavailable`].
pub fn latest_price(env: &Env, feed: &Address) -> Result<PriceSnapshot, ContractError> {
    let client = PriceFeedClient::new(env, feed);

    let decimals = match client.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(ContractError::OracleUnavailable),
    };
    let round = match client.try_latest_round_data() {
        Ok(Ok(round)) => round,
        _ => return Err(ContractError::OracleUnavailable),
    };

    if round.answer <= 0 {
        return Err(ContractError::OracleUnavailable);
    }

    Ok(PriceSnapshot {
        price: round.answer,
        decimals,
        updated_at: round.updated_at,
    })
}

/// Converts `native_amount` into USD using the same fixed-point base.
///
/// `native_amount * price / 10^decimals`, rounded down.
pub fn to_usd(native_amount: i128, snapshot: &PriceSnapshot) -> Result<i128, ContractError> {
    let scale = 10i128
        .checked_pow(snapshot.decimals)
        .ok_or(ContractError::ArithmeticOverflow)?;
    native_amount
        .checked_mul(snapshot.price)
        .and_then(|value| value.checked_div(scale))
        .ok_or(ContractError::ArithmeticOverflow)
}
