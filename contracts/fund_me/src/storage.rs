//! Typed helpers over the two storage tiers used by the ledger.
//!
//! | Tier       | Key                     | Type      |
//! |------------|-------------------------|-----------|
//! | Instance   | `Config`                | `Config`  |
//! | Instance   | `FunderCount`           | `u32`     |
//! | Persistent | `Funder(index)`         | `Address` |
//! | Persistent | `AmountFunded(address)` | `i128`    |
//!
//! The funder list is an arena of `Funder(i)` slots for `i < FunderCount`.
//! An `AmountFunded` entry exists only while its address is listed, so its
//! presence doubles as the duplicate check.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{Config, ContractError};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Immutable ledger configuration (Instance).
    Config,
    /// Length of the funder list (Instance).
    FunderCount,
    /// Funder list slot (Persistent).
    Funder(u32),
    /// Cumulative amount funded by an address (Persistent).
    AmountFunded(Address),
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Configuration ────────────────────────────────────────────────────

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::FunderCount, &0u32);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<Config, ContractError> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)?;
    bump_instance(env);
    Ok(config)
}

// ── Funder list ──────────────────────────────────────────────────────

pub fn funder_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::FunderCount)
        .unwrap_or(0)
}

pub fn load_funder(env: &Env, index: u32) -> Result<Address, ContractError> {
    if index >= funder_count(env) {
        return Err(ContractError::IndexOutOfRange);
    }
    let key = DataKey::Funder(index);
    let funder = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::IndexOutOfRange)?;
    bump_persistent(env, &key);
    Ok(funder)
}

/// Returns the listed funders in first-contribution order.
pub fn load_funders(env: &Env) -> Result<Vec<Address>, ContractError> {
    let mut funders = Vec::new(env);
    for index in 0..funder_count(env) {
        funders.push_back(load_funder(env, index)?);
    }
    Ok(funders)
}

/// Returns `None` for addresses that are not currently listed.
pub fn amount_funded(env: &Env, funder: &Address) -> Option<i128> {
    let key = DataKey::AmountFunded(funder.clone());
    let amount = env.storage().persistent().get(&key);
    if amount.is_some() {
        bump_persistent(env, &key);
    }
    amount
}

/// Adds `amount` to the funder's record, appending the funder to the list
/// when it has no record yet. Returns the new cumulative amount.
pub fn credit_funder(env: &Env, funder: &Address, amount: i128) -> Result<i128, ContractError> {
    let total = match amount_funded(env, funder) {
        Some(previous) => previous
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?,
        None => {
            let index = funder_count(env);
            let slot = DataKey::Funder(index);
            env.storage().persistent().set(&slot, funder);
            bump_persistent(env, &slot);
            env.storage()
                .instance()
                .set(&DataKey::FunderCount, &(index + 1));
            amount
        }
    };

    let key = DataKey::AmountFunded(funder.clone());
    env.storage().persistent().set(&key, &total);
    bump_persistent(env, &key);
    bump_instance(env);
    Ok(total)
}

/// Drops every funder record and empties the list.
pub fn clear_funders(env: &Env, funders: &Vec<Address>) {
    for (index, funder) in funders.iter().enumerate() {
        env.storage()
            .persistent()
            .remove(&DataKey::AmountFunded(funder));
        env.storage()
            .persistent()
            .remove(&DataKey::Funder(index as u32));
    }
    env.storage().instance().set(&DataKey::FunderCount, &0u32);
    bump_instance(env);
}
