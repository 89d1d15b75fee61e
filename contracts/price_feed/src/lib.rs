#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String,
};

#[cfg(test)]
mod test;

/// Revision of this feed's query interface, bumped when the
/// [`RoundData`] layout or the entry points change.
pub const VERSION: u32 = 1;

// ── Data Types ──────────────────────────────────────────────────────────────

/// A single price report.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct RoundData {
    pub round_id: u64,
    /// Reported price, scaled by `10^decimals`.
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Address allowed to push new answers.
    Admin,
    /// Number of decimals the answers are scaled by.
    Decimals,
    /// Human readable pair, e.g. "ETH / USD".
    Description,
    /// Id of the most recent round.
    LatestRound,
    /// Historical round by id.
    Round(u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeedError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    RoundNotFound = 3,
}

// ── Contract ────────────────────────────────────────────────────────────────

#[contract]
pub struct PriceFeedContract;

#[contractimpl]
impl PriceFeedContract {
    /// Initializes the feed and records the first round.
    ///
    /// # Arguments
    /// * `admin`          – The address allowed to update the answer.
    /// * `decimals`       – Scale of every reported answer.
    /// * `initial_answer` – The answer stored as round 1.
    /// * `description`    – Label of the quoted pair.
    pub fn initialize(
        env: Env,
        admin: Address,
        decimals: u32,
        initial_answer: i128,
        description: String,
    ) -> Result<(), FeedError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(FeedError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        env.storage()
            .instance()
            .set(&DataKey::Description, &description);
        env.storage().instance().set(&DataKey::LatestRound, &0u64);

        record_round(&env, initial_answer);
        Ok(())
    }

    /// Push a new answer. Only the admin may call this.
    ///
    /// No validation is applied to `answer`: zero or negative values are
    /// stored as reported.
    pub fn update_answer(env: Env, answer: i128) -> Result<u64, FeedError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(FeedError::NotInitialized)?;
        admin.require_auth();

        Ok(record_round(&env, answer))
    }

    // ── View helpers ────────────────────────────────────────────────────

    /// Returns the most recent round.
    pub fn latest_round_data(env: Env) -> Result<RoundData, FeedError> {
        let latest: u64 = env
            .storage()
            .instance()
            .get(&DataKey::LatestRound)
            .ok_or(FeedError::NotInitialized)?;
        Self::get_round_data(env, latest)
    }

    /// Returns a historical round.
    pub fn get_round_data(env: Env, round_id: u64) -> Result<RoundData, FeedError> {
        env.storage()
            .persistent()
            .get(&DataKey::Round(round_id))
            .ok_or(FeedError::RoundNotFound)
    }

    /// Returns only the answer of the most recent round.
    pub fn latest_answer(env: Env) -> Result<i128, FeedError> {
        Ok(Self::latest_round_data(env)?.answer)
    }

    pub fn decimals(env: Env) -> Result<u32, FeedError> {
        env.storage()
            .instance()
            .get(&DataKey::Decimals)
            .ok_or(FeedError::NotInitialized)
    }

    pub fn description(env: Env) -> Result<String, FeedError> {
        env.storage()
            .instance()
            .get(&DataKey::Description)
            .ok_or(FeedError::NotInitialized)
    }

    pub fn admin(env: Env) -> Result<Address, FeedError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(FeedError::NotInitialized)
    }

    pub fn version(_env: Env) -> u32 {
        VERSION
    }
}

/// Stores `answer` as the next round and makes it the latest one.
fn record_round(env: &Env, answer: i128) -> u64 {
    let previous: u64 = env
        .storage()
        .instance()
        .get(&DataKey::LatestRound)
        .unwrap_or(0);
    let round_id = previous + 1;
    let now = env.ledger().timestamp();

    let round = RoundData {
        round_id,
        answer,
        started_at: now,
        updated_at: now,
        answered_in_round: round_id,
    };
    env.storage()
        .persistent()
        .set(&DataKey::Round(round_id), &round);
    env.storage()
        .instance()
        .set(&DataKey::LatestRound, &round_id);

    env.events()
        .publish((symbol_short!("answer"), round_id), (answer, now));

    round_id
}
