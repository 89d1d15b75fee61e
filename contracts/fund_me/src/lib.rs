#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
};

pub mod oracle;
mod storage;


/// Minimum contribution in USD, 18-decimal fixed point ($5).
pub const DEFAULT_MINIMUM_USD: i128 = 5_000_000_000_000_000_000;

// ── Data Types ──────────────────────────────────────────────────────────────

/// Ledger configuration, written once by `initialize`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Config {
    /// The only address allowed to withdraw.
    pub owner: Address,
    /// Stellar Asset Contract of the native currency.
    pub native_token: Address,
    /// Price feed quoting the native currency in USD.
    pub price_feed: Address,
    /// Minimum USD value of a single contribution (18 decimals).
    pub minimum_usd: i128,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InsufficientValue = 3,
    Unauthorized = 4,
    IndexOutOfRange = 5,
    OracleUnavailable = 6,
    TransferFailed = 7,
    InvalidMinimum = 8,
    ArithmeticOverflow = 9,
}

// ── Contract ────────────────────────────────────────────────────────────────

#[contract]
pub struct FundMeContract;

#[contractimpl]
impl FundMeContract {
    /// Initializes the ledger.
    ///
    /// # Arguments
    /// * `owner`        – The address allowed to withdraw.
    /// * `native_token` – The native currency's asset contract.
    /// * `price_feed`   – The oracle quoting the native currency in USD.
    /// * `minimum_usd`  – Minimum contribution in USD, defaults to
    ///   [`DEFAULT_MINIMUM_USD`].
    pub fn initialize(
        env: Env,
        owner: Address,
        native_token: Address,
        price_feed: Address,
        minimum_usd: Option<i128>,
    ) -> Result<(), ContractError> {
        if storage::has_config(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        owner.require_auth();

        let minimum_usd = minimum_usd.unwrap_or(DEFAULT_MINIMUM_USD);
        if minimum_usd < 0 {
            return Err(ContractError::InvalidMinimum);
        }

        let config = Config {
            owner: owner.clone(),
            native_token,
            price_feed: price_feed.clone(),
            minimum_usd,
        };
        storage::save_config(&env, &config);

        env.events()
            .publish((symbol_short!("init"), owner), (price_feed, minimum_usd));
        Ok(())
    }

    /// Contribute native currency.
    ///
    /// The amount is valued at the feed's current price and rejected when
    /// worth less than the configured minimum. Nothing is transferred or
    /// recorded on rejection.
    pub fn fund(env: Env, funder: Address, native_amount: i128) -> Result<(), ContractError> {
        funder.require_auth();

        let config = storage::load_config(&env)?;

        let price = oracle::latest_price(&env, &config.price_feed)?;
        let usd_equivalent = oracle::to_usd(native_amount, &price)?;
        if native_amount <= 0 || usd_equivalent < config.minimum_usd {
            return Err(ContractError::InsufficientValue);
        }

        let token_client = token::Client::new(&env, &config.native_token);
        match token_client.try_transfer(&funder, &env.current_contract_address(), &native_amount) {
            Ok(Ok(())) => {}
            _ => return Err(ContractError::TransferFailed),
        }

        storage::credit_funder(&env, &funder, native_amount)?;

        env.events().publish(
            (symbol_short!("funded"), funder),
            (native_amount, usd_equivalent),
        );
        Ok(())
    }

    /// Withdraw the whole balance to the owner and reset every funder record.
    ///
    /// Returns the amount transferred. Withdrawing from an empty ledger
    /// succeeds and transfers nothing.
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, ContractError> {
        caller.require_auth();

        let config = storage::load_config(&env)?;
        if caller != config.owner {
            return Err(ContractError::Unauthorized);
        }

        let funders = storage::load_funders(&env)?;
        let token_client = token::Client::new(&env, &config.native_token);
        let contract_address = env.current_contract_address();
        let balance = token_client.balance(&contract_address);

        // The transfer is the only step that can fail; do it before touching
        // the ledger so an error leaves every record in place.
        if balance > 0 {
            match token_client.try_transfer(&contract_address, &config.owner, &balance) {
                Ok(Ok(())) => {}
                _ => return Err(ContractError::TransferFailed),
            }
        }

        storage::clear_funders(&env, &funders);

        env.events().publish(
            (symbol_short!("withdrawn"), config.owner),
            (balance, funders.len()),
        );
        Ok(balance)
    }

    // ── View helpers ────────────────────────────────────────────────────

    /// Returns the USD value of `native_amount` at the current price.
    pub fn get_rate(env: Env, native_amount: i128) -> Result<i128, ContractError> {
        let config = storage::load_config(&env)?;
        let price = oracle::latest_price(&env, &config.price_feed)?;
        oracle::to_usd(native_amount, &price)
    }

    /// Returns the funder at `index`, in first-contribution order.
    pub fn funders(env: Env, index: u32) -> Result<Address, ContractError> {
        storage::load_funder(&env, index)
    }

    pub fn funder_count(env: Env) -> u32 {
        storage::funder_count(&env)
    }

    /// Returns the cumulative contribution of `funder`, zero if unknown.
    pub fn funder_to_amount_funded(env: Env, funder: Address) -> i128 {
        storage::amount_funded(&env, &funder).unwrap_or(0)
    }

    /// Returns the native balance currently held by the ledger.
    pub fn balance(env: Env) -> Result<i128, ContractError> {
        let config = storage::load_config(&env)?;
        let token_client = token::Client::new(&env, &config.native_token);
        Ok(token_client.balance(&env.current_contract_address()))
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(storage::load_config(&env)?.owner)
    }

    pub fn minimum_usd(env: Env) -> Result<i128, ContractError> {
        Ok(storage::load_config(&env)?.minimum_usd)
    }

    pub fn price_feed(env: Env) -> Result<Address, ContractError> {
        Ok(storage::load_config(&env)?.price_feed)
    }

    pub fn native_token(env: Env) -> Result<Address, ContractError> {
        Ok(storage::load_config(&env)?.native_token)
    }
}
