#![cfg(test)]

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::{FeedError, PriceFeedContract, PriceFeedContractClient, RoundData, VERSION};

extern crate std;

const DECIMALS: u32 = 8;
const INITIAL_ANSWER: i128 = 2_000 * 100_000_000;

fn setup_env() -> (Env, PriceFeedContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(PriceFeedContract, ());
    let client = PriceFeedContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    (env, client, admin)
}

fn setup_initialized() -> (Env, PriceFeedContractClient<'static>, Address) {
    let (env, client, admin) = setup_env();
    client.initialize(
        &admin,
        &DECIMALS,
        &INITIAL_ANSWER,
        &String::from_str(&env, "ETH / USD"),
    );
    (env, client, admin)
}

#[test]
fn test_initialize() {
    let (env, client, admin) = setup_initialized();

    assert_eq!(client.decimals(), DECIMALS);
    assert_eq!(client.admin(), admin);
    assert_eq!(client.description(), String::from_str(&env, "ETH / USD"));
    assert_eq!(client.latest_answer(), INITIAL_ANSWER);
    assert_eq!(client.version(), VERSION);

    let round = client.latest_round_data();
    assert_eq!(round.round_id, 1);
    assert_eq!(round.answered_in_round, 1);
}

#[test]
fn test_double_initialize_returns_error() {
    let (env, client, admin) = setup_initialized();

    let result = client.try_initialize(
        &admin,
        &DECIMALS,
        &INITIAL_ANSWER,
        &String::from_str(&env, "ETH / USD"),
    );

    assert_eq!(result.unwrap_err().unwrap(), FeedError::AlreadyInitialized);
}

#[test]
fn test_reads_before_initialize_fail() {
    let (_env, client, _admin) = setup_env();

    assert_eq!(
        client.try_latest_round_data().unwrap_err().unwrap(),
        FeedError::NotInitialized
    );
    assert_eq!(
        client.try_decimals().unwrap_err().unwrap(),
        FeedError::NotInitialized
    );
    assert_eq!(
        client.try_update_answer(&1).unwrap_err().unwrap(),
        FeedError::NotInitialized
    );
}

#[test]
fn test_update_answer_appends_round() {
    let (env, client, _admin) = setup_initialized();

    env.ledger().set_timestamp(1_000);
    let round_id = client.update_answer(&(3_000 * 100_000_000));

    assert_eq!(round_id, 2);
    assert_eq!(
        client.latest_round_data(),
        RoundData {
            round_id: 2,
            answer: 3_000 * 100_000_000,
            started_at: 1_000,
            updated_at: 1_000,
            answered_in_round: 2,
        }
    );

    // The first round is still queryable.
    assert_eq!(client.get_round_data(&1).answer, INITIAL_ANSWER);
}

#[test]
fn test_non_positive_answer_is_stored() {
    let (_env, client, _admin) = setup_initialized();

    client.update_answer(&0);
    assert_eq!(client.latest_answer(), 0);

    client.update_answer(&-5);
    assert_eq!(client.latest_answer(), -5);
}

#[test]
fn test_unknown_round_returns_error() {
    let (_env, client, _admin) = setup_initialized();

    let result = client.try_get_round_data(&42);
    assert_eq!(result.unwrap_err().unwrap(), FeedError::RoundNotFound);
}

#[test]
fn test_update_answer_emits_event() {
    let (env, client, _admin) = setup_initialized();

    env.ledger().set_timestamp(77);
    client.update_answer(&(1_500 * 100_000_000));

    let last_event = env.events().all().last().expect("no events found");
    assert_eq!(last_event.0, client.address);
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("answer").into_val(&env),
            2u64.into_val(&env),
        ]
    );

    let data: (i128, u64) = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(data, (1_500 * 100_000_000, 77));
}

#[test]
#[should_panic(expected = "Error(Auth, InvalidAction)")]
fn test_update_answer_requires_admin_auth() {
    let env = Env::default();
    let contract_id = env.register(PriceFeedContract, ());
    let client = PriceFeedContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    env.mock_all_auths();
    client.initialize(
        &admin,
        &DECIMALS,
        &INITIAL_ANSWER,
        &String::from_str(&env, "ETH / USD"),
    );

    // Drop the blanket mock so the admin signature is actually checked.
    env.set_auths(&[]);
    client.update_answer(&1);
}
