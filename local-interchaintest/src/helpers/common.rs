use cosmwasm_std::Coin;
use localic_std::{
    modules::{
        bank::send,
        cosmwasm::{contract_execute, contract_query},
    },
    transactions::ChainRequestBuilder,
};
use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::{
    contracts::common::{ClockMsg, DepositAddressQuery, StateQuery},
    error::{HarnessError, HarnessResult},
    utils::constants::EXECUTE_FLAGS,
};

/// Runs a smart query and returns its `data` field.
pub fn query_contract<T: Serialize>(
    rb: &ChainRequestBuilder,
    contract_address: &str,
    msg: &T,
) -> HarnessResult<Value> {
    let response = contract_query(rb, contract_address, &serde_json::to_string(msg)?);
    match response.get("data") {
        Some(data) => Ok(data.clone()),
        None => Err(HarnessError::UnexpectedResponse(
            contract_address.to_string(),
            response.to_string(),
        )),
    }
}

/// Like [`query_contract`] for queries answering with a plain string.
pub fn query_contract_string<T: Serialize>(
    rb: &ChainRequestBuilder,
    contract_address: &str,
    msg: &T,
) -> HarnessResult<String> {
    match query_contract(rb, contract_address, msg)? {
        Value::String(s) => Ok(s),
        other => Err(HarnessError::UnexpectedResponse(
            contract_address.to_string(),
            format!("expected a string, got {other}"),
        )),
    }
}

pub fn query_contract_state(rb: &ChainRequestBuilder, contract_address: &str) -> HarnessResult<String> {
    query_contract_string(rb, contract_address, &StateQuery::ContractState {})
}

/// Address a contract takes deposits at. Errors while it answers with none,
/// as a contract forwarding to it would.
pub fn query_deposit_address(
    rb: &ChainRequestBuilder,
    contract_address: &str,
) -> HarnessResult<String> {
    let response = query_contract(rb, contract_address, &DepositAddressQuery::DepositAddress {})?;
    deposit_address(contract_address, response)
}

fn deposit_address(contract_address: &str, response: Value) -> HarnessResult<String> {
    match response {
        Value::String(addr) if !addr.is_empty() => Ok(addr),
        other => Err(HarnessError::UnexpectedResponse(
            contract_address.to_string(),
            format!("no deposit address: {other}"),
        )),
    }
}

pub fn execute<T: Serialize>(
    rb: &ChainRequestBuilder,
    contract_address: &str,
    from_key: &str,
    msg: &T,
    flags: &str,
) -> HarnessResult<()> {
    let msg = serde_json::to_string(msg)?;
    debug!("execute on {contract_address}: {msg}");
    contract_execute(rb, contract_address, from_key, &msg, flags)?;
    Ok(())
}

pub fn tick(rb: &ChainRequestBuilder, from_key: &str, contract_address: &str) -> HarnessResult<()> {
    execute(rb, contract_address, from_key, &ClockMsg::Tick {}, EXECUTE_FLAGS)
}

/// Sends `amount` to each address from `from_key`, paying `fee` per send.
pub fn fund_addresses(
    rb: &ChainRequestBuilder,
    from_key: &str,
    addresses: &[&str],
    amount: &Coin,
    fee: &Coin,
) -> HarnessResult<()> {
    for address in addresses.iter().filter(|a| !a.is_empty()) {
        info!("funding {address} with {amount}");
        send(rb, from_key, address, std::slice::from_ref(amount), fee)?;
    }
    Ok(())
}
