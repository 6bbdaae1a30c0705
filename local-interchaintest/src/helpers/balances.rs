use cosmwasm_std::{Coin, Uint128};
use localic_std::{modules::bank, transactions::ChainRequestBuilder};
use log::info;

use crate::error::HarnessResult;

pub fn balance_of(balances: &[Coin], denom: &str) -> Uint128 {
    balances
        .iter()
        .filter(|c| c.denom == denom)
        .map(|c| c.amount)
        .sum()
}

pub fn has_at_least(balances: &[Coin], denom: &str, amount: u128) -> bool {
    balance_of(balances, denom) >= Uint128::new(amount)
}

pub fn has_denom(balances: &[Coin], denom: &str) -> bool {
    balances.iter().any(|c| c.denom == denom && !c.amount.is_zero())
}

/// Returns every non-native balance of the `key` account at `source` to
/// `destination` on the same chain. Leaves accounts clean for the next suite.
pub fn send_non_native_balances(
    rb: &ChainRequestBuilder,
    key: &str,
    source: &str,
    destination: &str,
    native_denom: &str,
    fee: &Coin,
) -> HarnessResult<Vec<Coin>> {
    let to_send: Vec<Coin> = bank::get_balance(rb, source)
        .into_iter()
        .filter(|c| c.denom != native_denom && !c.amount.is_zero())
        .collect();

    for coin in &to_send {
        info!("returning {coin} from {source} to {destination}");
        bank::send(rb, key, destination, std::slice::from_ref(coin), fee)?;
    }

    Ok(to_send)
}
