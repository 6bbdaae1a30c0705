//! Genesis patchers.
//!
//! Chain-specific parameters (ICA host allow-lists, consumer reward denoms,
//! governance periods) are set on the genesis document before the chains
//! start. A patch is a dotted key into the document plus the JSON value to
//! put there, the same shape local-ic reads from `genesis.modify`.

use log::info;
use serde_json::{json, Map, Value};

use crate::error::{HarnessError, HarnessResult};

use super::{
    constants::{GAIA_CHAIN, NEUTRON_ADMIN_ADDR, NEUTRON_CHAIN, STRIDE_CHAIN},
    ibc::get_ibc_denom,
    types::{ChainsVec, ConfigChain, KVStore},
};

pub const ICA_HOST_ALLOW_MESSAGES: &str =
    "app_state.interchainaccounts.host_genesis_state.params.allow_messages";
pub const CCV_CONSUMER_REWARD_DENOMS: &str = "app_state.ccvconsumer.params.reward_denoms";
pub const CCV_CONSUMER_PROVIDER_REWARD_DENOMS: &str =
    "app_state.ccvconsumer.params.provider_reward_denoms";
pub const GOV_VOTING_PERIOD: &str = "app_state.gov.params.voting_period";
pub const GOV_MAX_DEPOSIT_PERIOD: &str = "app_state.gov.params.max_deposit_period";
pub const FEEBURNER_TREASURY_ADDRESS: &str = "app_state.feeburner.params.treasury_address";

/// Consumer end of the first transfer channel opened after the ccv channel.
pub const CONSUMER_PROVIDER_TRANSFER_CHANNEL: &str = "channel-1";

/// A dotted-key patch; the same shape as a `genesis.modify` entry.
pub type GenesisKV = KVStore;

impl KVStore {
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

fn path_error(key: &str, reason: impl Into<String>) -> HarnessError {
    HarnessError::GenesisPath {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn split_key(key: &str) -> HarnessResult<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(path_error(key, "empty path segment"));
    }
    Ok(segments)
}

fn child_mut<'a>(
    node: &'a mut Value,
    segment: &str,
    key: &str,
    create: bool,
) -> HarnessResult<&'a mut Value> {
    match node {
        Value::Object(map) => {
            if create {
                Ok(map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new())))
            } else {
                map.get_mut(segment)
                    .ok_or_else(|| path_error(key, format!("`{segment}` not found")))
            }
        }
        Value::Array(items) => {
            let index: usize = segment
                .parse()
                .map_err(|_| path_error(key, format!("`{segment}` is not an array index")))?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or_else(|| path_error(key, format!("index {index} out of bounds ({len})")))
        }
        _ => Err(path_error(key, format!("cannot descend into `{segment}`"))),
    }
}

/// Sets `value` at the dotted `key`. Missing intermediate objects are created,
/// numeric segments index into existing arrays.
pub fn set_genesis_value(genesis: &mut Value, key: &str, value: Value) -> HarnessResult<()> {
    let segments = split_key(key)?;
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| path_error(key, "empty key"))?;

    let mut node = genesis;
    for segment in parents {
        node = child_mut(node, segment, key, true)?;
    }

    match node {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(_) => {
            *child_mut(node, last, key, false)? = value;
            Ok(())
        }
        _ => Err(path_error(key, format!("cannot set `{last}` on a scalar"))),
    }
}

pub fn get_genesis_value<'a>(genesis: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(genesis, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

pub fn apply_genesis_patches(genesis: &mut Value, patches: &[GenesisKV]) -> HarnessResult<()> {
    for patch in patches {
        set_genesis_value(genesis, &patch.key, patch.value.clone())?;
    }
    Ok(())
}

/// Records the patches in the chain's `genesis.modify` list so local-ic applies
/// them on start. A patch for a key that is already listed replaces it in place.
pub fn patch_chain_config(chain: &mut ConfigChain, patches: &[GenesisKV]) -> HarnessResult<()> {
    for patch in patches {
        split_key(&patch.key)?;
        match chain.genesis.modify.iter_mut().find(|kv| kv.key == patch.key) {
            Some(existing) => existing.value = patch.value.clone(),
            None => chain.genesis.modify.push(patch.clone()),
        }
    }
    Ok(())
}

pub fn ica_host_allow_messages(messages: &[&str]) -> GenesisKV {
    GenesisKV::new(ICA_HOST_ALLOW_MESSAGES, json!(messages))
}

pub fn ica_host_allow_all() -> GenesisKV {
    ica_host_allow_messages(&["*"])
}

pub fn ccv_consumer_reward_denoms(denoms: &[&str]) -> GenesisKV {
    GenesisKV::new(CCV_CONSUMER_REWARD_DENOMS, json!(denoms))
}

pub fn ccv_consumer_provider_reward_denoms(denoms: &[&str]) -> GenesisKV {
    GenesisKV::new(CCV_CONSUMER_PROVIDER_REWARD_DENOMS, json!(denoms))
}

pub fn gov_voting_period(period: &str) -> GenesisKV {
    GenesisKV::new(GOV_VOTING_PERIOD, period)
}

pub fn gov_max_deposit_period(period: &str) -> GenesisKV {
    GenesisKV::new(GOV_MAX_DEPOSIT_PERIOD, period)
}

pub fn feeburner_treasury_address(address: &str) -> GenesisKV {
    GenesisKV::new(FEEBURNER_TREASURY_ADDRESS, address)
}

/// Neutron runs as an ICS consumer of gaia and hosts the covenant contracts.
pub fn neutron_genesis_patches(
    native_denom: &str,
    provider_denom_on_neutron: &str,
    treasury: &str,
) -> Vec<GenesisKV> {
    vec![
        ccv_consumer_reward_denoms(&[native_denom]),
        ccv_consumer_provider_reward_denoms(&[provider_denom_on_neutron]),
        feeburner_treasury_address(treasury),
    ]
}

/// Gaia hosts the party interchain accounts.
pub fn gaia_genesis_patches() -> Vec<GenesisKV> {
    vec![
        ica_host_allow_all(),
        gov_voting_period("15s"),
        gov_max_deposit_period("10s"),
    ]
}

/// Stride hosts the liquid staker interchain account.
pub fn stride_genesis_patches() -> Vec<GenesisKV> {
    vec![
        ica_host_allow_messages(&[
            "/ibc.applications.transfer.v1.MsgTransfer",
            "/cosmos.bank.v1beta1.MsgSend",
            "/stride.stakeibc.MsgLiquidStake",
        ]),
        gov_voting_period("15s"),
    ]
}

/// Adds the preset patches of every known chain in `config` to its
/// `genesis.modify` list. Chains without presets are left untouched.
pub fn patch_known_chains(config: &mut ChainsVec) -> HarnessResult<()> {
    let provider_denom = config
        .ics_provider_of(NEUTRON_CHAIN)
        .and_then(|provider_id| config.chains.iter().find(|c| c.chain_id == provider_id))
        .map(|provider| get_ibc_denom(&provider.denom, CONSUMER_PROVIDER_TRANSFER_CHANNEL));

    for chain in &mut config.chains {
        let patches = match chain.name.as_str() {
            NEUTRON_CHAIN => {
                let provider_denom = provider_denom.as_deref().unwrap_or(&chain.denom);
                neutron_genesis_patches(&chain.denom, provider_denom, NEUTRON_ADMIN_ADDR)
            }
            GAIA_CHAIN => gaia_genesis_patches(),
            STRIDE_CHAIN => stride_genesis_patches(),
            _ => continue,
        };
        info!("patching genesis of {} ({} entries)", chain.name, patches.len());
        patch_chain_config(chain, &patches)?;
    }
    Ok(())
}
