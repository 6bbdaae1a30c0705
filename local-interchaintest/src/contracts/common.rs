use std::collections::BTreeMap;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Decimal, Uint128, Uint64};

use crate::utils::constants::DEFAULT_TIMEOUT;

pub const PARTY_A: &str = "party_a";
pub const PARTY_B: &str = "party_b";

#[cw_serde]
pub struct InterchainCovenantParty {
    /// address of the receiver on destination chain
    pub party_receiver_addr: String,
    /// connection id to the party chain
    pub party_chain_connection_id: String,
    /// timeout in seconds
    pub ibc_transfer_timeout: Uint64,
    pub party_to_host_chain_channel_id: String,
    pub host_to_party_chain_channel_id: String,
    /// denom provided by the party on its native chain
    pub remote_chain_denom: String,
    /// authorized address of the party on neutron
    pub addr: String,
    /// denom provided by the party on neutron
    pub native_denom: String,
    pub contribution: Coin,
    pub denom_to_pfm_map: BTreeMap<String, PacketForwardMiddlewareConfig>,
    pub fallback_address: Option<String>,
}

#[cw_serde]
pub struct NativeCovenantParty {
    pub party_receiver_addr: String,
    pub native_denom: String,
    pub addr: String,
    pub contribution: Coin,
}

#[cw_serde]
pub enum CovenantPartyConfig {
    Interchain(InterchainCovenantParty),
    Native(NativeCovenantParty),
}

impl CovenantPartyConfig {
    pub fn get_final_receiver_address(&self) -> &str {
        match self {
            CovenantPartyConfig::Interchain(config) => &config.party_receiver_addr,
            CovenantPartyConfig::Native(config) => &config.party_receiver_addr,
        }
    }

    pub fn get_native_denom(&self) -> &str {
        match self {
            CovenantPartyConfig::Interchain(config) => &config.native_denom,
            CovenantPartyConfig::Native(config) => &config.native_denom,
        }
    }
}

#[cw_serde]
pub struct PacketForwardMiddlewareConfig {
    pub local_to_hop_chain_channel_id: String,
    pub hop_to_destination_chain_channel_id: String,
    pub hop_chain_receiver_address: String,
}

#[cw_serde]
pub struct SplitConfig {
    /// receiver address -> share of the split
    pub receivers: BTreeMap<String, Decimal>,
}

impl SplitConfig {
    /// Even split between two receivers.
    pub fn halves(a: &str, b: &str) -> Self {
        Self {
            receivers: BTreeMap::from([
                (a.to_string(), Decimal::percent(50)),
                (b.to_string(), Decimal::percent(50)),
            ]),
        }
    }

    /// Everything to one receiver, nothing to the other.
    pub fn all_to(receiver: &str, other: &str) -> Self {
        Self {
            receivers: BTreeMap::from([
                (receiver.to_string(), Decimal::one()),
                (other.to_string(), Decimal::zero()),
            ]),
        }
    }
}

#[cw_serde]
pub struct PoolPriceConfig {
    pub expected_spot_price: Decimal,
    pub acceptable_price_spread: Decimal,
}

#[cw_serde]
pub struct SingleSideLpLimits {
    pub asset_a_limit: Uint128,
    pub asset_b_limit: Uint128,
}

#[cw_serde]
pub enum ContractOperationModeConfig {
    Permissionless,
    Permissioned(Vec<String>),
}

#[cw_serde]
pub struct Timeouts {
    /// ica timeout in seconds
    pub ica_timeout: Uint64,
    /// ibc transfer timeout in seconds
    pub ibc_transfer_timeout: Uint64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            ica_timeout: Uint64::new(DEFAULT_TIMEOUT),
            ibc_transfer_timeout: Uint64::new(DEFAULT_TIMEOUT),
        }
    }
}

/// Accepted by every clocked contract.
#[cw_serde]
pub enum ClockMsg {
    Tick {},
}

#[cw_serde]
pub enum StateQuery {
    ContractState {},
}

/// Answered with `Option<String>` by contracts that take forwarded funds.
#[cw_serde]
pub enum DepositAddressQuery {
    DepositAddress {},
}
