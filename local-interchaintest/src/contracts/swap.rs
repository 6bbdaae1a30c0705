use std::collections::BTreeMap;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint64;
use cw_utils::Expiration;

use super::common::{ContractOperationModeConfig, CovenantPartyConfig, SplitConfig, Timeouts};

#[cw_serde]
pub struct InstantiateMsg {
    pub label: String,
    pub timeouts: Timeouts,
    pub contract_codes: SwapCovenantContractCodeIds,
    pub clock_tick_max_gas: Option<Uint64>,
    pub lockup_config: Expiration,
    pub party_a_config: CovenantPartyConfig,
    pub party_b_config: CovenantPartyConfig,
    pub splits: BTreeMap<String, SplitConfig>,
    pub fallback_split: Option<SplitConfig>,
    pub fallback_address: Option<String>,
    pub operation_mode: ContractOperationModeConfig,
}

#[cw_serde]
pub struct SwapCovenantContractCodeIds {
    pub ibc_forwarder_code: u64,
    pub interchain_router_code: u64,
    pub native_router_code: u64,
    pub splitter_code: u64,
    pub holder_code: u64,
    pub clock_code: u64,
}

#[cw_serde]
pub enum QueryMsg {
    ClockAddress {},
    HolderAddress {},
    SplitterAddress {},
    InterchainRouterAddress { party: String },
    IbcForwarderAddress { party: String },
    PartyDepositAddress { party: String },
}
