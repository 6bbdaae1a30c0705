use std::collections::BTreeMap;

use astroport::factory::PairType;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Decimal, Uint64};
use cw_utils::Expiration;

use super::common::{
    ContractOperationModeConfig, CovenantPartyConfig, PoolPriceConfig, SingleSideLpLimits,
    SplitConfig, Timeouts,
};

#[cw_serde]
pub struct InstantiateMsg {
    pub label: String,
    pub timeouts: Timeouts,
    pub contract_codes: CovenantContractCodeIds,
    pub clock_tick_max_gas: Option<Uint64>,
    pub lockup_config: Expiration,
    pub party_a_config: CovenantPartyConfig,
    pub party_b_config: CovenantPartyConfig,
    pub covenant_type: CovenantType,
    pub ragequit_config: Option<RagequitConfig>,
    pub deposit_deadline: Expiration,
    pub party_a_share: Decimal,
    pub party_b_share: Decimal,
    pub pool_price_config: PoolPriceConfig,
    pub splits: BTreeMap<String, SplitConfig>,
    pub fallback_split: Option<SplitConfig>,
    pub emergency_committee: Option<String>,
    pub liquid_pooler_config: LiquidPoolerConfig,
    pub fallback_address: Option<String>,
    pub operation_mode: ContractOperationModeConfig,
}

#[cw_serde]
pub struct CovenantContractCodeIds {
    pub ibc_forwarder_code: u64,
    pub holder_code: u64,
    pub clock_code: u64,
    pub interchain_router_code: u64,
    pub native_router_code: u64,
    pub liquid_pooler_code: u64,
}

#[cw_serde]
pub enum LiquidPoolerConfig {
    Astroport(AstroportLiquidPoolerConfig),
}

#[cw_serde]
pub struct AstroportLiquidPoolerConfig {
    pub pool_pair_type: PairType,
    pub pool_address: String,
    pub asset_a_denom: String,
    pub asset_b_denom: String,
    pub single_side_lp_limits: SingleSideLpLimits,
}

#[cw_serde]
pub enum CovenantType {
    /// liquidity is split by the configured party shares
    Share,
    /// each party gets back the side it contributed
    Side,
}

#[cw_serde]
pub enum RagequitConfig {
    Disabled,
    Enabled(RagequitTerms),
}

#[cw_serde]
pub struct RagequitTerms {
    pub penalty: Decimal,
    /// set by the holder once a party ragequits
    pub state: Option<serde_json::Value>,
}

#[cw_serde]
pub enum QueryMsg {
    ClockAddress {},
    HolderAddress {},
    IbcForwarderAddress { party: String },
    InterchainRouterAddress { party: String },
    LiquidPoolerAddress {},
    PartyDepositAddress { party: String },
}

/// Two-party POL holder.
#[cw_serde]
pub enum HolderExecuteMsg {
    Ragequit {},
    Claim {},
}
