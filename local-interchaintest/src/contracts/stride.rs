use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Uint128, Uint64};

use super::common::ContractOperationModeConfig;

pub const STATE_INSTANTIATED: &str = "instantiated";
pub const STATE_ICA_CREATED: &str = "ica_created";

#[cw_serde]
pub struct InstantiateMsg {
    /// transfer channel on stride towards neutron
    pub stride_neutron_ibc_transfer_channel_id: String,
    /// connection on neutron towards stride, the ICA is opened over it
    pub neutron_stride_ibc_connection_id: String,
    /// contract whose deposit address receives the liquid staked tokens
    pub next_contract: String,
    pub ls_denom: String,
    pub ica_timeout: Uint64,
    pub ibc_transfer_timeout: Uint64,
    pub op_mode_cfg: ContractOperationModeConfig,
}

#[cw_serde]
pub enum ExecuteMsg {
    Tick {},
    /// move `amount` of the ls denom from the ICA to the next contract
    Transfer { amount: Uint128 },
}

#[cw_serde]
pub enum QueryMsg {
    ContractState {},
    IcaAddress {},
    DepositAddress {},
    NextMemo {},
}

/// Memo that makes stride liquid stake an incoming transfer for `receiver`.
/// The staker answers `DepositAddress {}` with this memo, JSON encoded.
#[cw_serde]
pub struct AutopilotMemo {
    pub autopilot: Autopilot,
}

#[cw_serde]
pub struct Autopilot {
    pub receiver: String,
    pub stakeibc: Stakeibc,
}

#[cw_serde]
pub struct Stakeibc {
    pub action: String,
    pub stride_address: String,
}

impl AutopilotMemo {
    pub fn liquid_stake(stride_address: &str) -> Self {
        Self {
            autopilot: Autopilot {
                receiver: stride_address.to_string(),
                stakeibc: Stakeibc {
                    action: "LiquidStake".to_string(),
                    stride_address: stride_address.to_string(),
                },
            },
        }
    }
}
