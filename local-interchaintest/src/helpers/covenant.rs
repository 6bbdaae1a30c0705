use localic_std::transactions::ChainRequestBuilder;
use serde::Serialize;
use serde_json::Value;

use crate::{
    contracts::{
        common::{PARTY_A, PARTY_B},
        swap, two_party_pol,
    },
    error::{HarnessError, HarnessResult},
};

use super::common::query_contract;

/// An instantiated covenant and the chain it lives on.
pub enum Covenant<'a> {
    Swap {
        rb: &'a ChainRequestBuilder,
        contract_address: &'a str,
    },
    TwoPartyPol {
        rb: &'a ChainRequestBuilder,
        contract_address: &'a str,
    },
}

impl<'a> Covenant<'a> {
    fn get_rb(&self) -> &ChainRequestBuilder {
        match self {
            Covenant::Swap { rb, .. } | Covenant::TwoPartyPol { rb, .. } => rb,
        }
    }

    fn get_contract_address(&self) -> &str {
        match self {
            Covenant::Swap {
                contract_address, ..
            }
            | Covenant::TwoPartyPol {
                contract_address, ..
            } => contract_address,
        }
    }

    /// A null answer reads as an empty address.
    fn query<T: Serialize>(&self, query_msg: &T) -> HarnessResult<String> {
        match query_contract(self.get_rb(), self.get_contract_address(), query_msg)? {
            Value::String(addr) => Ok(addr),
            Value::Null => Ok(String::new()),
            other => Err(HarnessError::UnexpectedResponse(
                self.get_contract_address().to_string(),
                format!("expected an address, got {other}"),
            )),
        }
    }

    fn unsupported(&self, what: &str) -> HarnessError {
        HarnessError::UnexpectedResponse(
            self.get_contract_address().to_string(),
            format!("this covenant has no {what}"),
        )
    }

    pub fn query_clock_address(&self) -> HarnessResult<String> {
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::ClockAddress {}),
            Covenant::TwoPartyPol { .. } => self.query(&two_party_pol::QueryMsg::ClockAddress {}),
        }
    }

    pub fn query_holder_address(&self) -> HarnessResult<String> {
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::HolderAddress {}),
            Covenant::TwoPartyPol { .. } => self.query(&two_party_pol::QueryMsg::HolderAddress {}),
        }
    }

    pub fn query_splitter_address(&self) -> HarnessResult<String> {
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::SplitterAddress {}),
            Covenant::TwoPartyPol { .. } => Err(self.unsupported("splitter")),
        }
    }

    pub fn query_liquid_pooler_address(&self) -> HarnessResult<String> {
        match self {
            Covenant::Swap { .. } => Err(self.unsupported("liquid pooler")),
            Covenant::TwoPartyPol { .. } => {
                self.query(&two_party_pol::QueryMsg::LiquidPoolerAddress {})
            }
        }
    }

    /// Native parties are routed by a native router, queried the same way.
    pub fn query_interchain_router_address(&self, party: &str) -> HarnessResult<String> {
        let party = party.to_string();
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::InterchainRouterAddress { party }),
            Covenant::TwoPartyPol { .. } => {
                self.query(&two_party_pol::QueryMsg::InterchainRouterAddress { party })
            }
        }
    }

    /// Empty for native parties, which have no forwarder.
    pub fn query_ibc_forwarder_address(&self, party: &str) -> HarnessResult<String> {
        let party = party.to_string();
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::IbcForwarderAddress { party }),
            Covenant::TwoPartyPol { .. } => {
                self.query(&two_party_pol::QueryMsg::IbcForwarderAddress { party })
            }
        }
    }

    pub fn query_deposit_address(&self, party: &str) -> HarnessResult<String> {
        let party = party.to_string();
        match self {
            Covenant::Swap { .. } => self.query(&swap::QueryMsg::PartyDepositAddress { party }),
            Covenant::TwoPartyPol { .. } => {
                self.query(&two_party_pol::QueryMsg::PartyDepositAddress { party })
            }
        }
    }
}

/// Addresses every two-party covenant instantiates.
#[derive(Debug, Clone)]
pub struct PartyContracts {
    pub clock: String,
    pub holder: String,
    pub party_a_router: String,
    pub party_b_router: String,
    /// empty for a native party
    pub party_a_forwarder: String,
    pub party_b_forwarder: String,
}

impl PartyContracts {
    pub fn query(covenant: &Covenant) -> HarnessResult<Self> {
        Ok(Self {
            clock: covenant.query_clock_address()?,
            holder: covenant.query_holder_address()?,
            party_a_router: covenant.query_interchain_router_address(PARTY_A)?,
            party_b_router: covenant.query_interchain_router_address(PARTY_B)?,
            party_a_forwarder: covenant.query_ibc_forwarder_address(PARTY_A)?,
            party_b_forwarder: covenant.query_ibc_forwarder_address(PARTY_B)?,
        })
    }

    /// Contracts that pay gas, forwarders only when present.
    pub fn fundable(&self) -> Vec<&str> {
        [
            &self.clock,
            &self.holder,
            &self.party_a_router,
            &self.party_b_router,
            &self.party_a_forwarder,
            &self.party_b_forwarder,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|a| !a.is_empty())
        .collect()
    }
}
