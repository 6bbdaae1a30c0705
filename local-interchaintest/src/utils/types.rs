use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Chain configuration consumed by `local-ic start`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChainsVec {
    pub chains: Vec<ConfigChain>,
}

impl ChainsVec {
    pub fn chain(&self, name: &str) -> HarnessResult<&ConfigChain> {
        self.chains
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| HarnessError::UnknownChain(name.to_string()))
    }

    pub fn chain_mut(&mut self, name: &str) -> HarnessResult<&mut ConfigChain> {
        self.chains
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| HarnessError::UnknownChain(name.to_string()))
    }

    /// Chain id of the provider a consumer chain is linked to, if any.
    pub fn ics_provider_of(&self, consumer: &str) -> Option<&str> {
        self.chains
            .iter()
            .find(|c| c.name == consumer)
            .and_then(|c| c.ics_consumer_link.as_deref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_type: Option<String>,
    pub coin_type: i32,
    pub binary: String,
    pub bech32_prefix: String,
    pub denom: String,
    pub trusting_period: String,
    pub debugging: bool,
    pub block_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port_override: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ics_consumer_link: Option<String>,

    pub name: String,
    pub chain_id: String,
    pub docker_image: DockerImage,
    pub gas_prices: String,
    pub gas_adjustment: f64,
    pub number_vals: i32,
    pub number_node: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibc_paths: Option<Vec<String>>,
    pub genesis: Genesis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file_overrides: Option<Vec<ConfigFileOverrides>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DockerImage {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Genesis {
    #[serde(default)]
    pub modify: Vec<KVStore>,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_commands: Option<Vec<String>>,
}

/// A single `genesis.modify` entry: dotted key into the genesis document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KVStore {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenesisAccount {
    pub name: String,
    pub amount: String,
    pub address: String,
    pub mnemonic: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigFileOverrides {
    pub file: String,
    pub paths: serde_json::Value,
}
