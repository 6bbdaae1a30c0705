use localic_std::transactions::ChainRequestBuilder;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};

use super::file_system::pretty_print;

/// Entry of the validator list file read by `stakeibc add-validators`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StakeibcValidator {
    pub name: String,
    pub address: String,
    pub weight: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StakeibcValidators {
    pub validators: Vec<StakeibcValidator>,
}

pub fn register_stride_host_zone(
    rb: &ChainRequestBuilder,
    connection_id: &str,
    host_denom: &str,
    bech_32_prefix: &str,
    ibc_denom: &str,
    channel_id: &str,
    from_key: &str,
) -> HarnessResult<Value> {
    let cmd = format!(
        "tx stakeibc register-host-zone {connection_id} {host_denom} {bech_32_prefix} {ibc_denom} {channel_id} 1 --from={from_key} --gas auto --gas-adjustment 1.3 --output=json"
    );
    info!("registering host zone {host_denom} over {connection_id}");
    Ok(rb.tx(&cmd, true)?)
}

pub fn query_host_zone(rb: &ChainRequestBuilder, chain_id: &str) -> bool {
    let query_cmd = format!("stakeibc show-host-zone {chain_id} --output=json");
    let host_zone_query_response = rb.q(&query_cmd, false);
    debug!("host zone {chain_id}:");
    pretty_print(&host_zone_query_response);

    host_zone_query_response["host_zone"].is_object()
}

/// Validators stride already tracks for the `chain_id` host zone.
pub fn query_stakeibc_validators(
    rb: &ChainRequestBuilder,
    chain_id: &str,
) -> HarnessResult<StakeibcValidators> {
    let response = rb.q(
        &format!("stakeibc show-validators {chain_id} --output=json"),
        false,
    );
    parse_stakeibc_validators(&rb.chain_id, &response)
}

fn parse_stakeibc_validators(chain_id: &str, response: &Value) -> HarnessResult<StakeibcValidators> {
    match response.get("validators") {
        None | Some(Value::Null) => Ok(StakeibcValidators::default()),
        Some(Value::Array(entries)) => {
            let validators = entries
                .iter()
                .map(|v| StakeibcValidator {
                    name: v["name"].as_str().unwrap_or_default().to_string(),
                    address: v["address"].as_str().unwrap_or_default().to_string(),
                    weight: parse_u64(&v["weight"]).unwrap_or_default(),
                })
                .collect();
            Ok(StakeibcValidators { validators })
        }
        Some(other) => Err(HarnessError::UnexpectedResponse(
            chain_id.to_string(),
            format!("validators is not a list: {other}"),
        )),
    }
}

/// Cosmos JSON renders 64-bit integers as strings.
pub fn parse_u64(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

/// `validators_file` is a path inside the stride container.
pub fn add_stakeibc_validators(
    rb: &ChainRequestBuilder,
    chain_id: &str,
    validators_file: &str,
    from_key: &str,
) -> HarnessResult<Value> {
    let cmd = format!(
        "tx stakeibc add-validators {chain_id} {validators_file} --from={from_key} --gas auto --gas-adjustment 1.3 --output=json"
    );
    Ok(rb.tx(&cmd, true)?)
}
