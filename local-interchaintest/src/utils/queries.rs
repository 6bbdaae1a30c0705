use localic_std::transactions::ChainRequestBuilder;
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};

use super::stride::{parse_u64, StakeibcValidator};

/// Latest block height reported by the node's `status` command.
pub fn query_block_height(rb: &ChainRequestBuilder) -> HarnessResult<u64> {
    let status = rb.binary("status", false);
    parse_block_height(&status).ok_or_else(|| {
        HarnessError::UnexpectedResponse(rb.chain_id.clone(), format!("no block height in {status}"))
    })
}

fn parse_block_height(status: &Value) -> Option<u64> {
    // older nodes capitalise the section name
    let sync_info = status
        .get("sync_info")
        .or_else(|| status.get("SyncInfo"))?;
    parse_u64(&sync_info["latest_block_height"])
}

/// Bonded validators of a chain, named `val1`, `val2`... in query order and
/// weighted by their voting power.
pub fn query_validator_set(rb: &ChainRequestBuilder) -> HarnessResult<Vec<StakeibcValidator>> {
    let response = rb.q("staking validators --output=json", false);
    parse_validator_set(&rb.chain_id, &response)
}

fn parse_validator_set(chain_id: &str, response: &Value) -> HarnessResult<Vec<StakeibcValidator>> {
    let Some(entries) = response["validators"].as_array() else {
        return Err(HarnessError::UnexpectedResponse(
            chain_id.to_string(),
            format!("no validators in {response}"),
        ));
    };

    let mut validators = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry["status"].as_str() != Some("BOND_STATUS_BONDED") {
            continue;
        }
        let Some(address) = entry["operator_address"].as_str() else {
            continue;
        };
        validators.push(StakeibcValidator {
            name: format!("val{}", validators.len() + 1),
            address: address.to_string(),
            weight: parse_u64(&entry["tokens"]).map_or(1, |tokens| (tokens / 1_000_000).max(1)),
        });
    }

    Ok(validators)
}
