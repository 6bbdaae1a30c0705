use cosmwasm_std::Coin;
use localic_std::transactions::ChainRequestBuilder;
use log::info;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::HarnessResult;

use super::constants::TRANSFER_PORT;

const CHANNEL_PREFIX: &str = "channel-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenomTrace {
    pub path: String,
    pub base_denom: String,
}

impl DenomTrace {
    pub fn ibc_denom(&self) -> String {
        if !self.path.is_empty() {
            return format!("ibc/{}", self.hash());
        }
        self.base_denom.clone()
    }

    fn hash(&self) -> String {
        let trace = format!("{}/{}", self.path, self.base_denom);
        let mut hasher = Sha256::new();
        hasher.update(trace.as_bytes());
        hex::encode_upper(hasher.finalize())
    }
}

pub fn get_ibc_denom(native_denom: &str, channel_id: &str) -> String {
    let prefixed_denom = get_prefixed_denom(TRANSFER_PORT, channel_id, native_denom);

    parse_denom_trace(&prefixed_denom).ibc_denom()
}

/// `channel_trace` is ordered from the receiving chain back towards the origin.
pub fn get_multihop_ibc_denom(native_denom: &str, channel_trace: &[&str]) -> String {
    let mut port_channel_trace = vec![];

    for channel in channel_trace {
        port_channel_trace.push(TRANSFER_PORT);
        port_channel_trace.push(channel);
    }

    let prefixed_denom = format!("{}/{}", port_channel_trace.join("/"), native_denom);

    parse_denom_trace(&prefixed_denom).ibc_denom()
}

pub fn get_prefixed_denom(port_id: &str, channel_id: &str, native_denom: &str) -> String {
    format!("{port_id}/{channel_id}/{native_denom}")
}

pub fn parse_denom_trace(raw_denom: &str) -> DenomTrace {
    let denom_split = raw_denom.split('/').collect::<Vec<&str>>();

    if denom_split.len() == 1 {
        return DenomTrace {
            path: String::new(),
            base_denom: raw_denom.to_string(),
        };
    }

    let (path, base_denom) = extract_path_and_base_from_full_denom(&denom_split);

    DenomTrace { path, base_denom }
}

/// Consumes leading `port/channel-N` pairs as the path, the remainder is the base denom.
pub fn extract_path_and_base_from_full_denom(full_denom_items: &[&str]) -> (String, String) {
    let mut path: Vec<&str> = Vec::new();

    let length = full_denom_items.len();
    let mut i = 0;
    while i + 2 < length && full_denom_items[i + 1].starts_with(CHANNEL_PREFIX) {
        path.push(full_denom_items[i]);
        path.push(full_denom_items[i + 1]);
        i += 2;
    }

    (path.join("/"), full_denom_items[i..].join("/"))
}

pub fn ibc_send(
    rb: &ChainRequestBuilder,
    from_key: &str,
    to_address: &str,
    token: Coin,
    fee: Coin,
    channel: &str,
    memo: Option<&str>,
) -> HarnessResult<Value> {
    let str_coin = format!("{}{}", token.amount, token.denom);
    let fee_coin = format!("{}{}", fee.amount, fee.denom);
    let mut cmd = format!(
        "tx ibc-transfer transfer {TRANSFER_PORT} {channel} {to_address} {str_coin} --fees={fee_coin} --from={from_key} --output=json"
    );
    // local-ic splits the command on whitespace, memos must be compact
    if let Some(memo) = memo {
        cmd.push_str(&format!(" --memo {memo}"));
    }
    info!("submitting IBC transaction: {cmd}");

    Ok(rb.tx(&cmd, true)?)
}
