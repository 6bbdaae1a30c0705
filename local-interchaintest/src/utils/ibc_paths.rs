//! Pairing of IBC clients, connections and channels between two chains.
//!
//! Every chain only knows its own end of a link. The helpers here match the
//! two ends by cross-checking identifiers and counterparty fields, and find
//! newly created links by diffing snapshots taken before and after a relayer
//! command.

use std::collections::HashSet;

use localic_std::transactions::ChainRequestBuilder;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};

use super::constants::{
    CONSUMER_PORT, ORDER_ORDERED, ORDER_UNORDERED, PROVIDER_PORT, STATE_OPEN, TRANSFER_PORT,
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IbcChannel {
    pub channel_id: String,
    pub port_id: String,
    pub state: String,
    pub ordering: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub connection_hops: Vec<String>,
    pub counterparty: ChannelCounterparty,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChannelCounterparty {
    pub port_id: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IbcConnection {
    pub id: String,
    pub client_id: String,
    pub state: String,
    pub counterparty: ConnectionCounterparty,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ConnectionCounterparty {
    pub client_id: String,
    #[serde(default)]
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IbcClient {
    pub client_id: String,
    /// chain id tracked by the client, absent for non-tendermint clients
    pub counterparty_chain_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseChannelResult {
    pub index: usize,
    pub channel_id: String,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseConnectionResult {
    pub index: usize,
    pub connection_id: String,
    pub client_id: String,
}

impl IbcChannel {
    fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    fn first_hop(&self) -> Option<&str> {
        self.connection_hops.first().map(String::as_str)
    }

    fn is_counterparty_of(&self, other: &IbcChannel) -> bool {
        self.channel_id == other.counterparty.channel_id
            && other.channel_id == self.counterparty.channel_id
            && self.port_id == other.counterparty.port_id
            && other.port_id == self.counterparty.port_id
    }
}

fn find_pairwise_channels(
    a: &[IbcChannel],
    b: &[IbcChannel],
    kind: &str,
    a_filter: impl Fn(&IbcChannel) -> bool,
    b_filter: impl Fn(&IbcChannel) -> bool,
) -> HarnessResult<(PairwiseChannelResult, PairwiseChannelResult)> {
    for (a_i, a_chan) in a.iter().enumerate() {
        if !a_chan.is_open() || !a_filter(a_chan) {
            continue;
        }
        let Some(a_conn) = a_chan.first_hop() else {
            continue;
        };
        for (b_i, b_chan) in b.iter().enumerate() {
            if !b_chan.is_open() || !b_filter(b_chan) || !a_chan.is_counterparty_of(b_chan) {
                continue;
            }
            let Some(b_conn) = b_chan.first_hop() else {
                continue;
            };

            return Ok((
                PairwiseChannelResult {
                    index: a_i,
                    channel_id: a_chan.channel_id.clone(),
                    connection_id: a_conn.to_string(),
                },
                PairwiseChannelResult {
                    index: b_i,
                    channel_id: b_chan.channel_id.clone(),
                    connection_id: b_conn.to_string(),
                },
            ));
        }
    }

    Err(HarnessError::NoPairwiseMatch(kind.to_string()))
}

pub fn find_pairwise_transfer_channel_ids(
    a: &[IbcChannel],
    b: &[IbcChannel],
) -> HarnessResult<(PairwiseChannelResult, PairwiseChannelResult)> {
    let is_transfer = |c: &IbcChannel| c.port_id == TRANSFER_PORT && c.ordering == ORDER_UNORDERED;
    find_pairwise_channels(a, b, "transfer channels", is_transfer, is_transfer)
}

pub fn find_pairwise_ccv_channel_ids(
    provider_channels: &[IbcChannel],
    consumer_channels: &[IbcChannel],
) -> HarnessResult<(PairwiseChannelResult, PairwiseChannelResult)> {
    find_pairwise_channels(
        provider_channels,
        consumer_channels,
        "ccv channels",
        |c| c.port_id == PROVIDER_PORT && c.ordering == ORDER_ORDERED,
        |c| c.port_id == CONSUMER_PORT && c.ordering == ORDER_ORDERED,
    )
}

pub fn find_pairwise_connection_ids(
    a: &[IbcConnection],
    b: &[IbcConnection],
) -> HarnessResult<(PairwiseConnectionResult, PairwiseConnectionResult)> {
    for (a_i, a_conn) in a.iter().enumerate() {
        if a_conn.state != STATE_OPEN {
            continue;
        }
        for (b_i, b_conn) in b.iter().enumerate() {
            if b_conn.state == STATE_OPEN
                && a_conn.id == b_conn.counterparty.connection_id
                && b_conn.id == a_conn.counterparty.connection_id
                && a_conn.client_id == b_conn.counterparty.client_id
                && b_conn.client_id == a_conn.counterparty.client_id
            {
                return Ok((
                    PairwiseConnectionResult {
                        index: a_i,
                        connection_id: a_conn.id.clone(),
                        client_id: a_conn.client_id.clone(),
                    },
                    PairwiseConnectionResult {
                        index: b_i,
                        connection_id: b_conn.id.clone(),
                        client_id: b_conn.client_id.clone(),
                    },
                ));
            }
        }
    }

    Err(HarnessError::NoPairwiseMatch("connections".to_string()))
}

fn new_items<T: Clone>(before: &[T], after: &[T], id: impl Fn(&T) -> &str) -> Vec<T> {
    let known: HashSet<&str> = before.iter().map(&id).collect();
    after
        .iter()
        .filter(|item| !known.contains(id(*item)))
        .cloned()
        .collect()
}

/// Channels present in `after` but not in `before`, in `after` order.
pub fn new_channels(before: &[IbcChannel], after: &[IbcChannel]) -> Vec<IbcChannel> {
    new_items(before, after, |c| c.channel_id.as_str())
}

pub fn new_channel_ids(before: &[IbcChannel], after: &[IbcChannel]) -> Vec<String> {
    new_channels(before, after)
        .into_iter()
        .map(|c| c.channel_id)
        .collect()
}

pub fn new_connections(before: &[IbcConnection], after: &[IbcConnection]) -> Vec<IbcConnection> {
    new_items(before, after, |c| c.id.as_str())
}

pub fn new_connection_ids(before: &[IbcConnection], after: &[IbcConnection]) -> Vec<String> {
    new_connections(before, after)
        .into_iter()
        .map(|c| c.id)
        .collect()
}

pub fn new_client_ids(before: &[IbcClient], after: &[IbcClient]) -> Vec<String> {
    new_items(before, after, |c| c.client_id.as_str())
        .into_iter()
        .map(|c| c.client_id)
        .collect()
}

/// Pairs the transfer channels that appeared on both chains between two
/// snapshots. Channels open before the first snapshot are never returned.
pub fn pair_new_transfer_channels(
    src_before: &[IbcChannel],
    src_after: &[IbcChannel],
    dst_before: &[IbcChannel],
    dst_after: &[IbcChannel],
) -> HarnessResult<(PairwiseChannelResult, PairwiseChannelResult)> {
    find_pairwise_transfer_channel_ids(
        &new_channels(src_before, src_after),
        &new_channels(dst_before, dst_after),
    )
}

pub fn pair_new_connections(
    src_before: &[IbcConnection],
    src_after: &[IbcConnection],
    dst_before: &[IbcConnection],
    dst_after: &[IbcConnection],
) -> HarnessResult<(PairwiseConnectionResult, PairwiseConnectionResult)> {
    find_pairwise_connection_ids(
        &new_connections(src_before, src_after),
        &new_connections(dst_before, dst_after),
    )
}

pub fn clients_for_chain<'a>(clients: &'a [IbcClient], chain_id: &str) -> Vec<&'a IbcClient> {
    clients
        .iter()
        .filter(|c| c.counterparty_chain_id.as_deref() == Some(chain_id))
        .collect()
}

fn list_field<T: serde::de::DeserializeOwned>(
    chain_id: &str,
    response: &Value,
    field: &str,
) -> HarnessResult<Vec<T>> {
    match response.get(field) {
        Some(Value::Null) => Ok(vec![]),
        Some(list) => Ok(serde_json::from_value(list.clone())?),
        None => Err(HarnessError::UnexpectedResponse(
            chain_id.to_string(),
            format!("missing `{field}` in {response}"),
        )),
    }
}

pub fn query_channels(rb: &ChainRequestBuilder) -> HarnessResult<Vec<IbcChannel>> {
    let response = rb.q("ibc channel channels --output=json", false);
    list_field(&rb.chain_id, &response, "channels")
}

pub fn query_connections(rb: &ChainRequestBuilder) -> HarnessResult<Vec<IbcConnection>> {
    let response = rb.q("ibc connection connections --output=json", false);
    list_field(&rb.chain_id, &response, "connections")
}

pub fn query_clients(rb: &ChainRequestBuilder) -> HarnessResult<Vec<IbcClient>> {
    let response = rb.q("ibc client states --output=json", false);
    let states: Vec<Value> = list_field(&rb.chain_id, &response, "client_states")?;
    Ok(states.iter().filter_map(parse_client_state).collect())
}

fn parse_client_state(state: &Value) -> Option<IbcClient> {
    let client_id = state["client_id"].as_str()?.to_string();
    let counterparty_chain_id = state["client_state"]["chain_id"]
        .as_str()
        .map(str::to_string);

    Some(IbcClient {
        client_id,
        counterparty_chain_id,
    })
}
