//! Relayer control through the local-interchain API.
//!
//! local-ic runs the relayer next to the chains. Starting and stopping it are
//! plain `{chain_id, action}` posts to the API root; rly commands go through
//! the localic-std relayer.

use localic_std::{relayer::Relayer as LocalRelayer, transactions::ChainRequestBuilder};
use log::{debug, info};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};

use super::{
    constants::{ICS20_VERSION, ORDER_UNORDERED, TRANSFER_PORT},
    ibc_paths::{
        pair_new_connections, pair_new_transfer_channels, query_channels, query_connections,
        PairwiseChannelResult, PairwiseConnectionResult,
    },
};

#[derive(Serialize, Debug, PartialEq)]
struct RelayerRequest<'a> {
    chain_id: &'a str,
    action: &'a str,
}

pub struct Relayer<'a> {
    rb: &'a ChainRequestBuilder,
    client: Client,
}

impl<'a> Relayer<'a> {
    pub fn new(rb: &'a ChainRequestBuilder) -> Self {
        Self {
            rb,
            client: Client::default(),
        }
    }

    fn post(&self, action: &str) -> HarnessResult<()> {
        let request = RelayerRequest {
            chain_id: &self.rb.chain_id,
            action,
        };
        debug!("relayer request: {request:?}");

        let resp = self.client.post(&self.rb.api).json(&request).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(HarnessError::Relayer {
                cmd: action.to_string(),
                reason: format!("{status}: {}", resp.text()?),
            });
        }
        Ok(())
    }

    pub fn start(&self) -> HarnessResult<()> {
        info!("starting relayer");
        self.post("start-relayer")
    }

    pub fn stop(&self) -> HarnessResult<()> {
        info!("stopping relayer");
        self.post("stop-relayer")
    }

    pub fn exec(&self, cmd: &str) -> HarnessResult<Value> {
        info!("relayer exec: {cmd}");
        Ok(LocalRelayer::new(self.rb).execute(cmd, false)?)
    }

    pub fn create_clients(&self, path: &str) -> HarnessResult<Value> {
        self.exec(&format!("rly tx clients {path}"))
    }

    pub fn create_connection(&self, path: &str) -> HarnessResult<Value> {
        self.exec(&format!("rly tx connection {path}"))
    }

    /// Always opens a new channel, even when the path already has one on the
    /// same ports.
    pub fn create_channel(
        &self,
        path: &str,
        src_port: &str,
        dst_port: &str,
        order: &str,
        version: &str,
    ) -> HarnessResult<Value> {
        self.exec(&channel_cmd(path, src_port, dst_port, order, version))
    }
}

fn channel_cmd(path: &str, src_port: &str, dst_port: &str, order: &str, version: &str) -> String {
    // rly takes the short order name
    let order = order
        .trim_start_matches("ORDER_")
        .to_ascii_lowercase();
    format!(
        "rly tx channel {path} --src-port {src_port} --dst-port {dst_port} --order {order} --version {version} --override"
    )
}

/// Opens a new transfer channel on `path` and returns both of its ends,
/// source first. Pre-existing channels between the chains are ignored.
pub fn create_transfer_channel(
    src_rb: &ChainRequestBuilder,
    dst_rb: &ChainRequestBuilder,
    path: &str,
) -> HarnessResult<(PairwiseChannelResult, PairwiseChannelResult)> {
    let src_before = query_channels(src_rb)?;
    let dst_before = query_channels(dst_rb)?;

    Relayer::new(src_rb).create_channel(
        path,
        TRANSFER_PORT,
        TRANSFER_PORT,
        ORDER_UNORDERED,
        ICS20_VERSION,
    )?;

    let src_after = query_channels(src_rb)?;
    let dst_after = query_channels(dst_rb)?;
    info!(
        "channels on {}: {} -> {}, on {}: {} -> {}",
        src_rb.chain_id,
        src_before.len(),
        src_after.len(),
        dst_rb.chain_id,
        dst_before.len(),
        dst_after.len(),
    );

    pair_new_transfer_channels(&src_before, &src_after, &dst_before, &dst_after)
}

/// Opens a new connection on `path` and returns both of its ends, source first.
pub fn create_connection_between(
    src_rb: &ChainRequestBuilder,
    dst_rb: &ChainRequestBuilder,
    path: &str,
) -> HarnessResult<(PairwiseConnectionResult, PairwiseConnectionResult)> {
    let src_before = query_connections(src_rb)?;
    let dst_before = query_connections(dst_rb)?;

    Relayer::new(src_rb).create_connection(path)?;

    pair_new_connections(
        &src_before,
        &query_connections(src_rb)?,
        &dst_before,
        &query_connections(dst_rb)?,
    )
}
