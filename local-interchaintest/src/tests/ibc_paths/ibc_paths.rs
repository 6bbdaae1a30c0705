use log::info;

use crate::{
    error::{HarnessError, HarnessResult},
    utils::{
        constants::{GAIA_CHAIN, NEUTRON_CHAIN, NEUTRON_GAIA_PATH},
        ibc::get_ibc_denom,
        ibc_paths::{clients_for_chain, new_client_ids, query_channels, query_clients},
        polling::{retry_until_ok, PollConfig},
        relayer::{create_connection_between, create_transfer_channel, Relayer},
        test_context::TestContext,
    },
};

pub fn test_ibc_paths(test_ctx: &mut TestContext, poll: &PollConfig) -> HarnessResult<()> {
    test_ibc_paths_on(test_ctx, poll, NEUTRON_CHAIN, GAIA_CHAIN, NEUTRON_GAIA_PATH)
}

/// Checks the links resolved at startup, then opens a fresh transfer channel
/// on `path` between `src` and `dest` and finds both of its ends.
pub fn test_ibc_paths_on(
    test_ctx: &mut TestContext,
    poll: &PollConfig,
    src: &str,
    dest: &str,
    path: &str,
) -> HarnessResult<()> {
    info!("Starting IBC paths test...");
    verify_transfer_links(test_ctx)?;
    verify_ccv_links(test_ctx)?;

    let src_rb = test_ctx.get_request_builder().get_request_builder(src)?;
    let dest_rb = test_ctx.get_request_builder().get_request_builder(dest)?;
    let known = test_ctx.get_transfer_channels().src(src).get_all()?;
    if clients_for_chain(&query_clients(src_rb)?, &dest_rb.chain_id).is_empty() {
        info!("{path} has no clients yet, opening a connection first...");
        Relayer::new(src_rb).create_clients(path)?;
        let (src_conn, dest_conn) = create_connection_between(src_rb, dest_rb, path)?;
        info!(
            "New connection: {} on {src} <-> {} on {dest}",
            src_conn.connection_id, dest_conn.connection_id
        );
    }
    let clients_before = query_clients(src_rb)?;

    info!("Creating a new transfer channel on {path}...");
    let (src_end, dest_end) = create_transfer_channel(src_rb, dest_rb, path)?;
    info!(
        "New transfer channel: {} on {src} <-> {} on {dest}",
        src_end.channel_id, dest_end.channel_id
    );
    if known.contains(&src_end.channel_id) {
        return Err(HarnessError::UnexpectedResponse(
            path.to_string(),
            format!("relayer reused the existing channel {}", src_end.channel_id),
        ));
    }

    // a channel rides the path's existing connection and clients
    let extra_clients = new_client_ids(&clients_before, &query_clients(src_rb)?);
    if !extra_clients.is_empty() {
        return Err(HarnessError::UnexpectedResponse(
            path.to_string(),
            format!("channel creation added clients {extra_clients:?}"),
        ));
    }

    retry_until_ok("Waiting for the new channel to be open on both ends", poll, || {
        query_channels(dest_rb)?
            .iter()
            .find(|c| {
                c.channel_id == dest_end.channel_id
                    && c.counterparty.channel_id == src_end.channel_id
            })
            .map(|_| ())
            .ok_or_else(|| HarnessError::NoPairwiseMatch("new transfer channel".to_string()))
    })?;

    info!("Finished IBC paths test!");
    Ok(())
}

/// Every transfer channel has a reverse entry that is its counterparty, and
/// every ibc denom hashes over the receiving end.
fn verify_transfer_links(test_ctx: &TestContext) -> HarnessResult<()> {
    let links = test_ctx.links();
    for ((src, dest), channel_id) in &links.transfer_channel_ids {
        let reverse = links.transfer_channel(dest, src)?;
        let src_chain = test_ctx.get_chain(src)?;
        let paired = src_chain.channels.iter().any(|c| {
            &c.channel_id == channel_id && c.counterparty.channel_id == reverse
        });
        if !paired {
            return Err(HarnessError::NoPairwiseMatch(format!(
                "transfer channel {channel_id} from {src} to {dest}"
            )));
        }

        let expected = get_ibc_denom(&src_chain.native_denom, &reverse);
        let denom = links.ibc_denom(src, dest)?;
        if denom != expected {
            return Err(HarnessError::UnexpectedResponse(
                format!("{src} -> {dest}"),
                format!("ibc denom {denom}, expected {expected}"),
            ));
        }
        info!("{src} -> {dest}: {channel_id} / {reverse}, {denom}");
    }
    Ok(())
}

fn verify_ccv_links(test_ctx: &TestContext) -> HarnessResult<()> {
    let links = test_ctx.links();
    for (src, dest) in links.ccv_channel_ids.keys() {
        let reverse = test_ctx.get_ccv_channels().src(dest).dest(src).get()?;
        let connection = test_ctx.get_connections().src(src).dest(dest).get()?;
        info!("{src} <-> {dest}: ccv {reverse} over {connection}");
    }
    Ok(())
}
