use std::{
    io::Write,
    path::{Path, PathBuf},
};

use localic_std::transactions::ChainRequestBuilder;
use log::info;

use crate::{
    error::{HarnessError, HarnessResult},
    utils::{
        constants::{ADMIN_KEY, GAIA_CHAIN, GAIA_CHAIN_ID, GAIA_PREFIX, STRIDE_CHAIN},
        queries::query_validator_set,
        stride::{
            add_stakeibc_validators, query_host_zone, query_stakeibc_validators,
            register_stride_host_zone, StakeibcValidators,
        },
        test_context::TestContext,
    },
};

const VALIDATORS_FILE: &str = "validators.json";

/// Registers gaia as a stride host zone, then its validators, unless stride
/// already knows them.
pub fn set_up_host_zone(test_ctx: &mut TestContext) -> HarnessResult<()> {
    let stride_rb = test_ctx
        .get_request_builder()
        .get_request_builder(STRIDE_CHAIN)?;
    let gaia_rb = test_ctx
        .get_request_builder()
        .get_request_builder(GAIA_CHAIN)?;

    if query_host_zone(stride_rb, GAIA_CHAIN_ID) {
        info!("Host zone registered.");
    } else {
        info!("Host zone not registered, registering...");
        let stride_to_gaia_channel_id = test_ctx
            .get_transfer_channels()
            .src(STRIDE_CHAIN)
            .dest(GAIA_CHAIN)
            .get()?;
        let atom_on_stride = test_ctx
            .get_ibc_denoms()
            .src(GAIA_CHAIN)
            .dest(STRIDE_CHAIN)
            .get()?;

        register_stride_host_zone(
            stride_rb,
            &test_ctx
                .get_connections()
                .src(STRIDE_CHAIN)
                .dest(GAIA_CHAIN)
                .get()?,
            &test_ctx.get_native_denom().src(GAIA_CHAIN).get()?,
            GAIA_PREFIX,
            &atom_on_stride,
            &stride_to_gaia_channel_id,
            ADMIN_KEY,
        )?;
    }

    register_gaia_validators_on_stride(gaia_rb, stride_rb)
}

pub fn register_gaia_validators_on_stride(
    gaia: &ChainRequestBuilder,
    stride: &ChainRequestBuilder,
) -> HarnessResult<()> {
    if !query_stakeibc_validators(stride, GAIA_CHAIN_ID)?
        .validators
        .is_empty()
    {
        info!("Validators registered.");
        return Ok(());
    }

    let validators = StakeibcValidators {
        validators: query_validator_set(gaia)?,
    };
    info!("Registering {} gaia validators on stride", validators.validators.len());

    let container_path = upload_validators_file(stride, &validators)?;
    add_stakeibc_validators(stride, GAIA_CHAIN_ID, &container_path, ADMIN_KEY)?;

    Ok(())
}

fn write_validators_file(dir: &Path, validators: &StakeibcValidators) -> HarnessResult<PathBuf> {
    let local_path = dir.join(VALIDATORS_FILE);
    let mut file = std::fs::File::create(&local_path)?;
    file.write_all(serde_json::to_string_pretty(validators)?.as_bytes())?;
    Ok(local_path)
}

/// Uploads the list into the stride home directory and returns its path there.
fn upload_validators_file(
    stride: &ChainRequestBuilder,
    validators: &StakeibcValidators,
) -> HarnessResult<String> {
    let dir = tempfile::tempdir()?;
    let local_path = write_validators_file(dir.path(), validators)?;

    let resp = stride.upload_file(&local_path, true)?.send()?;
    let body = resp.text()?;
    if !body.contains("success") {
        return Err(HarnessError::UnexpectedResponse(stride.chain_id.clone(), body));
    }

    Ok(format!("/var/cosmos-chain/{}/{VALIDATORS_FILE}", stride.chain_id))
}
