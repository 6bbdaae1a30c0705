use std::collections::BTreeMap;

use cosmwasm_std::{coin, Decimal, Uint128, Uint64};
use cw_utils::Expiration;
use localic_std::{
    modules::{bank::get_balance, cosmwasm::contract_instantiate},
    transactions::ChainRequestBuilder,
};
use log::info;

use crate::{
    contracts::{
        common::{
            ContractOperationModeConfig, CovenantPartyConfig, InterchainCovenantParty,
            NativeCovenantParty, PoolPriceConfig, SingleSideLpLimits, SplitConfig, Timeouts,
            PARTY_A, PARTY_B,
        },
        two_party_pol::{
            AstroportLiquidPoolerConfig, CovenantContractCodeIds, CovenantType,
            HolderExecuteMsg, InstantiateMsg, LiquidPoolerConfig, RagequitConfig, RagequitTerms,
        },
    },
    error::HarnessResult,
    helpers::{
        astroport::{deploy_astroport_pool, get_lp_token_balance, AstroportCodes, AstroportPool},
        balances::{has_at_least, has_denom, send_non_native_balances},
        common::{execute, fund_addresses, query_contract_state},
        covenant::{Covenant, PartyContracts},
    },
    utils::{
        constants::{
            ACC1_ADDRESS_GAIA, ACC1_ADDRESS_NEUTRON, ACC2_ADDRESS_NEUTRON, ACC_0_KEY, ACC_1_KEY,
            ACC_2_KEY, CONTRACT_FUNDING_AMOUNT, EXECUTE_FLAGS, FEE_AMOUNT, GAIA_CHAIN,
            NEUTRON_CHAIN,
        },
        ibc::ibc_send,
        polling::{poll_until, retry_until_ok, tick_until, PollConfig},
        queries::query_block_height,
        setup::deploy_contracts_on_chain,
        test_context::TestContext,
    },
};

const UATOM_CONTRIBUTION: u128 = 5_000_000_000;
const UNTRN_CONTRIBUTION: u128 = 50_000_000_000;
const ATOM_TO_NEUTRON: u128 = 20_000_000_000;

/// Everything a two-party POL covenant on neutron needs that does not change
/// between the paths.
struct PolEnv<'a> {
    neutron: &'a ChainRequestBuilder,
    gaia: &'a ChainRequestBuilder,
    codes: CovenantContractCodeIds,
    covenant_code: u64,
    pool: AstroportPool,
    atom_denom: String,
    neutron_denom: String,
    atom_on_neutron: String,
    neutron_on_gaia: String,
    neutron_admin: String,
    gaia_admin: String,
    connection_id: String,
    gaia_to_neutron_channel: String,
    neutron_to_gaia_channel: String,
}

/// Lockup and deposit deadline relative to the current height.
struct PolPath<'a> {
    label: &'a str,
    lockup_blocks: u64,
    deposit_blocks: u64,
}

pub fn test_two_party_pol_native(test_ctx: &mut TestContext, poll: &PollConfig) -> HarnessResult<()> {
    let artifacts = test_ctx.artifacts().clone();
    deploy_contracts_on_chain(
        test_ctx,
        &artifacts.valence,
        NEUTRON_CHAIN,
        &artifacts.code_id_cache,
    )?;
    deploy_contracts_on_chain(
        test_ctx,
        &artifacts.astroport,
        NEUTRON_CHAIN,
        &artifacts.code_id_cache,
    )?;

    info!("Starting two party POL native tests...");
    let neutron = test_ctx
        .get_request_builder()
        .get_request_builder(NEUTRON_CHAIN)?;
    let gaia = test_ctx.get_request_builder().get_request_builder(GAIA_CHAIN)?;

    let neutron_admin = test_ctx.get_admin_addr().src(NEUTRON_CHAIN).get()?;
    let atom_denom = test_ctx.get_native_denom().src(GAIA_CHAIN).get()?;
    let neutron_denom = test_ctx.get_native_denom().src(NEUTRON_CHAIN).get()?;
    let atom_on_neutron = test_ctx
        .get_ibc_denoms()
        .src(GAIA_CHAIN)
        .dest(NEUTRON_CHAIN)
        .get()?;
    let gaia_to_neutron_channel = test_ctx
        .get_transfer_channels()
        .src(GAIA_CHAIN)
        .dest(NEUTRON_CHAIN)
        .get()?;

    info!("Send some ATOM to neutron for the pool...");
    ibc_send(
        gaia,
        ACC_0_KEY,
        &neutron_admin,
        coin(ATOM_TO_NEUTRON, &atom_denom),
        coin(100_000, &atom_denom),
        &gaia_to_neutron_channel,
        None,
    )?;
    poll_until("Waiting to receive IBC transfer", poll, || {
        Ok(has_at_least(
            &get_balance(neutron, &neutron_admin),
            &atom_on_neutron,
            ATOM_TO_NEUTRON,
        ))
    })?;

    let pool = deploy_astroport_pool(
        neutron,
        &AstroportCodes::from_context(test_ctx, NEUTRON_CHAIN)?,
        &neutron_admin,
        &atom_on_neutron,
        UATOM_CONTRIBUTION,
        &neutron_denom,
        UNTRN_CONTRIBUTION,
        poll,
    )?;

    let env = PolEnv {
        neutron,
        gaia,
        codes: CovenantContractCodeIds {
            ibc_forwarder_code: test_ctx.get_code_id(NEUTRON_CHAIN, "valence_ibc_forwarder")?,
            holder_code: test_ctx.get_code_id(NEUTRON_CHAIN, "valence_two_party_pol_holder")?,
            clock_code: test_ctx.get_code_id(NEUTRON_CHAIN, "valence_clock")?,
            interchain_router_code: test_ctx
                .get_code_id(NEUTRON_CHAIN, "valence_interchain_router")?,
            native_router_code: test_ctx.get_code_id(NEUTRON_CHAIN, "valence_native_router")?,
            liquid_pooler_code: test_ctx
                .get_code_id(NEUTRON_CHAIN, "valence_astroport_liquid_pooler")?,
        },
        covenant_code: test_ctx.get_code_id(NEUTRON_CHAIN, "valence_covenant_two_party_pol")?,
        pool,
        neutron_on_gaia: test_ctx
            .get_ibc_denoms()
            .src(NEUTRON_CHAIN)
            .dest(GAIA_CHAIN)
            .get()?,
        gaia_admin: test_ctx.get_admin_addr().src(GAIA_CHAIN).get()?,
        connection_id: test_ctx
            .get_connections()
            .src(NEUTRON_CHAIN)
            .dest(GAIA_CHAIN)
            .get()?,
        neutron_to_gaia_channel: test_ctx
            .get_transfer_channels()
            .src(NEUTRON_CHAIN)
            .dest(GAIA_CHAIN)
            .get()?,
        gaia_to_neutron_channel,
        atom_denom,
        neutron_denom,
        atom_on_neutron,
        neutron_admin,
    };

    happy_path(&env, poll)?;
    ragequit_path(&env, poll)?;

    info!("Finished two party POL native tests!");
    Ok(())
}

fn happy_path(env: &PolEnv, poll: &PollConfig) -> HarnessResult<()> {
    info!("Two party POL happy path...");
    let path = PolPath {
        label: "two-party-pol-covenant-happy",
        lockup_blocks: 130,
        deposit_blocks: 110,
    };
    let contracts = instantiate_and_deposit(env, &path, poll)?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until holder expires",
        poll,
        || {
            let state = query_contract_state(env.neutron, &contracts.holder)?;
            info!("Holder state: {state}");
            Ok(state == "expired")
        },
    )?;

    info!("Party A claims and router receives the funds");
    retry_until_ok("Party A claim", poll, || {
        execute(
            env.neutron,
            &contracts.holder,
            ACC_1_KEY,
            &HolderExecuteMsg::Claim {},
            EXECUTE_FLAGS,
        )
    })?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until party A claim is distributed",
        poll,
        || {
            let hub_receiver_balances = get_balance(env.gaia, ACC1_ADDRESS_GAIA);
            info!("Hub receiver balances: {hub_receiver_balances:?}");
            Ok(has_denom(&hub_receiver_balances, &env.atom_denom)
                && has_denom(&hub_receiver_balances, &env.neutron_on_gaia))
        },
    )?;

    info!("Party B claims and router receives the funds");
    retry_until_ok("Party B claim", poll, || {
        execute(
            env.neutron,
            &contracts.holder,
            ACC_2_KEY,
            &HolderExecuteMsg::Claim {},
            EXECUTE_FLAGS,
        )
    })?;

    wait_for_party_b(env, &contracts, poll)?;
    refund(env)
}

fn ragequit_path(env: &PolEnv, poll: &PollConfig) -> HarnessResult<()> {
    info!("Two party POL share based ragequit path...");
    let path = PolPath {
        label: "two-party-pol-covenant-ragequit",
        lockup_blocks: 300,
        deposit_blocks: 200,
    };
    let contracts = instantiate_and_deposit(env, &path, poll)?;

    info!("Party A ragequits...");
    execute(
        env.neutron,
        &contracts.holder,
        ACC_1_KEY,
        &HolderExecuteMsg::Ragequit {},
        EXECUTE_FLAGS,
    )?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until party A ragequit is distributed",
        poll,
        || {
            let hub_receiver_balances = get_balance(env.gaia, ACC1_ADDRESS_GAIA);
            info!("Hub receiver balances: {hub_receiver_balances:?}");
            Ok(has_denom(&hub_receiver_balances, &env.atom_denom)
                && has_denom(&hub_receiver_balances, &env.neutron_on_gaia))
        },
    )?;

    // after a ragequit the remaining party may claim right away
    info!("Party B claims and router receives the funds");
    retry_until_ok("Party B claim", poll, || {
        execute(
            env.neutron,
            &contracts.holder,
            ACC_2_KEY,
            &HolderExecuteMsg::Claim {},
            EXECUTE_FLAGS,
        )
    })?;

    wait_for_party_b(env, &contracts, poll)?;
    refund(env)
}

fn instantiate_and_deposit(
    env: &PolEnv,
    path: &PolPath,
    poll: &PollConfig,
) -> HarnessResult<PartyContracts> {
    let current_block_height = query_block_height(env.neutron)?;

    let msg = InstantiateMsg {
        label: path.label.to_string(),
        timeouts: Timeouts {
            ica_timeout: Uint64::new(10000),
            ibc_transfer_timeout: Uint64::new(10000),
        },
        contract_codes: env.codes.clone(),
        clock_tick_max_gas: None,
        lockup_config: Expiration::AtHeight(current_block_height + path.lockup_blocks),
        party_a_config: CovenantPartyConfig::Interchain(InterchainCovenantParty {
            party_receiver_addr: ACC1_ADDRESS_GAIA.to_string(),
            party_chain_connection_id: env.connection_id.clone(),
            ibc_transfer_timeout: Uint64::new(10000),
            party_to_host_chain_channel_id: env.gaia_to_neutron_channel.clone(),
            host_to_party_chain_channel_id: env.neutron_to_gaia_channel.clone(),
            remote_chain_denom: env.atom_denom.clone(),
            addr: ACC1_ADDRESS_NEUTRON.to_string(),
            native_denom: env.atom_on_neutron.clone(),
            contribution: coin(UATOM_CONTRIBUTION, &env.atom_denom),
            denom_to_pfm_map: BTreeMap::new(),
            fallback_address: None,
        }),
        party_b_config: CovenantPartyConfig::Native(NativeCovenantParty {
            party_receiver_addr: ACC2_ADDRESS_NEUTRON.to_string(),
            native_denom: env.neutron_denom.clone(),
            addr: ACC2_ADDRESS_NEUTRON.to_string(),
            contribution: coin(UNTRN_CONTRIBUTION, &env.neutron_denom),
        }),
        covenant_type: CovenantType::Share,
        ragequit_config: Some(RagequitConfig::Enabled(RagequitTerms {
            penalty: Decimal::percent(10),
            state: None,
        })),
        deposit_deadline: Expiration::AtHeight(current_block_height + path.deposit_blocks),
        party_a_share: Decimal::percent(50),
        party_b_share: Decimal::percent(50),
        pool_price_config: PoolPriceConfig {
            expected_spot_price: Decimal::percent(10),
            acceptable_price_spread: Decimal::permille(90),
        },
        splits: BTreeMap::from([
            (
                env.atom_on_neutron.clone(),
                SplitConfig::halves(ACC1_ADDRESS_GAIA, ACC2_ADDRESS_NEUTRON),
            ),
            (
                env.neutron_denom.clone(),
                SplitConfig::halves(ACC1_ADDRESS_GAIA, ACC2_ADDRESS_NEUTRON),
            ),
        ]),
        fallback_split: None,
        emergency_committee: None,
        liquid_pooler_config: LiquidPoolerConfig::Astroport(AstroportLiquidPoolerConfig {
            pool_pair_type: astroport::factory::PairType::Stable {},
            pool_address: env.pool.pool_address.clone(),
            asset_a_denom: env.atom_on_neutron.clone(),
            asset_b_denom: env.neutron_denom.clone(),
            single_side_lp_limits: SingleSideLpLimits {
                asset_a_limit: Uint128::new(100000),
                asset_b_limit: Uint128::new(100000),
            },
        }),
        fallback_address: None,
        operation_mode: ContractOperationModeConfig::Permissioned(vec![]),
    };

    let covenant_contract = contract_instantiate(
        env.neutron,
        ACC_0_KEY,
        env.covenant_code,
        &serde_json::to_string(&msg)?,
        path.label,
        None,
        "",
    )?;
    info!("Covenant contract: {}", covenant_contract.address);
    let covenant = Covenant::TwoPartyPol {
        rb: env.neutron,
        contract_address: &covenant_contract.address,
    };

    let contracts = PartyContracts::query(&covenant)?;
    let liquid_pooler = covenant.query_liquid_pooler_address()?;

    info!("Fund covenant addresses with NTRN...");
    let mut fundable = contracts.fundable();
    fundable.push(&liquid_pooler);
    fund_addresses(
        env.neutron,
        ACC_0_KEY,
        &fundable,
        &coin(CONTRACT_FUNDING_AMOUNT, &env.neutron_denom),
        &coin(FEE_AMOUNT, &env.neutron_denom),
    )?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until forwarders create ICA",
        poll,
        || {
            let state = query_contract_state(env.neutron, &contracts.party_a_forwarder)?;
            info!("Forwarder A state: {state}");
            Ok(state == "ica_created")
        },
    )?;
    let party_a_deposit_address = covenant.query_deposit_address(PARTY_A)?;
    let party_b_deposit_address = covenant.query_deposit_address(PARTY_B)?;
    info!("Party A deposit address: {party_a_deposit_address}");
    info!("Party B deposit address: {party_b_deposit_address}");

    info!("Fund the forwarders with sufficient funds...");
    fund_addresses(
        env.gaia,
        ACC_0_KEY,
        &[&party_a_deposit_address],
        &coin(UATOM_CONTRIBUTION, &env.atom_denom),
        &coin(FEE_AMOUNT, &env.atom_denom),
    )?;
    fund_addresses(
        env.neutron,
        ACC_0_KEY,
        &[&party_b_deposit_address],
        &coin(UNTRN_CONTRIBUTION, &env.neutron_denom),
        &coin(FEE_AMOUNT, &env.neutron_denom),
    )?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until forwarders forward the funds to the holder",
        poll,
        || {
            let holder_balance = get_balance(env.neutron, &contracts.holder);
            if has_at_least(&holder_balance, &env.atom_on_neutron, UATOM_CONTRIBUTION)
                && has_at_least(&holder_balance, &env.neutron_denom, UNTRN_CONTRIBUTION)
            {
                info!("Holder received ATOM & NTRN");
                return Ok(true);
            }
            Ok(query_contract_state(env.neutron, &contracts.holder)? == "active")
        },
    )?;

    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until holder sends funds to LiquidPooler and LPer receives LP tokens",
        poll,
        || {
            Ok(
                !get_lp_token_balance(env.neutron, &env.pool.lp_token_address, &liquid_pooler)?
                    .is_zero(),
            )
        },
    )?;

    Ok(contracts)
}

fn wait_for_party_b(env: &PolEnv, contracts: &PartyContracts, poll: &PollConfig) -> HarnessResult<()> {
    tick_until(
        env.neutron,
        ACC_0_KEY,
        &contracts.clock,
        "Tick until both parties receive their funds",
        poll,
        || {
            let neutron_receiver_balances = get_balance(env.neutron, ACC2_ADDRESS_NEUTRON);
            info!("Neutron receiver balances: {neutron_receiver_balances:?}");
            Ok(has_denom(&neutron_receiver_balances, &env.neutron_denom)
                && has_denom(&neutron_receiver_balances, &env.atom_on_neutron))
        },
    )
}

/// Sends the receivers' counter-party denoms back so the next path starts clean.
fn refund(env: &PolEnv) -> HarnessResult<()> {
    send_non_native_balances(
        env.gaia,
        ACC_1_KEY,
        ACC1_ADDRESS_GAIA,
        &env.gaia_admin,
        &env.atom_denom,
        &coin(FEE_AMOUNT, &env.atom_denom),
    )?;
    send_non_native_balances(
        env.neutron,
        ACC_2_KEY,
        ACC2_ADDRESS_NEUTRON,
        &env.neutron_admin,
        &env.neutron_denom,
        &coin(FEE_AMOUNT, &env.neutron_denom),
    )?;
    Ok(())
}
