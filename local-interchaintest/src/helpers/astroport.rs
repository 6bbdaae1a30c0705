use astroport::{
    asset::{Asset, AssetInfo},
    factory::{InstantiateMsg as FactoryInstantiateMsg, PairConfig, PairType},
    native_coin_registry::{
        ExecuteMsg as NativeCoinRegistryExecuteMsg,
        InstantiateMsg as NativeCoinRegistryInstantiateMsg,
    },
    pair::StablePoolParams,
};
use cosmwasm_std::{Binary, Decimal, Uint128};
use localic_std::{modules::cosmwasm::contract_instantiate, transactions::ChainRequestBuilder};
use log::info;
use serde_json::Value;

use crate::{
    error::{HarnessError, HarnessResult},
    utils::{
        constants::{ACC_0_KEY, EXECUTE_FLAGS},
        polling::{poll_until, PollConfig},
        test_context::TestContext,
    },
};

use super::common::{execute, query_contract};

/// Code ids of the astroport contracts a stable pool needs.
pub struct AstroportCodes {
    pub native_coin_registry: u64,
    pub factory: u64,
    pub pair_stable: u64,
    pub token: u64,
    pub whitelist: u64,
}

impl AstroportCodes {
    pub fn from_context(test_ctx: &TestContext, chain: &str) -> HarnessResult<Self> {
        Ok(Self {
            native_coin_registry: test_ctx
                .get_code_id(chain, "astroport_native_coin_registry")?,
            factory: test_ctx.get_code_id(chain, "astroport_factory")?,
            pair_stable: test_ctx.get_code_id(chain, "astroport_pair_stable")?,
            token: test_ctx.get_code_id(chain, "astroport_token")?,
            whitelist: test_ctx.get_code_id(chain, "astroport_whitelist")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AstroportPool {
    pub factory_address: String,
    pub pool_address: String,
    pub lp_token_address: String,
}

fn native(denom: &str) -> AssetInfo {
    AssetInfo::NativeToken {
        denom: denom.to_string(),
    }
}

fn query_pair(
    rb: &ChainRequestBuilder,
    factory_address: &str,
    asset1: AssetInfo,
    asset2: AssetInfo,
) -> HarnessResult<Value> {
    query_contract(
        rb,
        factory_address,
        &astroport::factory::QueryMsg::Pair {
            asset_infos: vec![asset1, asset2],
        },
    )
}

fn string_field(pair_info: &Value, field: &str, factory_address: &str) -> HarnessResult<String> {
    pair_info[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            HarnessError::UnexpectedResponse(
                factory_address.to_string(),
                format!("pair info has no {field}: {pair_info}"),
            )
        })
}

pub fn get_pool_address(
    rb: &ChainRequestBuilder,
    factory_address: &str,
    asset1: AssetInfo,
    asset2: AssetInfo,
) -> HarnessResult<String> {
    let pair_info = query_pair(rb, factory_address, asset1, asset2)?;
    string_field(&pair_info, "contract_addr", factory_address)
}

pub fn get_lp_token_address(
    rb: &ChainRequestBuilder,
    factory_address: &str,
    asset1: AssetInfo,
    asset2: AssetInfo,
) -> HarnessResult<String> {
    let pair_info = query_pair(rb, factory_address, asset1, asset2)?;
    string_field(&pair_info, "liquidity_token", factory_address)
}

/// cw20 balance of the LP token; zero when the query has no balance.
pub fn get_lp_token_balance(
    rb: &ChainRequestBuilder,
    token_address: &str,
    account_address: &str,
) -> HarnessResult<Uint128> {
    let balance = query_contract(
        rb,
        token_address,
        &cw20::Cw20QueryMsg::Balance {
            address: account_address.to_string(),
        },
    )?;
    Ok(balance["balance"]
        .as_str()
        .and_then(|b| b.parse::<u128>().ok())
        .map(Uint128::new)
        .unwrap_or_default())
}

/// Instantiates registry and factory, creates a stable `denom_a`/`denom_b`
/// pair and provides `amount_a`/`amount_b` of liquidity from `ACC_0_KEY`.
/// `owner` must already hold both amounts.
#[allow(clippy::too_many_arguments)]
pub fn deploy_astroport_pool(
    rb: &ChainRequestBuilder,
    codes: &AstroportCodes,
    owner: &str,
    denom_a: &str,
    amount_a: u128,
    denom_b: &str,
    amount_b: u128,
    poll: &PollConfig,
) -> HarnessResult<AstroportPool> {
    let registry = contract_instantiate(
        rb,
        ACC_0_KEY,
        codes.native_coin_registry,
        &serde_json::to_string(&NativeCoinRegistryInstantiateMsg {
            owner: owner.to_string(),
        })?,
        "native-coin-registry",
        None,
        "",
    )?;
    info!("Native coin registry contract: {}", registry.address);

    execute(
        rb,
        &registry.address,
        ACC_0_KEY,
        &NativeCoinRegistryExecuteMsg::Add {
            native_coins: vec![(denom_a.to_string(), 6), (denom_b.to_string(), 6)],
        },
        EXECUTE_FLAGS,
    )?;

    let factory = contract_instantiate(
        rb,
        ACC_0_KEY,
        codes.factory,
        &serde_json::to_string(&FactoryInstantiateMsg {
            pair_configs: vec![PairConfig {
                code_id: codes.pair_stable,
                pair_type: PairType::Stable {},
                total_fee_bps: 0,
                maker_fee_bps: 0,
                is_disabled: false,
                is_generator_disabled: true,
            }],
            token_code_id: codes.token,
            fee_address: None,
            generator_address: None,
            owner: owner.to_string(),
            whitelist_code_id: codes.whitelist,
            coin_registry_address: registry.address.clone(),
        })?,
        "astroport-factory",
        None,
        "",
    )?;
    info!("Factory contract: {}", factory.address);

    execute(
        rb,
        &factory.address,
        ACC_0_KEY,
        &astroport::factory::ExecuteMsg::CreatePair {
            pair_type: PairType::Stable {},
            asset_infos: vec![native(denom_a), native(denom_b)],
            init_params: Some(Binary::from(serde_json::to_vec(&StablePoolParams {
                amp: 3,
                owner: None,
            })?)),
        },
        EXECUTE_FLAGS,
    )?;

    let mut pool_address = String::new();
    poll_until("Waiting for the pair to be created", poll, || {
        match get_pool_address(rb, &factory.address, native(denom_a), native(denom_b)) {
            Ok(addr) => {
                pool_address = addr;
                Ok(true)
            }
            Err(HarnessError::UnexpectedResponse(..)) => Ok(false),
            Err(e) => Err(e),
        }
    })?;
    info!("Pool contract: {pool_address}");

    execute(
        rb,
        &pool_address,
        ACC_0_KEY,
        &astroport::pair::ExecuteMsg::ProvideLiquidity {
            assets: vec![
                Asset {
                    info: native(denom_a),
                    amount: Uint128::new(amount_a),
                },
                Asset {
                    info: native(denom_b),
                    amount: Uint128::new(amount_b),
                },
            ],
            slippage_tolerance: Some(Decimal::percent(1)),
            auto_stake: Some(false),
            receiver: Some(owner.to_string()),
        },
        &format!("--amount {amount_a}{denom_a},{amount_b}{denom_b} {EXECUTE_FLAGS}"),
    )?;

    let lp_token_address =
        get_lp_token_address(rb, &factory.address, native(denom_a), native(denom_b))?;
    poll_until("Waiting for initial liquidity", poll, || {
        Ok(!get_lp_token_balance(rb, &lp_token_address, owner)?.is_zero())
    })?;

    Ok(AstroportPool {
        factory_address: factory.address,
        pool_address,
        lp_token_address,
    })
}
