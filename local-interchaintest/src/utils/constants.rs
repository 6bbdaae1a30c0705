pub const API_URL: &str = "http://127.0.0.1:42069";
pub const CHAIN_CONFIG_PATH: &str = "local-interchaintest/chains/neutron_gaia_stride.json";
pub const LOCAL_CODE_ID_CACHE_PATH: &str = "local-interchaintest/code_id_cache.json";

pub const VALENCE_PATH: &str = "./artifacts";
pub const ASTROPORT_PATH: &str = "local-interchaintest/contracts/astroport";
pub const WASM_EXTENSION: &str = "wasm";

pub const TRANSFER_PORT: &str = "transfer";
pub const PROVIDER_PORT: &str = "provider";
pub const CONSUMER_PORT: &str = "consumer";
pub const ICS20_VERSION: &str = "ics20-1";
pub const ORDER_UNORDERED: &str = "ORDER_UNORDERED";
pub const ORDER_ORDERED: &str = "ORDER_ORDERED";
pub const STATE_OPEN: &str = "STATE_OPEN";
pub const NEUTRON_GAIA_PATH: &str = "neutron-gaia";

pub const NEUTRON_CHAIN: &str = "neutron";
pub const NEUTRON_CHAIN_ID: &str = "localneutron-1";
pub const NEUTRON_ADMIN_ADDR: &str = "neutron1hj5fveer5cjtn4wd6wstzugjfdxzl0xpznmsky";

pub const GAIA_CHAIN: &str = "gaia";
pub const GAIA_CHAIN_ID: &str = "localcosmos-1";
pub const GAIA_PREFIX: &str = "cosmos";
pub const GAIA_ADMIN_ADDR: &str = "cosmos1hj5fveer5cjtn4wd6wstzugjfdxzl0xpxvjjvr";

pub const STRIDE_CHAIN: &str = "stride";
pub const STRIDE_CHAIN_ID: &str = "localstride-3";
pub const STRIDE_ADMIN_ADDR: &str = "stride1u20df3trc2c2zdhm8qvh2hdjx9ewh00sv6eyy8";
pub const ST_ATOM_DENOM: &str = "stuatom";

pub const ADMIN_KEY: &str = "admin";
pub const ACC_0_KEY: &str = "acc0";
pub const ACC_1_KEY: &str = "acc1";
pub const ACC_2_KEY: &str = "acc2";

pub const EXECUTE_FLAGS: &str = "--gas=auto --gas-adjustment=3.0";

pub const ACC1_ADDRESS_GAIA: &str = "cosmos1kljf09rj77uxeu5lye7muejx6ajsu55cc3re5h";
pub const ACC1_ADDRESS_NEUTRON: &str = "neutron1kljf09rj77uxeu5lye7muejx6ajsu55cuw2mws";
pub const ACC2_ADDRESS_NEUTRON: &str = "neutron17lp3n649rxt2jadn455frcj0q6anjnds2s0ve9";

/// seconds
pub const DEFAULT_TIMEOUT: u64 = 60 * 60 * 5;

pub const FEE_AMOUNT: u128 = 5000;
pub const CONTRACT_FUNDING_AMOUNT: u128 = 5_000_000_000;
