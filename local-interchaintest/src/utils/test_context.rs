use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use localic_std::{modules::cosmwasm::CosmWasm, transactions::ChainRequestBuilder};
use log::{info, warn};

use crate::error::{HarnessError, HarnessResult};

use super::{
    constants::{
        ASTROPORT_PATH, GAIA_ADMIN_ADDR, GAIA_CHAIN_ID, LOCAL_CODE_ID_CACHE_PATH,
        NEUTRON_ADMIN_ADDR, NEUTRON_CHAIN_ID, STRIDE_ADMIN_ADDR, STRIDE_CHAIN_ID, VALENCE_PATH,
    },
    ibc::get_ibc_denom,
    ibc_paths::{
        find_pairwise_ccv_channel_ids, find_pairwise_transfer_channel_ids, query_channels,
        IbcChannel,
    },
    types::{ChainsVec, ConfigChain},
};

type ChainPair = (String, String);

fn pair(src: &str, dest: &str) -> ChainPair {
    (src.to_string(), dest.to_string())
}

/// One chain's view of the network, input to [`ChainLinks::from_channels`].
pub struct ChainChannels<'a> {
    pub name: &'a str,
    pub native_denom: &'a str,
    pub channels: &'a [IbcChannel],
}

/// Links between configured chains, keyed by `(src chain name, dest chain name)`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChainLinks {
    pub transfer_channel_ids: HashMap<ChainPair, String>,
    pub ccv_channel_ids: HashMap<ChainPair, String>,
    pub connection_ids: HashMap<ChainPair, String>,
    /// src native denom as seen on dest
    pub ibc_denoms: HashMap<ChainPair, String>,
}

impl ChainLinks {
    /// Pairs up every two chains by their transfer channels and every
    /// `(provider, consumer)` in `ics_links` by their ccv channels.
    /// Chains without a transfer channel between them are left unlinked; a
    /// declared ics link without ccv channels is an error.
    pub fn from_channels(
        chains: &[ChainChannels<'_>],
        ics_links: &[(&str, &str)],
    ) -> HarnessResult<Self> {
        let mut links = ChainLinks::default();
        let by_name: HashMap<&str, &ChainChannels<'_>> =
            chains.iter().map(|c| (c.name, c)).collect();

        for &(provider, consumer) in ics_links {
            let (p, c) = match (by_name.get(provider), by_name.get(consumer)) {
                (Some(p), Some(c)) => (p, c),
                (None, _) => return Err(HarnessError::UnknownChain(provider.to_string())),
                (_, None) => return Err(HarnessError::UnknownChain(consumer.to_string())),
            };
            let (p_end, c_end) = find_pairwise_ccv_channel_ids(p.channels, c.channels)?;

            links
                .ccv_channel_ids
                .insert(pair(provider, consumer), p_end.channel_id);
            links
                .ccv_channel_ids
                .insert(pair(consumer, provider), c_end.channel_id);
            // the ccv connection is the canonical one between provider and consumer
            links
                .connection_ids
                .insert(pair(provider, consumer), p_end.connection_id);
            links
                .connection_ids
                .insert(pair(consumer, provider), c_end.connection_id);
        }

        for (i, a) in chains.iter().enumerate() {
            for b in &chains[i + 1..] {
                let Ok((a_end, b_end)) = find_pairwise_transfer_channel_ids(a.channels, b.channels)
                else {
                    warn!("no transfer channel between {} and {}", a.name, b.name);
                    continue;
                };

                links
                    .connection_ids
                    .entry(pair(a.name, b.name))
                    .or_insert(a_end.connection_id);
                links
                    .connection_ids
                    .entry(pair(b.name, a.name))
                    .or_insert(b_end.connection_id);

                // a token arriving on a chain is prefixed with the receiving end's channel
                links.ibc_denoms.insert(
                    pair(a.name, b.name),
                    get_ibc_denom(a.native_denom, &b_end.channel_id),
                );
                links.ibc_denoms.insert(
                    pair(b.name, a.name),
                    get_ibc_denom(b.native_denom, &a_end.channel_id),
                );

                links
                    .transfer_channel_ids
                    .insert(pair(a.name, b.name), a_end.channel_id);
                links
                    .transfer_channel_ids
                    .insert(pair(b.name, a.name), b_end.channel_id);
            }
        }

        Ok(links)
    }

    fn lookup(
        map: &HashMap<ChainPair, String>,
        kind: &str,
        src: &str,
        dest: &str,
    ) -> HarnessResult<String> {
        map.get(&pair(src, dest))
            .cloned()
            .ok_or_else(|| HarnessError::MissingLink {
                kind: kind.to_string(),
                src: src.to_string(),
                dest: dest.to_string(),
            })
    }

    pub fn transfer_channel(&self, src: &str, dest: &str) -> HarnessResult<String> {
        Self::lookup(&self.transfer_channel_ids, "transfer channel", src, dest)
    }

    pub fn ccv_channel(&self, src: &str, dest: &str) -> HarnessResult<String> {
        Self::lookup(&self.ccv_channel_ids, "ccv channel", src, dest)
    }

    pub fn connection(&self, src: &str, dest: &str) -> HarnessResult<String> {
        Self::lookup(&self.connection_ids, "connection", src, dest)
    }

    pub fn ibc_denom(&self, src: &str, dest: &str) -> HarnessResult<String> {
        Self::lookup(&self.ibc_denoms, "ibc denom", src, dest)
    }

    /// All outgoing ids of `src` in `map`, ordered by destination chain name.
    fn outgoing(map: &HashMap<ChainPair, String>, src: &str) -> Vec<String> {
        map.iter()
            .filter(|((s, _), _)| s == src)
            .map(|((_, d), v)| (d.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect()
    }
}

pub struct LocalChain {
    pub rb: ChainRequestBuilder,
    /// contract codes stored on this chain (file stem -> code id)
    pub contract_codes: HashMap<String, u64>,
    pub channels: Vec<IbcChannel>,
    pub admin_addr: String,
    pub native_denom: String,
}

impl LocalChain {
    pub fn new(
        rb: ChainRequestBuilder,
        admin_addr: String,
        native_denom: String,
        channels: Vec<IbcChannel>,
    ) -> Self {
        Self {
            rb,
            contract_codes: Default::default(),
            channels,
            admin_addr,
            native_denom,
        }
    }

    pub fn get_cw(&self) -> CosmWasm {
        CosmWasm::new(&self.rb)
    }

    pub fn save_code(&mut self, abs_path: &Path, code: u64) -> HarnessResult<()> {
        let id = contract_name(abs_path)?;
        self.contract_codes.insert(id, code);
        Ok(())
    }
}

/// Contract name of an artifact: the file stem of `valence_clock.wasm` is `valence_clock`.
pub fn contract_name(path: &Path) -> HarnessResult<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            HarnessError::UnexpectedResponse(
                "artifacts".to_string(),
                format!("not a contract file: {}", path.display()),
            )
        })
}

fn admin_addr(chain: &ConfigChain) -> HarnessResult<String> {
    let known = match chain.chain_id.as_str() {
        NEUTRON_CHAIN_ID => Some(NEUTRON_ADMIN_ADDR),
        GAIA_CHAIN_ID => Some(GAIA_ADMIN_ADDR),
        STRIDE_CHAIN_ID => Some(STRIDE_ADMIN_ADDR),
        _ => None,
    };
    if let Some(addr) = known {
        return Ok(addr.to_string());
    }

    chain
        .genesis
        .accounts
        .first()
        .map(|acc| acc.address.clone())
        .ok_or_else(|| {
            HarnessError::UnexpectedResponse(
                chain.name.clone(),
                "no admin address and no genesis accounts configured".to_string(),
            )
        })
}

/// `(provider name, consumer name)` for every consumer chain in the config.
pub fn ics_links(config: &ChainsVec) -> Vec<(&str, &str)> {
    config
        .chains
        .iter()
        .filter_map(|consumer| {
            let provider_id = consumer.ics_consumer_link.as_deref()?;
            let provider = config.chains.iter().find(|c| c.chain_id == provider_id)?;
            Some((provider.name.as_str(), consumer.name.as_str()))
        })
        .collect()
}

/// Where the scenarios find contract bytecode and the code id cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub valence: String,
    pub astroport: String,
    pub code_id_cache: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            valence: VALENCE_PATH.to_string(),
            astroport: ASTROPORT_PATH.to_string(),
            code_id_cache: LOCAL_CODE_ID_CACHE_PATH.to_string(),
        }
    }
}

pub struct TestContext {
    chains: HashMap<String, LocalChain>,
    links: ChainLinks,
    artifacts: ArtifactPaths,
}

impl TestContext {
    /// Connects to every configured chain through the local-ic API at `api`
    /// and resolves the links between them.
    pub fn new(api: &str, config: &ChainsVec) -> HarnessResult<Self> {
        let mut chains = HashMap::new();
        for chain in &config.chains {
            let rb =
                ChainRequestBuilder::new(api.to_string(), chain.chain_id.clone(), chain.debugging)?;
            let channels = query_channels(&rb)?;
            info!("{}: {} channels", chain.name, channels.len());

            let local_chain =
                LocalChain::new(rb, admin_addr(chain)?, chain.denom.clone(), channels);
            chains.insert(chain.name.clone(), local_chain);
        }

        let views: Vec<ChainChannels<'_>> = config
            .chains
            .iter()
            .filter_map(|c| {
                chains.get(&c.name).map(|local| ChainChannels {
                    name: &c.name,
                    native_denom: &local.native_denom,
                    channels: &local.channels,
                })
            })
            .collect();
        let links = ChainLinks::from_channels(&views, &ics_links(config))?;

        Ok(Self {
            chains,
            links,
            artifacts: ArtifactPaths::default(),
        })
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactPaths) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn artifacts(&self) -> &ArtifactPaths {
        &self.artifacts
    }

    pub fn links(&self) -> &ChainLinks {
        &self.links
    }

    pub fn get_transfer_channels(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::TransferChannel)
    }

    pub fn get_connections(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::Connection)
    }

    pub fn get_ccv_channels(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::CCVChannel)
    }

    pub fn get_ibc_denoms(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::IBCDenom)
    }

    pub fn get_admin_addr(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::AdminAddr)
    }

    pub fn get_native_denom(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::NativeDenom)
    }

    pub fn get_request_builder(&self) -> TestContextQuery {
        TestContextQuery::new(self, QueryType::RequestBuilder)
    }

    pub fn get_chain(&self, name: &str) -> HarnessResult<&LocalChain> {
        self.chains
            .get(name)
            .ok_or_else(|| HarnessError::UnknownChain(name.to_string()))
    }

    pub fn get_mut_chain(&mut self, name: &str) -> HarnessResult<&mut LocalChain> {
        self.chains
            .get_mut(name)
            .ok_or_else(|| HarnessError::UnknownChain(name.to_string()))
    }

    pub fn get_code_id(&self, chain: &str, contract: &str) -> HarnessResult<u64> {
        self.get_chain(chain)?
            .contract_codes
            .get(contract)
            .copied()
            .ok_or_else(|| HarnessError::MissingCodeId {
                chain: chain.to_string(),
                contract: contract.to_string(),
            })
    }
}

pub enum QueryType {
    TransferChannel,
    Connection,
    CCVChannel,
    IBCDenom,
    AdminAddr,
    NativeDenom,
    RequestBuilder,
}

pub struct TestContextQuery<'a> {
    context: &'a TestContext,
    query_type: QueryType,
    src_chain: Option<String>,
    dest_chain: Option<String>,
}

impl<'a> TestContextQuery<'a> {
    pub fn new(context: &'a TestContext, query_type: QueryType) -> Self {
        Self {
            context,
            query_type,
            src_chain: None,
            dest_chain: None,
        }
    }

    pub fn src(mut self, src_chain: &str) -> Self {
        self.src_chain = Some(src_chain.to_string());
        self
    }

    pub fn dest(mut self, dest_chain: &str) -> Self {
        self.dest_chain = Some(dest_chain.to_string());
        self
    }

    fn src_name(&self) -> HarnessResult<&str> {
        self.src_chain
            .as_deref()
            .ok_or_else(|| HarnessError::UnknownChain("<no source chain given>".to_string()))
    }

    fn dest_name(&self) -> HarnessResult<&str> {
        self.dest_chain
            .as_deref()
            .ok_or_else(|| HarnessError::UnknownChain("<no destination chain given>".to_string()))
    }

    pub fn get(self) -> HarnessResult<String> {
        let links = &self.context.links;
        match self.query_type {
            QueryType::TransferChannel => links.transfer_channel(self.src_name()?, self.dest_name()?),
            QueryType::Connection => links.connection(self.src_name()?, self.dest_name()?),
            QueryType::CCVChannel => links.ccv_channel(self.src_name()?, self.dest_name()?),
            QueryType::IBCDenom => links.ibc_denom(self.src_name()?, self.dest_name()?),
            QueryType::AdminAddr => Ok(self.context.get_chain(self.src_name()?)?.admin_addr.clone()),
            QueryType::NativeDenom => {
                Ok(self.context.get_chain(self.src_name()?)?.native_denom.clone())
            }
            QueryType::RequestBuilder => Err(HarnessError::UnexpectedResponse(
                "test context".to_string(),
                "use get_request_builder(chain) for request builders".to_string(),
            )),
        }
    }

    /// Outgoing channel or connection ids of the source chain.
    pub fn get_all(self) -> HarnessResult<Vec<String>> {
        let src = self.src_name()?;
        let links = &self.context.links;
        Ok(match self.query_type {
            QueryType::TransferChannel => ChainLinks::outgoing(&links.transfer_channel_ids, src),
            QueryType::Connection => ChainLinks::outgoing(&links.connection_ids, src),
            QueryType::CCVChannel => ChainLinks::outgoing(&links.ccv_channel_ids, src),
            _ => vec![],
        })
    }

    pub fn get_request_builder(self, chain: &str) -> HarnessResult<&'a ChainRequestBuilder> {
        Ok(&self.context.get_chain(chain)?.rb)
    }
}
