use localic_std::transactions::ChainRequestBuilder;
use log::{debug, info};

use crate::error::HarnessResult;

use super::{
    constants::{ACC_0_KEY, WASM_EXTENSION},
    file_system::{read_artifacts, read_code_id_cache, write_code_id_cache},
    test_context::{contract_name, TestContext},
};

/// Stores every `.wasm` under `path` on `chain` and records the code ids in
/// the context. Code ids already in the context are kept; ids from the local
/// cache at `cache_path` are reused while the chain still knows them.
pub fn deploy_contracts_on_chain(
    test_ctx: &mut TestContext,
    path: &str,
    chain: &str,
    cache_path: &str,
) -> HarnessResult<()> {
    let mut cache = read_code_id_cache(cache_path)?;
    let chain_cache = cache.entry(chain.to_string()).or_default();

    for entry in read_artifacts(path)? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(WASM_EXTENSION) {
            continue;
        }
        let abs_path = path.canonicalize()?;
        let id = contract_name(&abs_path)?;
        let local_chain = test_ctx.get_mut_chain(chain)?;

        // avoid storing multiple times during the same execution
        if local_chain.contract_codes.contains_key(&id) {
            debug!("{id} already deployed on {chain}, skipping");
            continue;
        }

        if let Some(&code_id) = chain_cache.get(&id) {
            if code_exists(&local_chain.rb, code_id) {
                info!("{id} on {chain}: cached code id {code_id}");
                local_chain.contract_codes.insert(id, code_id);
                continue;
            }
            debug!("cached code id {code_id} for {id} is gone from {chain}");
        }

        let mut cw = local_chain.get_cw();
        let code_id = cw.store(ACC_0_KEY, &abs_path)?;
        info!("{id} on {chain}: stored with code id {code_id}");

        chain_cache.insert(id.clone(), code_id);
        local_chain.save_code(&abs_path, code_id)?;
    }

    write_code_id_cache(cache_path, &cache)
}

fn code_exists(rb: &ChainRequestBuilder, code_id: u64) -> bool {
    let response = rb.q(&format!("wasm code-info {code_id} --output=json"), false);
    !response["checksum"].is_null() || !response["data_hash"].is_null()
}
