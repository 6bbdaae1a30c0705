use std::{
    collections::BTreeMap,
    fs::{self, DirEntry},
    path::Path,
};

use log::{debug, info};

use crate::error::HarnessResult;

use super::types::ChainsVec;

/// chain name -> (contract name -> code id)
pub type CodeIdCache = BTreeMap<String, BTreeMap<String, u64>>;

pub fn read_chains_config(file_path: &str) -> HarnessResult<ChainsVec> {
    let data = fs::read_to_string(file_path)?;
    let chains: ChainsVec = serde_json::from_str(&data)?;

    Ok(chains)
}

pub fn write_chains_config(file_path: &str, chains: &ChainsVec) -> HarnessResult<()> {
    let data = serde_json::to_string_pretty(chains)?;
    fs::write(file_path, data)?;

    info!("chain config written: {file_path}");
    Ok(())
}

pub fn read_artifacts(path: &str) -> HarnessResult<Vec<DirEntry>> {
    let mut dir_entries = vec![];
    for entry in fs::read_dir(path)? {
        dir_entries.push(entry?);
    }
    dir_entries.sort_by_key(|e| e.file_name());

    Ok(dir_entries)
}

/// A missing cache file is an empty cache.
pub fn read_code_id_cache(path: &str) -> HarnessResult<CodeIdCache> {
    if !Path::new(path).exists() {
        debug!("no code id cache at {path}");
        return Ok(CodeIdCache::new());
    }

    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(CodeIdCache::new());
    }

    Ok(serde_json::from_str(&data)?)
}

pub fn write_code_id_cache(path: &str, cache: &CodeIdCache) -> HarnessResult<()> {
    fs::write(path, serde_json::to_string_pretty(cache)?)?;
    Ok(())
}

pub fn pretty_print(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => debug!("{s}"),
        Err(e) => debug!("<unprintable json: {e}>"),
    }
}
