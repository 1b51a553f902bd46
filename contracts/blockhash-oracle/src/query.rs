use cosmwasm_std::{to_json_binary, Binary, Deps, StdResult};

use crate::state::{BLOCK_HASHES, CONFIG, LATEST_HEIGHT};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_block_hash(deps: Deps, height: u64) -> StdResult<Binary> {
    let stored = BLOCK_HASHES.may_load(deps.storage, height)?;
    to_json_binary(&stored)
}

pub fn query_latest_height(deps: Deps) -> StdResult<Binary> {
    let latest = LATEST_HEIGHT.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&latest)
}
