use blindbox_common::StoredBlockHash;
use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Storage};

use crate::error::ContractError;
use crate::msg::BlockHashEntry;
use crate::state::{BLOCK_HASHES, CONFIG, LATEST_HEIGHT};

/// Record a single block hash. Only recorders can call this.
pub fn record_block_hash(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    height: u64,
    hash_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.recorders.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only recorders can record block hashes".to_string(),
        });
    }

    let stored = store_hash(deps.storage, &env, &info, height, &hash_hex)?;

    Ok(Response::new()
        .add_attribute("action", "record_block_hash")
        .add_attribute("height", height.to_string())
        .add_attribute("recorded_by", info.sender.to_string())
        .add_event(
            Event::new("blindbox_block_hash_recorded")
                .add_attribute("height", height.to_string())
                .add_attribute("hash", stored.hash)
                .add_attribute("recorded_by", info.sender.to_string()),
        ))
}

/// Record a batch of block hashes. Only recorders can call this.
/// The whole batch is rejected if any entry is invalid or a duplicate.
pub fn record_block_hashes(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    entries: Vec<BlockHashEntry>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.recorders.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only recorders can record block hashes".to_string(),
        });
    }

    let count = entries.len();
    let mut events = Vec::with_capacity(count);
    for entry in entries {
        let stored = store_hash(deps.storage, &env, &info, entry.height, &entry.hash_hex)?;
        events.push(
            Event::new("blindbox_block_hash_recorded")
                .add_attribute("height", entry.height.to_string())
                .add_attribute("hash", stored.hash)
                .add_attribute("recorded_by", info.sender.to_string()),
        );
    }

    Ok(Response::new()
        .add_attribute("action", "record_block_hashes")
        .add_attribute("count", count.to_string())
        .add_events(events))
}

/// Validate and persist one hash entry. First write for a height wins;
/// history is immutable after that.
fn store_hash(
    storage: &mut dyn Storage,
    env: &Env,
    info: &MessageInfo,
    height: u64,
    hash_hex: &str,
) -> Result<StoredBlockHash, ContractError> {
    if height >= env.block.height {
        return Err(ContractError::HeightNotPast {
            height,
            current: env.block.height,
        });
    }

    if BLOCK_HASHES.has(storage, height) {
        return Err(ContractError::HashAlreadyRecorded { height });
    }

    let hash_bytes = hex::decode(hash_hex).map_err(|_| ContractError::InvalidHex {
        field: "hash_hex".to_string(),
    })?;
    if hash_bytes.len() != 32 {
        return Err(ContractError::InvalidHashLength {
            got: hash_bytes.len(),
        });
    }

    let stored = StoredBlockHash {
        height,
        hash: hash_hex.to_string(),
        recorded_at: env.block.time,
        recorded_by: info.sender.clone(),
    };
    BLOCK_HASHES.save(storage, height, &stored)?;

    let current_latest = LATEST_HEIGHT.may_load(storage)?.unwrap_or(0);
    if height > current_latest {
        LATEST_HEIGHT.save(storage, &height)?;
    }

    Ok(stored)
}

/// Update the recorder list. Admin only.
pub fn update_recorders(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update recorders".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.recorders.retain(|a| *a != addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.recorders.contains(&addr) {
            config.recorders.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_recorders")
        .add_attribute("added", add.join(",")))
}
