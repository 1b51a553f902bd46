use blindbox_common::StoredBlockHash;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<OracleConfig> = Item::new("config");
pub const BLOCK_HASHES: Map<u64, StoredBlockHash> = Map::new("block_hashes");
pub const LATEST_HEIGHT: Item<u64> = Item::new("latest_height");

#[cw_serde]
pub struct OracleConfig {
    pub admin: Addr,
    /// Addresses allowed to record block hashes
    pub recorders: Vec<Addr>,
}
