use blindbox_common::StoredBlockHash;
use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::OracleConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub recorders: Vec<String>,
}

#[cw_serde]
pub struct BlockHashEntry {
    pub height: u64,
    /// 32-byte block hash, hex-encoded
    pub hash_hex: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Record one block hash. Recorders only.
    RecordBlockHash { height: u64, hash_hex: String },
    /// Record a batch of block hashes. Recorders only.
    RecordBlockHashes { entries: Vec<BlockHashEntry> },
    /// Update the recorder list. Admin only.
    UpdateRecorders {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OracleConfig)]
    Config {},
    #[returns(Option<StoredBlockHash>)]
    BlockHash { height: u64 },
    #[returns(u64)]
    LatestHeight {},
}
