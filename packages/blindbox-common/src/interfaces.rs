use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};

/// Query interface of the blockhash oracle contract.
///
/// The oracle keeps hashes far beyond the host chain's native retention
/// window, so a draw can be revealed arbitrarily long after purchase.
#[cw_serde]
pub enum BlockhashOracleQueryMsg {
    BlockHash { height: u64 },
    LatestHeight {},
}

/// A block hash recorded in the oracle.
#[cw_serde]
pub struct StoredBlockHash {
    pub height: u64,
    /// 32-byte block hash, hex-encoded
    pub hash: String,
    pub recorded_at: Timestamp,
    pub recorded_by: Addr,
}

/// Execute interface of the collectible token contract, as used by the
/// draw engine. Token ids are caller-chosen; see `token_id`.
#[cw_serde]
pub enum CollectibleExecuteMsg {
    Mint {
        to: String,
        token_id: Uint128,
        token_type: u64,
        amount: Uint128,
    },
}

/// Query interface of the collectible token contract.
#[cw_serde]
pub enum CollectibleQueryMsg {
    /// Returns `Option<TokenTypeInfo>` — None for an unknown type.
    TokenTypeInfo { token_type: u64 },
    /// Returns `bool`.
    IsApprovedForAll { owner: String, operator: String },
}

#[cw_serde]
pub struct TokenTypeInfo {
    pub token_type: u64,
    pub minted: Uint128,
}
